//! Record model for the health card client.
//!
//! Defines everything a record module needs that does not touch the network:
//! - [`ModuleSchema`]: endpoints, form fields and body encoding of one module
//! - [`Record`]: the trait every entity (allergy, vitals, medicine, ...) implements
//! - [`FormValues`] / [`RequestBody`]: modal form state and what gets sent
//! - [`Card`] / [`ListView`]: view models, rendered to HTML by [`markup`]
//! - static suggestion catalogs and list filters
//!
//! Wire-format quirks (snake_case vs camelCase keys, numbers sent as strings,
//! JSON sections sent as strings) are resolved once, when an entity is
//! deserialized. Nothing downstream looks at raw keys.

mod body;
pub mod entities;
mod error;
pub mod filter;
mod form;
pub mod markup;
mod normalize;
mod record;
mod schema;
pub mod suggestions;
mod view;

pub use body::{Attachment, MultipartBody, RequestBody};
pub use entities::{
    Allergy, AssessmentStats, FamilyHistoryRecord, FamilyHistoryStats, HealthAssessment, Implant,
    InventoryStats, Medicine, Surgery, Vaccination, VaccinationStats, VitalRecord, VitalsStats,
};
pub use error::{ModelError, ModelResult};
pub use form::{FieldError, FieldErrorKind, FieldValue, FormValues};
pub use normalize::{lenient_count, lenient_text};
pub use record::Record;
pub use schema::{
    AnyOf, AttachmentPolicy, BodyEncoding, EmptyValue, Endpoints, FieldDefault, FieldKind,
    FormField, HttpMethod, Messages, ModuleSchema, Pattern, Route,
};
pub use suggestions::SuggestionCatalog;
pub use view::{
    Action, Badge, Card, CardLine, LineStyle, Link, ListView, StatTile, StatsView, Tone,
    render_list,
};
