use crate::form::FormValues;
use crate::schema::ModuleSchema;
use crate::view::{Card, StatsView};
use healthcard_types::RecordId;
use serde::de::DeserializeOwned;

/// A normalized entity of one record module.
///
/// Implementors are decoded straight from the server's list response and
/// know how to present themselves as a [`Card`] and how to fill the module's
/// edit form.
pub trait Record: Clone + Send + Sync + DeserializeOwned + 'static {
    /// Stats shown above the list. Modules without stats use `()`.
    type Stats: DeserializeOwned + StatsView + Clone + Send + Sync + 'static;

    /// The module this record belongs to.
    fn schema() -> &'static ModuleSchema;

    fn id(&self) -> RecordId;

    /// The record's card in the list view.
    fn card(&self) -> Card;

    /// The edit form populated from this record, field for field.
    fn to_form(&self) -> FormValues;

    /// Stats to show after a load.
    ///
    /// `reported` is what the server sent under the schema's stats key, if
    /// anything. Modules that compute stats locally override this.
    fn derive_stats(records: &[Self], reported: Option<Self::Stats>) -> Option<Self::Stats> {
        let _ = records;
        reported
    }
}
