//! Record synchronization for the health card client.
//!
//! Keeps each record module's list in step with the server:
//! load the collection, render it, mutate through a modal form, reload.
//!
//! # Architecture
//!
//! ## Components
//!
//! - **Transport**: [`RecordTransport`] sends requests and decodes envelopes;
//!   [`HttpTransport`] is the reqwest implementation
//! - **Synchronizer**: [`RecordSynchronizer`] owns one module's records,
//!   stats and modal, and orders overlapping loads by generation
//! - **Prompt**: [`Prompt`] confirms deletes and shows failures
//! - **Dashboards**: clients for the doctor, hospital and insurance panels
//!
//! ## Load cycle
//!
//! 1. **Issue**: stamp the load with the next [`LoadGeneration`]
//! 2. **Fetch**: GET the module's list endpoint
//! 3. **Apply**: replace records and stats if the stamp is still the latest
//! 4. **Render**: build the [`ListView`](healthcard_model::ListView)
//!
//! # Example
//!
//! ```no_run
//! use healthcard_model::Allergy;
//! use healthcard_sync::{AutoConfirm, ClientConfig, HttpTransport, RecordSynchronizer};
//! use std::sync::Arc;
//!
//! # async fn run() -> healthcard_sync::SyncResult<()> {
//! let transport = Arc::new(HttpTransport::new(ClientConfig::default())?);
//! let allergies = RecordSynchronizer::<Allergy>::new(transport, Arc::new(AutoConfirm));
//! allergies.load().await?;
//! println!("{} cards", allergies.render().await.len());
//! # Ok(())
//! # }
//! ```
//!
//! [`LoadGeneration`]: healthcard_types::LoadGeneration

mod config;
pub mod dashboard;
mod debounce;
mod error;
pub mod modules;
mod prompt;
mod state;
mod synchronizer;
mod transport;

pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use debounce::{DEFAULT_DEBOUNCE, Debouncer};
pub use error::{SyncError, SyncResult};
pub use modules::{FamilyHistorySearch, HealthRecords};
pub use prompt::{AutoConfirm, DenyAll, Prompt};
pub use state::{ModalMode, ModalState};
pub use synchronizer::{DeleteOutcome, LoadOutcome, RecordSynchronizer, SaveOutcome, UNKNOWN_ERROR};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, RecordTransport};
