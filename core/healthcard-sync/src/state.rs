//! Per-module synchronizer state.

use healthcard_model::{FormValues, Record};
use healthcard_types::{LoadGeneration, RecordId};

/// What the modal was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalMode {
    Add,
    Edit(RecordId),
    /// Read-only detail view.
    View(RecordId),
}

impl ModalMode {
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Add => None,
            Self::Edit(id) | Self::View(id) => Some(*id),
        }
    }
}

/// An open add/edit/view modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalState {
    pub mode: ModalMode,
    pub title: String,
    pub form: FormValues,
    /// Options offered for the suggestion input, by current category.
    pub suggestions: Vec<&'static str>,
    /// A save for this modal is in flight.
    pub submitting: bool,
}

/// Records, stats and modal of one module.
pub(crate) struct SyncState<R: Record> {
    pub records: Vec<R>,
    pub stats: Option<R::Stats>,
    pub modal: Option<ModalState>,
    /// Query parameters of the latest load. Reloads after a mutation reuse them.
    pub query: Vec<(&'static str, String)>,
    /// Last generation handed to a load.
    pub issued: LoadGeneration,
    /// Generation whose result is currently displayed.
    pub applied: LoadGeneration,
}

impl<R: Record> Default for SyncState<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            stats: None,
            modal: None,
            query: Vec::new(),
            issued: LoadGeneration::ZERO,
            applied: LoadGeneration::ZERO,
        }
    }
}

impl<R: Record> SyncState<R> {
    pub fn find(&self, id: RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn issue(&mut self) -> LoadGeneration {
        self.issued = self.issued.next();
        self.issued
    }
}
