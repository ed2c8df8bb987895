//! Ready-made synchronizers for the patient record modules.

use crate::debounce::Debouncer;
use crate::error::SyncResult;
use crate::prompt::Prompt;
use crate::synchronizer::{LoadOutcome, RecordSynchronizer};
use crate::transport::RecordTransport;
use healthcard_model::filter::{AssessmentCategory, HistoryQuery, VitalsQuery};
use healthcard_model::{
    Allergy, FamilyHistoryRecord, HealthAssessment, Implant, ListView, Medicine, Surgery,
    Vaccination, VitalRecord, render_list,
};
use std::sync::Arc;
use tokio::sync::Mutex;

pub type AllergySync = RecordSynchronizer<Allergy>;
pub type SurgerySync = RecordSynchronizer<Surgery>;
pub type ImplantSync = RecordSynchronizer<Implant>;
pub type VaccinationSync = RecordSynchronizer<Vaccination>;
pub type FamilyHistorySync = RecordSynchronizer<FamilyHistoryRecord>;
pub type AssessmentSync = RecordSynchronizer<HealthAssessment>;
pub type VitalsSync = RecordSynchronizer<VitalRecord>;
pub type InventorySync = RecordSynchronizer<Medicine>;

/// One synchronizer per patient record module, sharing a transport and prompt.
#[derive(Clone)]
pub struct HealthRecords {
    pub allergy: AllergySync,
    pub surgery: SurgerySync,
    pub implants: ImplantSync,
    pub vaccination: VaccinationSync,
    pub family_history: FamilyHistorySync,
    pub assessments: AssessmentSync,
    pub vitals: VitalsSync,
}

impl HealthRecords {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            allergy: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            surgery: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            implants: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            vaccination: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            family_history: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            assessments: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            vitals: RecordSynchronizer::new(transport, prompt),
        }
    }

    /// Invalidates in-flight loads of every module.
    pub async fn cancel_pending(&self) {
        self.allergy.cancel_pending().await;
        self.surgery.cancel_pending().await;
        self.implants.cancel_pending().await;
        self.vaccination.cancel_pending().await;
        self.family_history.cancel_pending().await;
        self.assessments.cancel_pending().await;
        self.vitals.cancel_pending().await;
    }
}

impl AssessmentSync {
    /// The list view restricted to one assessment tab. Filtering is local.
    pub async fn render_category(&self, category: &AssessmentCategory) -> ListView {
        render_list(&category.apply(&self.records().await))
    }
}

impl VitalsSync {
    /// Loads the last `days` days of vitals; zero loads all history.
    ///
    /// Saves and deletes reload with the same window.
    pub async fn load_days(&self, days: u32) -> SyncResult<LoadOutcome> {
        self.load_with(&VitalsQuery { days }).await
    }
}

/// Search box and filters of the family history list.
///
/// Typing in the search box is debounced; changing a filter reloads at once.
#[derive(Clone)]
pub struct FamilyHistorySearch {
    sync: FamilyHistorySync,
    query: Arc<Mutex<HistoryQuery>>,
    debouncer: Debouncer,
}

impl FamilyHistorySearch {
    pub fn new(sync: FamilyHistorySync) -> Self {
        Self::with_debouncer(sync, Debouncer::default())
    }

    pub fn with_debouncer(sync: FamilyHistorySync, debouncer: Debouncer) -> Self {
        Self {
            sync,
            query: Arc::new(Mutex::new(HistoryQuery::default())),
            debouncer,
        }
    }

    pub async fn query(&self) -> HistoryQuery {
        self.query.lock().await.clone()
    }

    /// Records a keystroke. Returns `None` if a later keystroke superseded it.
    pub async fn search(&self, text: &str) -> Option<SyncResult<LoadOutcome>> {
        self.query.lock().await.q = text.to_string();
        if !self.debouncer.settle().await {
            return None;
        }
        Some(self.reload().await)
    }

    pub async fn filter_relation(&self, relation: &str) -> SyncResult<LoadOutcome> {
        self.query.lock().await.relation = relation.to_string();
        self.reload().await
    }

    pub async fn filter_condition(&self, condition: &str) -> SyncResult<LoadOutcome> {
        self.query.lock().await.condition = condition.to_string();
        self.reload().await
    }

    /// Clears the search box and every filter, then reloads.
    pub async fn reset(&self) -> SyncResult<LoadOutcome> {
        self.query.lock().await.reset();
        self.reload().await
    }

    async fn reload(&self) -> SyncResult<LoadOutcome> {
        let query = self.query().await;
        self.sync.load_with(&query).await
    }
}
