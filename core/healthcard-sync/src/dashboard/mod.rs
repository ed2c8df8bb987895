//! Role dashboards: doctor, hospital admin, insurance, pharmacy and blood bank.
//!
//! These are not record modules. Each panel is a one-shot fetch of a
//! read-mostly endpoint plus a handful of actions, so they share a thin
//! client instead of a [`RecordSynchronizer`](crate::RecordSynchronizer).

mod blood_bank;
mod doctor;
mod hospital;
mod insurance;
mod pharmacy;

pub use blood_bank::{BLOOD_GROUPS, BloodBankDashboard, BloodRequestAction, NewBloodUnit};
pub use doctor::{
    Appointment, Consultation, DoctorDashboard, DoctorStats, Investigation, InvestigationType,
    LabOrder, MedicalHistoryEntry, MedicalRecords, NewInvestigation, NewMedicalHistory,
    NewPatientVitals, OTP_LEN, OTP_SECONDS, OtpCountdown, PatientMatch, PatientVital,
    PrescriptionLine, TodaySchedule, Urgency, appointment_status_tone, condition_severity_tone,
    investigation_status_tone, record_type_label,
};
pub use hospital::{
    ActivityEntry, Department, DepartmentScore, Doctor, HospitalAnalytics, HospitalDashboard,
    HospitalStats, NewDepartment, NewDoctor, UID_LEN, score_tone,
};
pub use insurance::{
    Claim, ClaimFilter, ClaimReview, DashboardAlert, InsuranceDashboard, InsuranceStats,
    Policyholder, SlaStatus, sla_status,
};
pub use pharmacy::{
    PRESCRIPTION_UPLOAD, PharmacyDashboard, PharmacyRequest, RequestStatus, prescription_url,
};

use crate::error::{SyncError, SyncResult};
use crate::prompt::Prompt;
use crate::transport::{ApiRequest, ApiResponse, RecordTransport};
use healthcard_model::{FieldError, RequestBody};
use healthcard_types::Envelope;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, warn};

/// Request plumbing shared by the dashboards.
#[derive(Clone)]
pub(crate) struct DashboardClient {
    transport: Arc<dyn RecordTransport>,
    prompt: Arc<dyn Prompt>,
}

impl DashboardClient {
    pub(crate) fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self { transport, prompt }
    }

    pub(crate) fn confirm(&self, message: &str) -> bool {
        self.prompt.confirm(message)
    }

    pub(crate) fn alert(&self, message: &str) {
        self.prompt.alert(message);
    }

    /// Sends `request` and requires `success: true`.
    ///
    /// A rejection alerts the server's message (else `failure`); a transport
    /// error alerts `failure`.
    pub(crate) async fn fetch(&self, request: ApiRequest, failure: &str) -> SyncResult<Envelope> {
        let path = request.path.clone();
        match self.transport.send(request).await {
            Ok(response) if response.envelope.success => Ok(response.envelope),
            Ok(response) => {
                let message = response.envelope.failure_message_or(failure).to_string();
                warn!("{path} rejected: {message}");
                self.prompt.alert(&message);
                Err(SyncError::Rejected(message))
            }
            Err(e) => {
                error!("{path} failed: {e}");
                self.prompt.alert(failure);
                Err(e)
            }
        }
    }

    /// Sends `request`; a rejection is alerted and handed back as the
    /// message instead of an error.
    pub(crate) async fn attempt(
        &self,
        request: ApiRequest,
        failure: &str,
    ) -> SyncResult<Result<Envelope, String>> {
        self.attempt_labeled(request, failure, "").await
    }

    /// As [`attempt`](Self::attempt), alerting rejections as
    /// `{label}{message}`.
    pub(crate) async fn attempt_labeled(
        &self,
        request: ApiRequest,
        failure: &str,
        label: &str,
    ) -> SyncResult<Result<Envelope, String>> {
        let path = request.path.clone();
        let response = self.fetch_raw(request, failure).await?;
        if response.envelope.success {
            return Ok(Ok(response.envelope));
        }
        let message = response.envelope.failure_message_or(failure).to_string();
        warn!("{path} rejected: {message}");
        self.prompt.alert(&format!("{label}{message}"));
        Ok(Err(message))
    }

    /// Sends `request` without looking at `success`. For endpoints that
    /// return a bare object.
    pub(crate) async fn fetch_raw(&self, request: ApiRequest, failure: &str) -> SyncResult<ApiResponse> {
        let path = request.path.clone();
        self.transport.send(request).await.map_err(|e| {
            error!("{path} failed: {e}");
            self.prompt.alert(failure);
            e
        })
    }

    /// Input refused before any request: alert `message` and return the
    /// field error.
    pub(crate) fn refuse(&self, message: &str, error: FieldError) -> SyncError {
        warn!("{message}");
        self.prompt.alert(message);
        SyncError::Validation(vec![error])
    }
}

/// Result of a dashboard action that asks first and may be refused.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    /// Accepted; carries what was reloaded afterwards.
    Done(T),
    /// The server refused with `message`.
    Rejected { message: String },
    /// The user backed out; nothing was sent.
    Cancelled,
}

impl<T> Outcome<T> {
    pub fn map_done<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Done(value) => Outcome::Done(f(value)),
            Self::Rejected { message } => Outcome::Rejected { message },
            Self::Cancelled => Outcome::Cancelled,
        }
    }

    /// Maps an [`attempt`](DashboardClient::attempt) result, reloading on
    /// success.
    pub(crate) async fn after<F>(attempt: Result<Envelope, String>, reload: F) -> SyncResult<Self>
    where
        F: Future<Output = SyncResult<T>>,
    {
        match attempt {
            Ok(_) => Ok(Self::Done(reload.await?)),
            Err(message) => Ok(Self::Rejected { message }),
        }
    }
}

/// Decodes the array under `key`; missing is empty.
pub(crate) fn list<T: DeserializeOwned>(envelope: &Envelope, key: &str) -> SyncResult<Vec<T>> {
    Ok(envelope.collection(key)?)
}

/// Decodes the object under `key`; missing is the type's default.
pub(crate) fn object<T: DeserializeOwned + Default>(envelope: &Envelope, key: &str) -> SyncResult<T> {
    Ok(envelope.field(key)?.unwrap_or_default())
}

/// A JSON object as a request body.
pub(crate) fn json_body(value: Value) -> RequestBody {
    match value {
        Value::Object(map) => RequestBody::Json(map),
        _ => RequestBody::Empty,
    }
}
