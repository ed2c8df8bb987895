//! Pharmacy dashboard: medicine inventory and patient requests.

use super::{DashboardClient, Outcome, json_body, list};
use crate::error::SyncResult;
use crate::modules::InventorySync;
use crate::prompt::Prompt;
use crate::synchronizer::RecordSynchronizer;
use crate::transport::{ApiRequest, RecordTransport};
use healthcard_model::{FieldError, FieldErrorKind, lenient_text};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

/// Request type of an uploaded prescription.
pub const PRESCRIPTION_UPLOAD: &str = "prescription_upload";

/// Where an uploaded prescription file is served from.
pub fn prescription_url(file_path: &str) -> String {
    format!("/uploads/prescriptions/{file_path}")
}

/// Lifecycle of a patient request.
///
/// `pending` goes to `accepted` or `rejected`, `accepted` to `ready`, and
/// `ready` to `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
    Ready,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Ready => "ready",
            Self::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "accepted" => Some(Self::Accepted),
            "rejected" => Some(Self::Rejected),
            "ready" => Some(Self::Ready),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// The statuses the pharmacist can move a request to from this one.
    pub fn next(&self) -> &'static [RequestStatus] {
        match self {
            Self::Pending => &[Self::Accepted, Self::Rejected],
            Self::Accepted => &[Self::Ready],
            Self::Ready => &[Self::Completed],
            Self::Rejected | Self::Completed => &[],
        }
    }

    pub fn can_become(&self, next: RequestStatus) -> bool {
        self.next().contains(&next)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A patient's prescription upload or medicine request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PharmacyRequest {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient_uid: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub file_path: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub medicine_details: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

impl PharmacyRequest {
    pub fn status(&self) -> Option<RequestStatus> {
        self.status.as_deref().and_then(RequestStatus::parse)
    }

    pub fn is_upload(&self) -> bool {
        self.kind.as_deref() == Some(PRESCRIPTION_UPLOAD)
    }

    /// Link to the uploaded prescription, for uploads with a file.
    pub fn prescription_link(&self) -> Option<String> {
        if !self.is_upload() {
            return None;
        }
        self.file_path.as_deref().map(prescription_url)
    }

    /// Requests still waiting for the pharmacist. Matching is exact.
    pub fn pending_count(requests: &[Self]) -> usize {
        requests
            .iter()
            .filter(|r| r.status.as_deref() == Some("pending"))
            .count()
    }
}

/// Client for the pharmacy endpoints.
///
/// The inventory is a record module of its own; requests are a plain list.
#[derive(Clone)]
pub struct PharmacyDashboard {
    client: DashboardClient,
    inventory: InventorySync,
}

impl PharmacyDashboard {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            inventory: RecordSynchronizer::new(Arc::clone(&transport), Arc::clone(&prompt)),
            client: DashboardClient::new(transport, prompt),
        }
    }

    pub fn inventory(&self) -> &InventorySync {
        &self.inventory
    }

    pub async fn requests(&self) -> SyncResult<Vec<PharmacyRequest>> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get("/api/pharmacy/requests"),
                "Error loading requests",
            )
            .await?;
        list(&envelope, "requests")
    }

    /// Moves `request` to `next`, then returns the reloaded requests.
    ///
    /// Rejecting needs a reason; `None` means the pharmacist backed out and
    /// nothing is sent. Other moves take optional remarks for the patient.
    pub async fn update_request(
        &self,
        request: &PharmacyRequest,
        next: RequestStatus,
        remarks: Option<&str>,
    ) -> SyncResult<Outcome<Vec<PharmacyRequest>>> {
        let current = request.status().unwrap_or(RequestStatus::Pending);
        if !current.can_become(next) {
            return Err(self.client.refuse(
                &format!("A {current} request cannot be marked {next}"),
                FieldError::new("status", FieldErrorKind::NotAnOption(next.to_string())),
            ));
        }
        let remarks = match (next, remarks) {
            (RequestStatus::Rejected, None) => {
                debug!("rejection of request {} cancelled", request.id);
                return Ok(Outcome::Cancelled);
            }
            (_, remarks) => remarks.unwrap_or_default(),
        };
        let body = json_body(json!({
            "id": request.id.get(),
            "status": next.as_str(),
            "remarks": remarks,
        }));
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post("/api/pharmacy/request/update", body),
                "Error updating request",
                "Error: ",
            )
            .await?;
        if attempt.is_ok() {
            info!("request {} marked {next}", request.id);
        }
        Outcome::after(attempt, self.requests()).await
    }
}
