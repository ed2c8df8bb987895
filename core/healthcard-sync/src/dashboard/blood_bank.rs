//! Blood bank dashboard: stock intake and hospital requests.
//!
//! Both actions post form data and report only success or failure.

use super::{DashboardClient, Outcome};
use crate::error::SyncResult;
use crate::prompt::Prompt;
use crate::transport::{ApiRequest, RecordTransport};
use healthcard_model::{FieldError, FieldErrorKind, MultipartBody, RequestBody};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

pub const BLOOD_GROUPS: &[&str] = &["A+", "A-", "B+", "B-", "AB+", "AB-", "O+", "O-"];

const TRANSPORT_FAILURE: &str = "An error occurred.";

/// The add-unit form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewBloodUnit {
    pub blood_group: String,
    /// e.g. whole blood, plasma, platelets.
    pub component: String,
    /// Units received.
    pub quantity: String,
    pub expiry_date: String,
}

impl NewBloodUnit {
    fn validate(&self) -> Option<FieldError> {
        if !BLOOD_GROUPS.contains(&self.blood_group.as_str()) {
            return Some(FieldError::new(
                "blood_group",
                FieldErrorKind::NotAnOption(self.blood_group.clone()),
            ));
        }
        let quantity = self.quantity.trim();
        if quantity.is_empty() || !quantity.bytes().all(|b| b.is_ascii_digit()) {
            return Some(FieldError::new("quantity", FieldErrorKind::Missing));
        }
        None
    }

    fn body(&self) -> RequestBody {
        let fields = [
            ("blood_group", &self.blood_group),
            ("component", &self.component),
            ("quantity", &self.quantity),
            ("expiry_date", &self.expiry_date),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.trim().to_string()))
        .collect();
        RequestBody::Multipart(MultipartBody {
            fields,
            files: Vec::new(),
        })
    }
}

/// What the blood bank does with a hospital's request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BloodRequestAction {
    Approve,
    Reject,
}

impl BloodRequestAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "approve" => Some(Self::Approve),
            "reject" => Some(Self::Reject),
            _ => None,
        }
    }
}

impl fmt::Display for BloodRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client for the blood bank endpoints.
#[derive(Clone)]
pub struct BloodBankDashboard {
    client: DashboardClient,
}

impl BloodBankDashboard {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            client: DashboardClient::new(transport, prompt),
        }
    }

    /// Records units received into stock.
    pub async fn add_unit(&self, unit: &NewBloodUnit) -> SyncResult<Outcome<()>> {
        if let Some(error) = unit.validate() {
            return Err(self.client.refuse("Please fill in all required fields", error));
        }
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post("/blood_bank/unit/add", unit.body()),
                TRANSPORT_FAILURE,
                "Error: ",
            )
            .await?;
        if attempt.is_ok() {
            info!("{} units of {} added", unit.quantity, unit.blood_group);
        }
        Outcome::after(attempt, async { Ok(()) }).await
    }

    /// Approves or rejects a hospital's request after the user confirms.
    pub async fn process_request(
        &self,
        request_id: RecordId,
        action: BloodRequestAction,
    ) -> SyncResult<Outcome<()>> {
        if !self
            .client
            .confirm(&format!("Are you sure you want to {action} this request?"))
        {
            debug!("{action} of blood request {request_id} cancelled");
            return Ok(Outcome::Cancelled);
        }
        let body = RequestBody::Multipart(MultipartBody {
            fields: vec![
                ("request_id".to_string(), request_id.to_string()),
                ("action".to_string(), action.to_string()),
            ],
            files: Vec::new(),
        });
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post("/blood_bank/request/action", body),
                TRANSPORT_FAILURE,
                "Error: ",
            )
            .await?;
        if attempt.is_ok() {
            info!("blood request {request_id}: {action}");
        }
        Outcome::after(attempt, async { Ok(()) }).await
    }
}
