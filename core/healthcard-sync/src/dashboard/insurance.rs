//! Insurance dashboard: policyholders, claims and claim review.
//!
//! Most of these endpoints return a bare object rather than a
//! `{success, ...}` envelope, so their bodies are read without checking
//! `success`.

use super::{DashboardClient, json_body};
use crate::error::{SyncError, SyncResult};
use crate::prompt::Prompt;
use crate::transport::{ApiRequest, RecordTransport};
use healthcard_model::{FieldError, FieldErrorKind, lenient_count, lenient_text};
use healthcard_types::Envelope;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{info, warn};

/// Alert shown when a claim cannot be opened.
pub const CLAIM_UNAVAILABLE: &str = "Claim not found or no consent";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardAlert {
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub action: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsuranceStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_policies: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub active_policyholders: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub claims_today: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub claims_month: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub claims_approved: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub claims_rejected: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub claims_under_review: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub cashless_pending: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub fraud_flags: u64,
    #[serde(default)]
    pub alerts: Vec<DashboardAlert>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Policyholder {
    #[serde(default, deserialize_with = "lenient_text")]
    pub policy_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub client_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub policy_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub policy_status: Option<String>,
    #[serde(default)]
    pub coverage_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub validity_from: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub validity_to: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub consent_status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub last_claim_date: Option<String>,
}

impl Policyholder {
    pub fn has_active_consent(&self) -> bool {
        self.consent_status.as_deref() == Some("Active")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(default, deserialize_with = "lenient_text")]
    pub claim_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub policy_number: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub client_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub hospital_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub claim_type: Option<String>,
    #[serde(default)]
    pub claimed_amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub sla_remaining_hours: Option<f64>,
    /// Everything else the detail endpoint returns.
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Claim {
    pub fn sla(&self) -> SlaStatus {
        sla_status(self.sla_remaining_hours)
    }
}

/// Time left before a claim breaches its service-level deadline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlaStatus {
    Unknown,
    /// More than a day left.
    Good(f64),
    Warning(f64),
    Breached,
}

impl SlaStatus {
    pub fn label(&self) -> String {
        match self {
            Self::Unknown => "-".to_string(),
            Self::Good(hours) | Self::Warning(hours) => format!("{hours:.1}h remaining"),
            Self::Breached => "BREACHED".to_string(),
        }
    }

    pub fn class(&self) -> &'static str {
        match self {
            Self::Unknown => "text-muted",
            Self::Good(_) => "sla-good",
            Self::Warning(_) => "sla-warning",
            Self::Breached => "sla-critical",
        }
    }
}

pub fn sla_status(remaining_hours: Option<f64>) -> SlaStatus {
    match remaining_hours {
        None => SlaStatus::Unknown,
        Some(h) if h.is_nan() => SlaStatus::Unknown,
        Some(h) if h > 24.0 => SlaStatus::Good(h),
        Some(h) if h > 0.0 => SlaStatus::Warning(h),
        Some(_) => SlaStatus::Breached,
    }
}

/// Claims list filters. Every key is sent, empty or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimFilter {
    pub status: String,
    pub date_from: String,
    pub date_to: String,
}

/// A reviewer's decision on a claim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReview {
    pub decision: String,
    pub approved_amount: String,
    pub remarks: String,
}

/// Client for the insurance dashboard endpoints.
#[derive(Clone)]
pub struct InsuranceDashboard {
    client: DashboardClient,
}

impl InsuranceDashboard {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            client: DashboardClient::new(transport, prompt),
        }
    }

    pub async fn stats(&self) -> SyncResult<InsuranceStats> {
        let response = self
            .client
            .fetch_raw(
                ApiRequest::get("/insurance/api/dashboard/stats"),
                "Failed to load dashboard statistics",
            )
            .await?;
        bare(&response.envelope)
    }

    /// Policyholders by policy status (default `Active`) and search text.
    pub async fn policyholders(&self, status: &str, search: &str) -> SyncResult<Vec<Policyholder>> {
        let status = if status.is_empty() { "Active" } else { status };
        let request = ApiRequest::get("/insurance/api/policyholders")
            .query([("status", status), ("search", search)]);
        let response = self
            .client
            .fetch_raw(request, "Failed to load policyholders")
            .await?;
        Ok(response.envelope.collection("policyholders")?)
    }

    pub async fn claims(&self, filter: &ClaimFilter) -> SyncResult<Vec<Claim>> {
        let request = ApiRequest::get("/insurance/api/claims").query([
            ("status", filter.status.as_str()),
            ("date_from", filter.date_from.as_str()),
            ("date_to", filter.date_to.as_str()),
        ]);
        let response = self
            .client
            .fetch_raw(request, "Failed to load claims")
            .await?;
        Ok(response.envelope.collection("claims")?)
    }

    /// Full claim detail. Any non-2xx status means the claim is missing or
    /// the client has not consented.
    pub async fn claim(&self, claim_id: &str) -> SyncResult<Claim> {
        let path = format!("/insurance/api/claim/{}", urlencoding::encode(claim_id));
        let response = self
            .client
            .fetch_raw(ApiRequest::get(path), CLAIM_UNAVAILABLE)
            .await?;
        if !response.is_success_status() {
            warn!("claim {claim_id}: HTTP {}", response.status);
            self.client.alert(CLAIM_UNAVAILABLE);
            return Err(SyncError::Rejected(CLAIM_UNAVAILABLE.to_string()));
        }
        bare(&response.envelope)
    }

    /// Submits a review. Decision and remarks are required.
    pub async fn review_claim(&self, claim_id: &str, review: &ClaimReview) -> SyncResult<()> {
        if review.decision.trim().is_empty() {
            return Err(self.client.refuse(
                "Please select a decision",
                FieldError::new("decision", FieldErrorKind::Missing),
            ));
        }
        if review.remarks.trim().is_empty() {
            return Err(self.client.refuse(
                "Please enter remarks",
                FieldError::new("remarks", FieldErrorKind::Missing),
            ));
        }
        let path = format!("/insurance/api/claim/{}/review", urlencoding::encode(claim_id));
        let body = json_body(serde_json::to_value(review)?);
        self.client
            .fetch(ApiRequest::post(path, body), "Failed to submit review")
            .await?;
        info!("claim {claim_id} reviewed: {}", review.decision);
        Ok(())
    }
}

/// Decodes a bare response object, ignoring envelope keys.
fn bare<T: DeserializeOwned>(envelope: &Envelope) -> SyncResult<T> {
    Ok(serde_json::from_value(Value::Object(envelope.body.clone()))?)
}
