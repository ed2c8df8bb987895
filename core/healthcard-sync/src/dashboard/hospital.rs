//! Hospital admin dashboard: staff, departments and analytics.

use super::{DashboardClient, Outcome, json_body, list, object};
use crate::error::SyncResult;
use crate::prompt::Prompt;
use crate::transport::{ApiRequest, RecordTransport};
use healthcard_model::{
    FieldError, FieldErrorKind, HttpMethod, Pattern, Tone, lenient_count, lenient_text,
};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Digits in a doctor's health card UID.
pub const UID_LEN: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HospitalStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub doctors: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub patients: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub appointments: u64,
    /// Pre-formatted by the server.
    #[serde(default, deserialize_with = "lenient_text")]
    pub revenue: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doctor {
    #[serde(default, deserialize_with = "lenient_text")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub specialty: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub head: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub created_at: Option<String>,
}

/// Performance score of one department, in percent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DepartmentScore {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default)]
    pub score: f64,
}

/// One row of the recent activity log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    #[serde(default, deserialize_with = "lenient_text")]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub details: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HospitalAnalytics {
    /// Pre-formatted by the server.
    #[serde(default, deserialize_with = "lenient_text")]
    pub revenue_growth: Option<String>,
    #[serde(default)]
    pub department_performance: Vec<DepartmentScore>,
    #[serde(default)]
    pub recent_activity: Vec<ActivityEntry>,
}

/// Bar colour of a department score.
pub fn score_tone(score: f64) -> Tone {
    if score >= 80.0 {
        Tone::Success
    } else if score < 50.0 {
        Tone::Danger
    } else if score < 70.0 {
        Tone::Warning
    } else {
        Tone::Primary
    }
}

/// The add-doctor form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub uid: String,
    pub name: String,
    pub specialty: String,
    pub email: String,
    pub phone: String,
}

/// The add-department form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewDepartment {
    pub name: String,
    pub head: String,
}

/// Client for the hospital admin endpoints.
#[derive(Clone)]
pub struct HospitalDashboard {
    client: DashboardClient,
}

impl HospitalDashboard {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            client: DashboardClient::new(transport, prompt),
        }
    }

    pub async fn stats(&self) -> SyncResult<HospitalStats> {
        let envelope = self
            .client
            .fetch(ApiRequest::get("/api/hospital/stats"), "Failed to load statistics")
            .await?;
        object(&envelope, "stats")
    }

    pub async fn analytics(&self) -> SyncResult<HospitalAnalytics> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get("/api/hospital/analytics"),
                "Failed to load analytics",
            )
            .await?;
        object(&envelope, "analytics")
    }

    pub async fn doctors(&self) -> SyncResult<Vec<Doctor>> {
        let envelope = self
            .client
            .fetch(ApiRequest::get("/api/hospital/doctors"), "Failed to load doctors")
            .await?;
        list(&envelope, "doctors")
    }

    pub async fn departments(&self) -> SyncResult<Vec<Department>> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get("/api/hospital/departments"),
                "Failed to load departments",
            )
            .await?;
        list(&envelope, "departments")
    }

    /// Registers a doctor, then returns the refreshed staff list.
    pub async fn add_doctor(&self, doctor: &NewDoctor) -> SyncResult<Vec<Doctor>> {
        let pattern = Pattern::Digits(UID_LEN);
        if !pattern.matches(&doctor.uid) {
            return Err(self.client.refuse(
                "UID must be exactly 16 digits",
                FieldError::new("uid", FieldErrorKind::Pattern(pattern.describe())),
            ));
        }
        let body = json_body(serde_json::to_value(doctor)?);
        self.client
            .fetch(
                ApiRequest::post("/api/hospital/doctors/add", body),
                "An error occurred while adding the doctor.",
            )
            .await?;
        info!("doctor {} added", doctor.uid);
        self.client.alert("Doctor added successfully!");
        self.doctors().await
    }

    /// Creates a department, then returns the refreshed list.
    pub async fn add_department(&self, department: &NewDepartment) -> SyncResult<Vec<Department>> {
        if department.name.trim().is_empty() {
            return Err(self.client.refuse(
                "Department name is required",
                FieldError::new("name", FieldErrorKind::Missing),
            ));
        }
        let body = json_body(serde_json::to_value(department)?);
        self.client
            .fetch(
                ApiRequest::post("/api/hospital/departments/add", body),
                "An error occurred while adding the department.",
            )
            .await?;
        info!("department {} added", department.name);
        self.client.alert("Department added successfully!");
        self.departments().await
    }

    /// Deletes a department after the user confirms, then returns the
    /// refreshed list.
    pub async fn delete_department(&self, id: RecordId) -> SyncResult<Outcome<Vec<Department>>> {
        if !self
            .client
            .confirm("Are you sure you want to delete this department?")
        {
            debug!("delete of department {id} cancelled");
            return Ok(Outcome::Cancelled);
        }
        let request = ApiRequest::new(
            HttpMethod::Delete,
            format!("/api/hospital/departments/delete/{id}"),
        );
        let attempt = self
            .client
            .attempt(request, "Failed to delete department")
            .await?;
        if attempt.is_ok() {
            info!("department {id} deleted");
        }
        Outcome::after(attempt, self.departments()).await
    }
}
