//! Doctor dashboard: today's queue, appointments, patient search,
//! OTP-gated access to a patient's records, consultations, and the
//! patient's medical history, vitals and investigations.

use super::{DashboardClient, Outcome, json_body, list, object};
use crate::error::SyncResult;
use crate::prompt::Prompt;
use crate::transport::{ApiRequest, RecordTransport};
use healthcard_model::{
    FieldError, FieldErrorKind, HttpMethod, Pattern, Tone, lenient_count, lenient_text,
};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Digits in an access OTP.
pub const OTP_LEN: usize = 6;

/// Seconds an OTP stays valid on screen.
pub const OTP_SECONDS: u32 = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorStats {
    #[serde(default, alias = "today_appointments", deserialize_with = "lenient_count")]
    pub today_appointments: u64,
    #[serde(default, alias = "pending_patients", deserialize_with = "lenient_count")]
    pub pending_patients: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub completed: u64,
    #[serde(default, alias = "lab_reports", deserialize_with = "lenient_count")]
    pub lab_reports: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub time: Option<String>,
    /// Patient display name.
    #[serde(default, deserialize_with = "lenient_text")]
    pub patient: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub uid: Option<String>,
    #[serde(default, rename = "type", deserialize_with = "lenient_text")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
}

impl Appointment {
    /// Waiting or already with the doctor.
    pub fn is_in_queue(&self) -> bool {
        matches!(self.status.as_deref(), Some("Waiting" | "In Progress"))
    }
}

/// Badge tone for an appointment status.
pub fn appointment_status_tone(status: &str) -> Tone {
    match status.to_lowercase().as_str() {
        "completed" => Tone::Success,
        "in progress" => Tone::Danger,
        "waiting" => Tone::Warning,
        "scheduled" => Tone::Primary,
        _ => Tone::Secondary,
    }
}

/// Today's appointments and who is up next.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodaySchedule {
    pub appointments: Vec<Appointment>,
    /// First appointment still in the queue.
    pub next_patient: Option<Appointment>,
}

impl TodaySchedule {
    pub fn new(appointments: Vec<Appointment>) -> Self {
        let next_patient = appointments.iter().find(|a| a.is_in_queue()).cloned();
        Self {
            appointments,
            next_patient,
        }
    }
}

/// A patient search hit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientMatch {
    #[serde(default, deserialize_with = "lenient_text")]
    pub uid: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub full_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub image: Option<String>,
}

/// The on-screen countdown after an OTP is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OtpCountdown {
    remaining: u32,
}

impl Default for OtpCountdown {
    fn default() -> Self {
        Self::start()
    }
}

impl OtpCountdown {
    pub fn start() -> Self {
        Self {
            remaining: OTP_SECONDS,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// One second passes. Returns the seconds left.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// `00:SS`
    pub fn label(&self) -> String {
        format!("00:{:02}", self.remaining)
    }

    /// Ticks once per second until expiry, handing each new label to
    /// `on_tick`.
    pub async fn run(mut self, mut on_tick: impl FnMut(&str)) {
        let mut interval = tokio::time::interval(Duration::from_secs(1));
        interval.tick().await;
        while !self.is_expired() {
            interval.tick().await;
            self.tick();
            on_tick(&self.label());
        }
    }
}

/// One line of a consultation's prescription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrescriptionLine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
    pub instructions: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Urgency {
    #[default]
    Routine,
    Urgent,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabOrder {
    pub test_name: String,
    pub urgency: Urgency,
}

/// A SOAP consultation note with its prescriptions and lab orders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consultation {
    pub patient_uid: String,
    pub subjective: String,
    pub objective: String,
    pub assessment: String,
    pub plan: String,
    pub prescriptions: Vec<PrescriptionLine>,
    pub lab_orders: Vec<LabOrder>,
}

impl Consultation {
    /// The note as sent: prescription and lab rows without a name are
    /// left out.
    pub fn submitted(&self) -> Self {
        Self {
            prescriptions: self
                .prescriptions
                .iter()
                .filter(|p| !p.name.trim().is_empty())
                .cloned()
                .collect(),
            lab_orders: self
                .lab_orders
                .iter()
                .filter(|o| !o.test_name.trim().is_empty())
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

/// Display label of a medical history record type.
pub fn record_type_label(record_type: &str) -> &str {
    match record_type {
        "chronic" => "Chronic",
        "past_illness" => "Past Illness",
        "hospitalization" => "Hospitalization",
        "ncd" => "NCD",
        "communicable" => "Communicable",
        "genetic" => "Genetic",
        "mental_health" => "Mental Health",
        other => other,
    }
}

/// Badge tone for a condition's severity.
pub fn condition_severity_tone(severity: &str) -> Tone {
    match severity {
        "mild" => Tone::Info,
        "moderate" => Tone::Warning,
        "severe" => Tone::Danger,
        _ => Tone::Secondary,
    }
}

/// A condition in a patient's medical history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicalHistoryEntry {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub record_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub condition_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub diagnosis_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub severity: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, deserialize_with = "lenient_text")]
    pub treatment: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
}

/// The add-condition form. Empty optional fields are sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewMedicalHistory {
    pub record_type: String,
    pub condition_name: String,
    pub diagnosis_date: String,
    pub severity: String,
    pub is_active: bool,
    pub treatment: String,
    pub notes: String,
}

impl NewMedicalHistory {
    fn body(&self) -> Value {
        json!({
            "record_type": self.record_type.trim(),
            "condition_name": self.condition_name.trim(),
            "diagnosis_date": nullable(&self.diagnosis_date),
            "severity": nullable(&self.severity),
            "is_active": self.is_active,
            "treatment": nullable(&self.treatment),
            "notes": nullable(&self.notes),
        })
    }
}

/// Trimmed text, or `null` when empty.
fn nullable(s: &str) -> Value {
    let s = s.trim();
    if s.is_empty() { Value::Null } else { Value::from(s) }
}

/// A set of vitals taken by a clinician.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientVital {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recorded_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub systolic_bp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub diastolic_bp: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub heart_rate: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub respiratory_rate: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub spo2: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub temperature: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub pain_score: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub bmi: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub doctor: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub health_worker: Option<String>,
}

impl PatientVital {
    /// `systolic/diastolic` when both were taken.
    pub fn blood_pressure(&self) -> Option<String> {
        match (&self.systolic_bp, &self.diastolic_bp) {
            (Some(s), Some(d)) => Some(format!("{s}/{d}")),
            _ => None,
        }
    }

    /// The doctor, else the health worker.
    pub fn recorded_by(&self) -> Option<&str> {
        self.doctor.as_deref().or(self.health_worker.as_deref())
    }
}

/// The record-vitals form. Every reading is optional; empty ones are
/// sent as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPatientVitals {
    pub systolic_bp: String,
    pub diastolic_bp: String,
    pub heart_rate: String,
    pub respiratory_rate: String,
    pub spo2: String,
    pub temperature: String,
    pub pain_score: String,
    pub blood_sugar: String,
    pub weight: String,
    pub height: String,
    pub visit_type: String,
    pub notes: String,
}

impl NewPatientVitals {
    fn body(&self) -> Value {
        json!({
            "systolic_bp": nullable(&self.systolic_bp),
            "diastolic_bp": nullable(&self.diastolic_bp),
            "heart_rate": nullable(&self.heart_rate),
            "respiratory_rate": nullable(&self.respiratory_rate),
            "spo2": nullable(&self.spo2),
            "temperature": nullable(&self.temperature),
            "pain_score": nullable(&self.pain_score),
            "blood_sugar": nullable(&self.blood_sugar),
            "weight": nullable(&self.weight),
            "height": nullable(&self.height),
            "visit_type": self.visit_type.trim(),
            "notes": nullable(&self.notes),
        })
    }
}

/// Kind of investigation a doctor can order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvestigationType {
    Lab,
    Imaging,
    Pathology,
    Microbiology,
}

impl InvestigationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lab => "lab",
            Self::Imaging => "imaging",
            Self::Pathology => "pathology",
            Self::Microbiology => "microbiology",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lab" => Some(Self::Lab),
            "imaging" => Some(Self::Imaging),
            "pathology" => Some(Self::Pathology),
            "microbiology" => Some(Self::Microbiology),
            _ => None,
        }
    }

    /// Categories offered once the type is picked.
    pub fn categories(&self) -> &'static [&'static str] {
        match self {
            Self::Lab => &["Blood Test", "Urine Test", "Stool Test", "CSF", "Other"],
            Self::Imaging => &["X-Ray", "CT Scan", "MRI", "Ultrasound", "ECG", "Echo", "Other"],
            Self::Pathology => &["Biopsy", "Cytology", "Histopathology", "Other"],
            Self::Microbiology => &[
                "Blood Culture",
                "Urine Culture",
                "Sputum Culture",
                "Wound Swab",
                "Sensitivity",
                "Other",
            ],
        }
    }
}

/// Badge tone for an investigation's status.
pub fn investigation_status_tone(status: &str) -> Tone {
    match status {
        "Ordered" => Tone::Warning,
        "Completed" => Tone::Success,
        "Processing" => Tone::Info,
        _ => Tone::Secondary,
    }
}

/// Characters of an impression shown in a result column.
const IMPRESSION_PREVIEW: usize = 50;

/// An ordered lab, imaging, pathology or microbiology test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Investigation {
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_text")]
    pub ordered_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub investigation_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub test_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub result_value: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub result_unit: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub impression: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub orderer: Option<String>,
}

impl Investigation {
    /// The value with its unit, else the start of the impression.
    pub fn result_summary(&self) -> Option<String> {
        if let Some(value) = &self.result_value {
            return Some(match &self.result_unit {
                Some(unit) => format!("{value} {unit}"),
                None => value.clone(),
            });
        }
        self.impression.as_deref().map(|text| {
            let preview: String = text.chars().take(IMPRESSION_PREVIEW).collect();
            format!("{preview}...")
        })
    }
}

/// The order-investigation form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewInvestigation {
    pub investigation_type: String,
    pub category: String,
    pub test_name: String,
    pub urgency: Urgency,
    pub clinical_indication: String,
    pub notes: String,
}

impl NewInvestigation {
    fn body(&self) -> SyncResult<Value> {
        Ok(json!({
            "investigation_type": self.investigation_type.trim(),
            "category": nullable(&self.category),
            "test_name": self.test_name.trim(),
            "urgency": serde_json::to_value(self.urgency)?,
            "clinical_indication": nullable(&self.clinical_indication),
            "notes": nullable(&self.notes),
        }))
    }
}

/// A patient's medical history plus counts of the other record modules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicalRecords {
    #[serde(default)]
    pub medical_history: Vec<MedicalHistoryEntry>,
    #[serde(default)]
    pub lifestyle: Option<Value>,
    #[serde(default, deserialize_with = "lenient_count")]
    pub allergies_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub surgeries_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub vaccinations_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub implants_count: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub family_history_count: u64,
}

/// Client for the doctor dashboard endpoints.
#[derive(Clone)]
pub struct DoctorDashboard {
    client: DashboardClient,
}

impl DoctorDashboard {
    pub fn new(transport: Arc<dyn RecordTransport>, prompt: Arc<dyn Prompt>) -> Self {
        Self {
            client: DashboardClient::new(transport, prompt),
        }
    }

    pub async fn stats(&self) -> SyncResult<DoctorStats> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get("/api/doctor/dashboard/stats"),
                "Failed to load dashboard statistics",
            )
            .await?;
        object(&envelope, "stats")
    }

    pub async fn today(&self) -> SyncResult<TodaySchedule> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get("/api/doctor/appointments/today"),
                "Failed to load appointments",
            )
            .await?;
        Ok(TodaySchedule::new(list(&envelope, "appointments")?))
    }

    /// Stats and today's schedule, fetched concurrently.
    pub async fn overview(&self) -> SyncResult<(DoctorStats, TodaySchedule)> {
        futures::try_join!(self.stats(), self.today())
    }

    /// All appointments. An empty filter means `all`.
    pub async fn appointments(&self, filter: &str) -> SyncResult<Vec<Appointment>> {
        let filter = if filter.is_empty() { "all" } else { filter };
        let request = ApiRequest::get("/api/doctor/appointments/all").query([("filter", filter)]);
        let envelope = self
            .client
            .fetch(request, "Failed to load appointments")
            .await?;
        list(&envelope, "appointments")
    }

    pub async fn search_patients(&self, query: &str) -> SyncResult<Vec<PatientMatch>> {
        let request = ApiRequest::get("/api/doctor/patients/search").query([("query", query)]);
        let envelope = self
            .client
            .fetch(request, "Error searching patients")
            .await?;
        list(&envelope, "patients")
    }

    pub async fn patient_summary(&self, uid: &str) -> SyncResult<Value> {
        let path = format!("/api/doctor/patient/{}/summary", urlencoding::encode(uid));
        let envelope = self
            .client
            .fetch(ApiRequest::get(path), "Patient not found")
            .await?;
        Ok(envelope.raw("summary").cloned().unwrap_or(Value::Null))
    }

    /// Asks the server to send the patient an access OTP and starts the
    /// countdown.
    pub async fn request_access(&self, patient_uid: &str) -> SyncResult<OtpCountdown> {
        let body = json_body(json!({ "patient_uid": patient_uid }));
        self.client
            .fetch(
                ApiRequest::post("/api/doctor/request-access", body),
                "Failed to send OTP",
            )
            .await?;
        info!("OTP sent to patient {patient_uid}");
        Ok(OtpCountdown::start())
    }

    /// Verifies the OTP the patient read out. Returns the URL of the
    /// patient's records.
    pub async fn verify_access(&self, patient_uid: &str, otp: &str) -> SyncResult<String> {
        let pattern = Pattern::Digits(OTP_LEN);
        if !pattern.matches(otp) {
            return Err(self.client.refuse(
                "Please enter a valid 6-digit OTP",
                FieldError::new("otp", FieldErrorKind::Pattern(pattern.describe())),
            ));
        }
        let body = json_body(json!({ "patient_uid": patient_uid, "otp": otp }));
        let envelope = self
            .client
            .fetch(
                ApiRequest::post("/api/doctor/verify-access", body),
                "Verification failed",
            )
            .await?;
        info!("access to patient {patient_uid} granted");
        Ok(envelope
            .raw("redirect_url")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    /// Saves a consultation note for the patient in the workspace.
    pub async fn save_consultation(&self, consultation: &Consultation) -> SyncResult<Outcome<()>> {
        let body = json_body(serde_json::to_value(consultation.submitted())?);
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post("/api/doctor/consultation/save", body),
                "Error saving consultation",
                "Error saving consultation: ",
            )
            .await?;
        if attempt.is_ok() {
            info!("consultation for patient {} saved", consultation.patient_uid);
            self.client.alert("Consultation saved successfully!");
        }
        Outcome::after(attempt, async { Ok(()) }).await
    }

    pub async fn medical_records(&self, uid: &str) -> SyncResult<MedicalRecords> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get(medical_path(uid, "medical-records")),
                "Error loading medical records",
            )
            .await?;
        Ok(serde_json::from_value(Value::Object(envelope.body))?)
    }

    /// Adds a condition to the patient's history, then returns the
    /// reloaded records.
    pub async fn add_medical_history(
        &self,
        uid: &str,
        entry: &NewMedicalHistory,
    ) -> SyncResult<Outcome<MedicalRecords>> {
        for (field, value) in [
            ("record_type", &entry.record_type),
            ("condition_name", &entry.condition_name),
        ] {
            if value.trim().is_empty() {
                return Err(self.client.refuse(
                    "Please fill in required fields",
                    FieldError::new(field, FieldErrorKind::Missing),
                ));
            }
        }
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post(medical_path(uid, "medical-history"), json_body(entry.body())),
                "Unknown error",
                "Error: ",
            )
            .await?;
        let outcome = Outcome::after(attempt, self.medical_records(uid)).await?;
        if matches!(outcome, Outcome::Done(_)) {
            info!("medical history added for patient {uid}");
            self.client.alert("Medical history record added successfully!");
        }
        Ok(outcome)
    }

    /// Deletes a condition after the doctor confirms, then returns the
    /// reloaded records.
    pub async fn delete_medical_history(
        &self,
        uid: &str,
        id: RecordId,
    ) -> SyncResult<Outcome<MedicalRecords>> {
        if !self
            .client
            .confirm("Are you sure you want to delete this record?")
        {
            debug!("delete of medical history {id} cancelled");
            return Ok(Outcome::Cancelled);
        }
        let request = ApiRequest::new(
            HttpMethod::Delete,
            format!("{}/{id}", medical_path(uid, "medical-history")),
        );
        let attempt = self
            .client
            .attempt_labeled(request, "Unknown error", "Error: ")
            .await?;
        if attempt.is_ok() {
            info!("medical history {id} of patient {uid} deleted");
        }
        Outcome::after(attempt, self.medical_records(uid)).await
    }

    /// Vitals clinicians have taken for the patient.
    pub async fn patient_vitals(&self, uid: &str) -> SyncResult<Vec<PatientVital>> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get(medical_path(uid, "vitals")),
                "Error loading vitals",
            )
            .await?;
        list(&envelope, "vitals")
    }

    /// Records a set of vitals, then returns the reloaded list.
    pub async fn record_vitals(
        &self,
        uid: &str,
        vitals: &NewPatientVitals,
    ) -> SyncResult<Outcome<Vec<PatientVital>>> {
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post(medical_path(uid, "vitals"), json_body(vitals.body())),
                "Unknown error",
                "Error: ",
            )
            .await?;
        let outcome = Outcome::after(attempt, self.patient_vitals(uid)).await?;
        if matches!(outcome, Outcome::Done(_)) {
            info!("vitals recorded for patient {uid}");
            self.client.alert("Vitals recorded successfully!");
        }
        Ok(outcome)
    }

    pub async fn investigations(&self, uid: &str) -> SyncResult<Vec<Investigation>> {
        let envelope = self
            .client
            .fetch(
                ApiRequest::get(medical_path(uid, "investigations")),
                "Error loading investigations",
            )
            .await?;
        list(&envelope, "investigations")
    }

    /// Orders an investigation, then returns the reloaded list.
    pub async fn order_investigation(
        &self,
        uid: &str,
        order: &NewInvestigation,
    ) -> SyncResult<Outcome<Vec<Investigation>>> {
        for (field, value) in [
            ("investigation_type", &order.investigation_type),
            ("test_name", &order.test_name),
        ] {
            if value.trim().is_empty() {
                return Err(self.client.refuse(
                    "Please fill required fields",
                    FieldError::new(field, FieldErrorKind::Missing),
                ));
            }
        }
        let attempt = self
            .client
            .attempt_labeled(
                ApiRequest::post(medical_path(uid, "investigations"), json_body(order.body()?)),
                "Unknown error",
                "Error: ",
            )
            .await?;
        let outcome = Outcome::after(attempt, self.investigations(uid)).await?;
        if matches!(outcome, Outcome::Done(_)) {
            info!("{} ordered for patient {uid}", order.test_name.trim());
            self.client.alert("Investigation ordered successfully!");
        }
        Ok(outcome)
    }
}

fn medical_path(uid: &str, tail: &str) -> String {
    format!("/api/patient/{}/{tail}", urlencoding::encode(uid))
}
