use super::{FALLBACK_COLOR, or, set_all};
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::{WireFields, lenient_count, lenient_text};
use crate::record::Record;
use crate::schema::{BodyEncoding, Endpoints, FormField, Messages, ModuleSchema};
use crate::view::{Badge, Card, CardLine, StatTile, StatsView, Tone};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub static VACCINATION: ModuleSchema = ModuleSchema {
    name: "vaccination",
    noun: "vaccination",
    title: "Vaccination",
    collection_key: "vaccinations",
    stats_key: Some("stats"),
    endpoints: Endpoints::rest("/api/vaccination", "/api/vaccination/{id}"),
    encoding: BodyEncoding::Json,
    fields: &[
        FormField::text("vaccine_name", "Vaccine Name").required(),
        FormField::date("vaccination_date", "Vaccination Date").required(),
        FormField::text("category", "Category").required(),
        FormField::text("dose_number", "Dose").required(),
        FormField::date("next_due_date", "Next Due Date").null_when_empty(),
        FormField::choice(
            "status",
            "Status",
            &["Completed", "Scheduled", "Missed", "Upcoming", "Overdue"],
        )
        .defaulting_to("Completed"),
        FormField::text("manufacturer", "Manufacturer").null_when_empty(),
        FormField::text("batch_lot_number", "Batch/Lot Number").null_when_empty(),
        FormField::text("hospital_clinic_name", "Hospital/Clinic").null_when_empty(),
        FormField::text("doctor_nurse_name", "Doctor/Nurse").null_when_empty(),
        FormField::text("side_effects", "Side Effects").null_when_empty(),
        FormField::text("notes", "Notes").null_when_empty(),
    ],
    suggestions: None,
    attachments: None,
    any_of: None,
    messages: Messages::NONE,
};

/// A vaccination dose, given or planned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", rename_all = "camelCase")]
pub struct Vaccination {
    pub id: RecordId,
    pub vaccine_name: Option<String>,
    pub vaccination_date: Option<String>,
    pub category: Option<String>,
    pub dose_number: Option<String>,
    pub next_due_date: Option<String>,
    pub status: Option<String>,
    pub manufacturer: Option<String>,
    pub batch_lot_number: Option<String>,
    pub hospital_clinic_name: Option<String>,
    pub doctor_nurse_name: Option<String>,
    pub side_effects: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<Map<String, Value>> for Vaccination {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            vaccine_name: f.text(&["vaccineName", "vaccine_name"]),
            vaccination_date: f.text(&["vaccinationDate", "vaccination_date"]),
            category: f.text(&["category"]),
            dose_number: f.text(&["doseNumber", "dose_number"]),
            next_due_date: f.text(&["nextDueDate", "next_due_date"]),
            status: f.text(&["status"]),
            manufacturer: f.text(&["manufacturer"]),
            batch_lot_number: f.text(&["batchLotNumber", "batch_lot_number"]),
            hospital_clinic_name: f.text(&["hospitalClinicName", "hospital_clinic_name"]),
            doctor_nurse_name: f.text(&["doctorNurseName", "doctor_nurse_name"]),
            side_effects: f.text(&["sideEffects", "side_effects"]),
            notes: f.text(&["notes"]),
        })
    }
}

/// Badge colour for a vaccination status, matched case-insensitively.
pub fn vaccination_status_color(status: Option<&str>) -> &'static str {
    match status.map(str::to_lowercase).as_deref() {
        Some("completed") => "#4CAF50",
        Some("scheduled") => "#2196F3",
        Some("missed") => "#FF9800",
        Some("upcoming") => "#9C27B0",
        Some("overdue") => "#E63946",
        _ => FALLBACK_COLOR,
    }
}

impl Record for Vaccination {
    type Stats = VaccinationStats;

    fn schema() -> &'static ModuleSchema {
        &VACCINATION
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let subtitle = format!(
            "{} • {}",
            self.category.as_deref().unwrap_or_default(),
            self.dose_number.as_deref().unwrap_or_default()
        );
        let mut card = Card::new(self.id, or(&self.vaccine_name, "Unknown"))
            .subtitle(Some(subtitle))
            .badge(Badge::new(
                or(&self.status, "Unknown"),
                Tone::Hex(vaccination_status_color(self.status.as_deref())),
            ))
            .line(CardLine::labeled("Date", or(&self.vaccination_date, "N/A")))
            .line_if("Next Due", self.next_due_date.as_deref());
        if let Some(manufacturer) = &self.manufacturer {
            card = card.line(CardLine::muted(manufacturer));
        }
        card
    }

    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        set_all(
            &mut form,
            &[
                ("vaccine_name", &self.vaccine_name),
                ("vaccination_date", &self.vaccination_date),
                ("category", &self.category),
                ("dose_number", &self.dose_number),
                ("next_due_date", &self.next_due_date),
                ("status", &self.status),
                ("manufacturer", &self.manufacturer),
                ("batch_lot_number", &self.batch_lot_number),
                ("hospital_clinic_name", &self.hospital_clinic_name),
                ("doctor_nurse_name", &self.doctor_nurse_name),
                ("side_effects", &self.side_effects),
                ("notes", &self.notes),
            ],
        );
        form
    }
}

/// Server-computed vaccination stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaccinationStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub upcoming: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub overdue: u64,
    #[serde(
        default,
        alias = "lastUpdated",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

impl VaccinationStats {
    /// `last_updated` as `YYYY-MM-DD`, `N/A` when absent. Text that is not a
    /// recognisable timestamp is shown as sent.
    pub fn last_updated_label(&self) -> String {
        match self.last_updated.as_deref() {
            None => "N/A".to_string(),
            Some(raw) => parse_day(raw)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| raw.to_string()),
        }
    }
}

fn parse_day(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

impl StatsView for VaccinationStats {
    fn tiles(&self) -> Vec<StatTile> {
        vec![
            StatTile::new("Total", self.total),
            StatTile::new("Upcoming", self.upcoming),
            StatTile::new("Overdue", self.overdue),
            StatTile::new("Last Updated", self.last_updated_label()),
        ]
    }
}
