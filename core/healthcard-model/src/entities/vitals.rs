use super::{or, set_all};
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::WireFields;
use crate::record::Record;
use crate::schema::{
    AnyOf, BodyEncoding, Endpoints, FormField, HttpMethod, Messages, ModuleSchema, Route,
};
use crate::view::{Action, Card, CardLine, StatTile, StatsView};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_UNIT: &str = "F";

/// Shown in a KPI tile with no reading yet.
pub const NO_READING: &str = "--";

/// Measurement fields; a vital record needs at least one of them.
const MEASUREMENTS: &[&str] = &[
    "blood_pressure_systolic",
    "blood_pressure_diastolic",
    "heart_rate",
    "blood_sugar_fasting",
    "blood_sugar_pp",
    "blood_sugar_random",
    "weight",
    "height",
    "spo2",
    "temperature",
    "respiratory_rate",
];

pub static VITALS: ModuleSchema = ModuleSchema {
    name: "vitals",
    noun: "vital",
    title: "Vital",
    collection_key: "vitals",
    stats_key: None,
    endpoints: Endpoints {
        list: "/api/vitals",
        create: Some(Route::new(HttpMethod::Post, "/api/vitals")),
        update: None,
        delete: Some(Route::new(HttpMethod::Delete, "/api/vitals/{id}")),
    },
    encoding: BodyEncoding::Json,
    fields: &[
        FormField::number("blood_pressure_systolic", "Systolic").null_when_empty(),
        FormField::number("blood_pressure_diastolic", "Diastolic").null_when_empty(),
        FormField::number("heart_rate", "Heart Rate").null_when_empty(),
        FormField::number("blood_sugar_fasting", "Fasting Sugar").null_when_empty(),
        FormField::number("blood_sugar_pp", "Post-meal Sugar").null_when_empty(),
        FormField::number("blood_sugar_random", "Random Sugar").null_when_empty(),
        FormField::number("weight", "Weight (kg)").null_when_empty(),
        FormField::number("height", "Height (cm)").null_when_empty(),
        FormField::number("bmi", "BMI").null_when_empty(),
        FormField::number("spo2", "SpO2").null_when_empty(),
        FormField::number("temperature", "Temperature").null_when_empty(),
        FormField::choice("temperature_unit", "Unit", &["F", "C"]).defaulting_to(DEFAULT_UNIT),
        FormField::number("respiratory_rate", "Respiratory Rate").null_when_empty(),
        FormField::text("vital_type", "Type"),
        FormField::text("notes", "Notes"),
        FormField::text("recorded_at", "Recorded At"),
    ],
    suggestions: None,
    attachments: None,
    any_of: Some(AnyOf {
        fields: MEASUREMENTS,
        message: "Please fill at least one vital measurement.",
    }),
    messages: Messages {
        created: Some("Vital recorded successfully!"),
        updated: None,
        confirm_delete: Some("Delete this vital record?"),
    },
};

/// Body mass index from weight in kg and height in cm.
///
/// `None` unless both are positive.
pub fn bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if weight_kg <= 0.0 || height_cm <= 0.0 {
        return None;
    }
    let metres = height_cm / 100.0;
    Some(weight_kg / (metres * metres))
}

/// BMI with one decimal, as shown in the form and the KPI tile.
pub fn format_bmi(value: f64) -> String {
    format!("{value:.1}")
}

/// One self-recorded set of vital signs.
///
/// Measurements are kept as the server's text so the record stays `Eq`;
/// [`VitalRecord::reading`] parses them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct VitalRecord {
    pub id: RecordId,
    pub blood_pressure_systolic: Option<String>,
    pub blood_pressure_diastolic: Option<String>,
    pub heart_rate: Option<String>,
    pub blood_sugar_fasting: Option<String>,
    pub blood_sugar_pp: Option<String>,
    pub blood_sugar_random: Option<String>,
    pub weight: Option<String>,
    pub height: Option<String>,
    pub bmi: Option<String>,
    pub spo2: Option<String>,
    pub temperature: Option<String>,
    pub temperature_unit: String,
    pub respiratory_rate: Option<String>,
    pub vital_type: Option<String>,
    pub notes: Option<String>,
    pub recorded_at: Option<String>,
}

impl TryFrom<Map<String, Value>> for VitalRecord {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            blood_pressure_systolic: f.text(&["blood_pressure_systolic", "bloodPressureSystolic"]),
            blood_pressure_diastolic: f
                .text(&["blood_pressure_diastolic", "bloodPressureDiastolic"]),
            heart_rate: f.text(&["heart_rate", "heartRate"]),
            blood_sugar_fasting: f.text(&["blood_sugar_fasting", "bloodSugarFasting"]),
            blood_sugar_pp: f.text(&["blood_sugar_pp", "bloodSugarPp"]),
            blood_sugar_random: f.text(&["blood_sugar_random", "bloodSugarRandom"]),
            weight: f.text(&["weight"]),
            height: f.text(&["height"]),
            bmi: f.text(&["bmi"]),
            spo2: f.text(&["spo2", "oxygen_saturation"]),
            temperature: f.text(&["temperature"]),
            temperature_unit: f
                .text(&["temperature_unit", "temperatureUnit"])
                .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
            respiratory_rate: f.text(&["respiratory_rate", "respiratoryRate"]),
            vital_type: f.text(&["vital_type", "vitalType"]),
            notes: f.text(&["notes"]),
            recorded_at: f.text(&["recorded_at", "recordedAt", "created_at"]),
        })
    }
}

fn reading(value: &Option<String>) -> Option<f64> {
    value.as_deref().and_then(|v| v.trim().parse().ok())
}

/// Whole numbers without a trailing `.0`.
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

impl VitalRecord {
    /// `systolic/diastolic mmHg` when both are recorded.
    pub fn blood_pressure(&self) -> Option<String> {
        let s = reading(&self.blood_pressure_systolic)?;
        let d = reading(&self.blood_pressure_diastolic)?;
        Some(format!("{}/{} mmHg", trim_number(s), trim_number(d)))
    }

    /// The first recorded sugar reading: fasting, then random, then post-meal.
    pub fn blood_sugar(&self) -> Option<f64> {
        reading(&self.blood_sugar_fasting)
            .or_else(|| reading(&self.blood_sugar_random))
            .or_else(|| reading(&self.blood_sugar_pp))
    }

    /// The stored BMI, or one computed from weight and height.
    pub fn body_mass_index(&self) -> Option<f64> {
        reading(&self.bmi).or_else(|| bmi(reading(&self.weight)?, reading(&self.height)?))
    }
}

impl Record for VitalRecord {
    type Stats = VitalsStats;

    fn schema() -> &'static ModuleSchema {
        &VITALS
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let mut card = Card::new(self.id, or(&self.recorded_at, "Vital Record"))
            .subtitle(self.vital_type.clone())
            .actions(&[Action::Delete]);
        if let Some(bp) = self.blood_pressure() {
            card = card.line(CardLine::labeled("BP", bp));
        }
        if let Some(hr) = reading(&self.heart_rate) {
            card = card.line(CardLine::labeled("Heart Rate", format!("{} bpm", trim_number(hr))));
        }
        if let Some(sugar) = self.blood_sugar() {
            card = card.line(CardLine::labeled(
                "Sugar",
                format!("{} mg/dL", trim_number(sugar)),
            ));
        }
        if let Some(weight) = reading(&self.weight) {
            card = card.line(CardLine::labeled("Weight", format!("{} kg", trim_number(weight))));
        }
        if let Some(value) = self.body_mass_index() {
            card = card.line(CardLine::labeled("BMI", format_bmi(value)));
        }
        if let Some(spo2) = reading(&self.spo2) {
            card = card.line(CardLine::labeled("SpO2", format!("{}%", trim_number(spo2))));
        }
        if let Some(temp) = reading(&self.temperature) {
            card = card.line(CardLine::labeled(
                "Temperature",
                format!("{}°{}", trim_number(temp), self.temperature_unit),
            ));
        }
        if let Some(notes) = &self.notes {
            card = card.line(CardLine::muted(notes));
        }
        card
    }

    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        set_all(
            &mut form,
            &[
                ("blood_pressure_systolic", &self.blood_pressure_systolic),
                ("blood_pressure_diastolic", &self.blood_pressure_diastolic),
                ("heart_rate", &self.heart_rate),
                ("blood_sugar_fasting", &self.blood_sugar_fasting),
                ("blood_sugar_pp", &self.blood_sugar_pp),
                ("blood_sugar_random", &self.blood_sugar_random),
                ("weight", &self.weight),
                ("height", &self.height),
                ("bmi", &self.bmi),
                ("spo2", &self.spo2),
                ("temperature", &self.temperature),
                ("respiratory_rate", &self.respiratory_rate),
                ("vital_type", &self.vital_type),
                ("notes", &self.notes),
                ("recorded_at", &self.recorded_at),
            ],
        );
        form.set("temperature_unit", self.temperature_unit.as_str());
        form
    }

    fn derive_stats(records: &[Self], _reported: Option<Self::Stats>) -> Option<Self::Stats> {
        Some(VitalsStats::latest(records))
    }
}

/// Latest reading of each KPI, newest record first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VitalsStats {
    pub blood_pressure: Option<String>,
    pub heart_rate: Option<String>,
    pub blood_sugar: Option<String>,
    pub weight: Option<String>,
    pub bmi: Option<String>,
}

impl VitalsStats {
    /// Takes each KPI from the first record that has it. The list endpoint
    /// returns records newest first.
    pub fn latest(records: &[VitalRecord]) -> Self {
        Self {
            blood_pressure: records.iter().find_map(VitalRecord::blood_pressure),
            heart_rate: records
                .iter()
                .find_map(|r| reading(&r.heart_rate))
                .map(|v| format!("{} bpm", trim_number(v))),
            blood_sugar: records
                .iter()
                .find_map(VitalRecord::blood_sugar)
                .map(|v| format!("{} mg/dL", trim_number(v))),
            weight: records
                .iter()
                .find_map(|r| reading(&r.weight))
                .map(|v| format!("{} kg", trim_number(v))),
            bmi: records
                .iter()
                .find_map(VitalRecord::body_mass_index)
                .map(format_bmi),
        }
    }
}

impl StatsView for VitalsStats {
    fn tiles(&self) -> Vec<StatTile> {
        let tile = |label, value: &Option<String>| {
            StatTile::new(label, value.as_deref().unwrap_or(NO_READING))
        };
        vec![
            tile("Blood Pressure", &self.blood_pressure),
            tile("Heart Rate", &self.heart_rate),
            tile("Blood Sugar", &self.blood_sugar),
            tile("Weight", &self.weight),
            tile("BMI", &self.bmi),
        ]
    }
}
