use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::{WireFields, lenient_count, lenient_text};
use crate::record::Record;
use crate::schema::{BodyEncoding, Endpoints, Messages, ModuleSchema};
use crate::view::{Badge, Card, CardLine, LineStyle, StatTile, StatsView, Tone};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub static HEALTH_ASSESSMENTS: ModuleSchema = ModuleSchema {
    name: "health_assessments",
    noun: "health assessment",
    title: "Health Assessment",
    collection_key: "assessments",
    stats_key: None,
    endpoints: Endpoints::read_only("/api/client/health-assessments"),
    encoding: BodyEncoding::Json,
    fields: &[],
    suggestions: None,
    attachments: None,
    any_of: None,
    messages: Messages::NONE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PregnancyData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub gestational_week: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub edd: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub weight: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub height: Option<String>,
}

/// Non-communicable disease screening.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcdData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub condition: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalHealthData {
    #[serde(default, deserialize_with = "lenient_text")]
    pub phq2_score: Option<String>,
}

/// A community health worker's assessment visit. Read-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct HealthAssessment {
    pub id: RecordId,
    pub date: Option<String>,
    pub assessment_type: Option<String>,
    pub systolic_bp: Option<String>,
    pub diastolic_bp: Option<String>,
    pub pulse: Option<String>,
    pub temperature: Option<String>,
    pub spo2: Option<String>,
    pub blood_glucose: Option<String>,
    pub weight: Option<String>,
    pub pregnancy: Option<PregnancyData>,
    pub child: Option<ChildData>,
    pub ncd: Option<NcdData>,
    pub mental_health: Option<MentalHealthData>,
    pub referral_made: bool,
    pub notes: Option<String>,
    pub health_worker: Option<String>,
    pub follow_up_date: Option<String>,
}

impl TryFrom<Map<String, Value>> for HealthAssessment {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            date: f.text(&["date", "assessment_date", "assessmentDate"]),
            assessment_type: f.text(&["assessment_type", "assessmentType"]),
            systolic_bp: f.text(&["systolic_bp", "systolicBp"]),
            diastolic_bp: f.text(&["diastolic_bp", "diastolicBp"]),
            pulse: f.text(&["pulse"]),
            temperature: f.text(&["temperature"]),
            spo2: f.text(&["spo2", "spO2"]),
            blood_glucose: f.text(&["blood_glucose", "bloodGlucose"]),
            weight: f.text(&["weight"]),
            pregnancy: f.embedded(&["pregnancy_data", "pregnancyData"]),
            child: f.embedded(&["child_data", "childData"]),
            ncd: f.embedded(&["ncd_data", "ncdData"]),
            mental_health: f.embedded(&["mental_health_data", "mentalHealthData"]),
            referral_made: f.flag(&["referral_made", "referralMade"]).unwrap_or(false),
            notes: f.text(&["notes"]),
            health_worker: f.text(&["health_worker", "healthWorker"]),
            follow_up_date: f.text(&["follow_up_date", "followUpDate"]),
        })
    }
}

impl HealthAssessment {
    /// Blood pressure as `S/D`, when both readings are present.
    pub fn blood_pressure(&self) -> Option<String> {
        match (&self.systolic_bp, &self.diastolic_bp) {
            (Some(s), Some(d)) => Some(format!("{s}/{d}")),
            _ => None,
        }
    }

    fn vitals(&self) -> Vec<CardLine> {
        let mut lines = Vec::new();
        if let Some(bp) = self.blood_pressure() {
            lines.push(CardLine::labeled("BP (mmHg)", bp));
        }
        let readings = [
            ("Pulse", &self.pulse, ""),
            ("Temp", &self.temperature, "°F"),
            ("SpO2", &self.spo2, "%"),
            ("Glucose", &self.blood_glucose, ""),
            ("Weight", &self.weight, "kg"),
        ];
        for (label, value, unit) in readings {
            if let Some(v) = value {
                lines.push(CardLine::labeled(label, format!("{v}{unit}")));
            }
        }
        lines
    }

    fn sections(&self) -> Vec<CardLine> {
        let na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        let mut lines = Vec::new();
        if let Some(p) = &self.pregnancy {
            lines.push(CardLine::labeled(
                "Pregnancy",
                format!("Week {}, EDD: {}", na(&p.gestational_week), na(&p.edd)),
            ));
        }
        if let Some(c) = &self.child {
            lines.push(CardLine::labeled(
                "Child",
                format!("Weight {}kg, Height {}cm", na(&c.weight), na(&c.height)),
            ));
        }
        if let Some(n) = &self.ncd {
            lines.push(CardLine::labeled(
                "NCD",
                n.condition.as_deref().unwrap_or("Chronic Condition"),
            ));
        }
        if let Some(m) = &self.mental_health {
            lines.push(CardLine::labeled(
                "Mental Health",
                format!("PHQ-2 Score {}", na(&m.phq2_score)),
            ));
        }
        lines
    }
}

impl Record for HealthAssessment {
    type Stats = AssessmentStats;

    fn schema() -> &'static ModuleSchema {
        &HEALTH_ASSESSMENTS
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let mut card = Card::new(self.id, self.date.clone().unwrap_or_default()).actions(&[]);
        card.tags.push(Badge::new(
            self.assessment_type.as_deref().unwrap_or("General"),
            Tone::Info,
        ));
        if self.referral_made {
            card = card.badge(Badge::new("Referral Made", Tone::Warning));
        }
        card.lines.extend(self.vitals());
        card.lines.extend(self.sections());
        if let Some(notes) = &self.notes {
            card = card.line(CardLine::muted(notes));
        }
        if let Some(worker) = &self.health_worker {
            card = card.line(CardLine::muted(worker));
        }
        if let Some(date) = &self.follow_up_date {
            card = card.line(CardLine::labeled("Follow-up", date).styled(LineStyle::Highlight));
        }
        card
    }

    /// Assessments are never edited; the form is empty.
    fn to_form(&self) -> FormValues {
        FormValues::new()
    }

    fn derive_stats(records: &[Self], _reported: Option<Self::Stats>) -> Option<Self::Stats> {
        Some(AssessmentStats::from_records(records))
    }
}

/// Stats computed locally from the loaded assessments. The newest
/// assessment is the first one the server returns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default)]
    pub last_bp: Option<String>,
    #[serde(default)]
    pub last_pulse: Option<String>,
    #[serde(default)]
    pub last_date: Option<String>,
}

impl AssessmentStats {
    pub fn from_records(records: &[HealthAssessment]) -> Self {
        let latest = records.first();
        Self {
            total: records.len() as u64,
            last_bp: latest
                .and_then(HealthAssessment::blood_pressure)
                .map(|bp| format!("{bp} mmHg")),
            last_pulse: latest
                .and_then(|a| a.pulse.as_deref())
                .map(|p| format!("{p} bpm")),
            last_date: latest
                .and_then(|a| a.date.as_deref())
                .and_then(|d| d.split(',').next())
                .map(str::to_string),
        }
    }
}

impl StatsView for AssessmentStats {
    fn tiles(&self) -> Vec<StatTile> {
        let or_dash = |v: &Option<String>| v.clone().unwrap_or_else(|| "--".to_string());
        vec![
            StatTile::new("Total Assessments", self.total),
            StatTile::new("Last BP", or_dash(&self.last_bp)),
            StatTile::new("Last Pulse", or_dash(&self.last_pulse)),
            StatTile::new("Last Checkup", or_dash(&self.last_date)),
        ]
    }
}
