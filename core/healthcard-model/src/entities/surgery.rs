use super::{FALLBACK_COLOR, or, set_all};
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::WireFields;
use crate::record::Record;
use crate::schema::{BodyEncoding, Endpoints, FormField, Messages, ModuleSchema};
use crate::suggestions::SURGERIES;
use crate::view::{Badge, Card, CardLine, Tone};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub static SURGERY: ModuleSchema = ModuleSchema {
    name: "surgery",
    noun: "surgery",
    title: "Surgery",
    collection_key: "surgeries",
    stats_key: None,
    endpoints: Endpoints::rest("/api/surgery", "/api/surgery/{id}"),
    encoding: BodyEncoding::Json,
    fields: &[
        FormField::text("surgery_name", "Surgery Name").required(),
        FormField::text("surgery_type", "Surgery Type"),
        FormField::date("surgery_date", "Surgery Date").required(),
        FormField::text("hospital", "Hospital"),
        FormField::text("surgeon", "Surgeon"),
        FormField::text("category", "Category"),
        FormField::text("outcome", "Outcome"),
        FormField::date("follow_up_date", "Follow-up Date"),
        FormField::text("notes", "Post-op Notes"),
    ],
    suggestions: Some(&SURGERIES),
    attachments: None,
    any_of: None,
    messages: Messages::NONE,
};

/// A past surgery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", rename_all = "camelCase")]
pub struct Surgery {
    pub id: RecordId,
    pub surgery_name: Option<String>,
    pub surgery_type: Option<String>,
    pub surgery_date: Option<String>,
    pub hospital: Option<String>,
    pub surgeon: Option<String>,
    pub category: Option<String>,
    pub outcome: Option<String>,
    pub follow_up_date: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<Map<String, Value>> for Surgery {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            surgery_name: f.text(&["surgery_name", "surgeryName"]),
            surgery_type: f.text(&["surgery_type", "surgeryType"]),
            surgery_date: f.text(&["surgery_date", "surgeryDate"]),
            hospital: f.text(&["hospital", "hospital_name", "hospitalName"]),
            surgeon: f.text(&["surgeon_name", "surgeon", "surgeonName"]),
            category: f.text(&["category"]),
            outcome: f.text(&["outcome"]),
            follow_up_date: f.text(&["follow_up_date", "followUpDate"]),
            notes: f.text(&["post_op_notes", "notes", "postOpNotes"]),
        })
    }
}

impl Surgery {
    /// Display name: the surgery name, else its type.
    pub fn display_name(&self) -> &str {
        self.surgery_name
            .as_deref()
            .or(self.surgery_type.as_deref())
            .unwrap_or("Unknown Surgery")
    }
}

/// Badge colour for an outcome. Matching is exact.
pub fn outcome_color(outcome: &str) -> &'static str {
    match outcome {
        "Successful" => "#4caf50",
        "Complications" => "#ff9800",
        "Failed" => "#f44336",
        _ => FALLBACK_COLOR,
    }
}

impl Record for Surgery {
    type Stats = ();

    fn schema() -> &'static ModuleSchema {
        &SURGERY
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let mut card = Card::new(self.id, self.display_name())
            .subtitle(self.category.clone())
            .line(CardLine::labeled("Date", or(&self.surgery_date, "N/A")))
            .line_if("Hospital", self.hospital.as_deref())
            .line_if("Surgeon", self.surgeon.as_deref());
        if let Some(outcome) = &self.outcome {
            card = card.badge(Badge::new(outcome, Tone::Hex(outcome_color(outcome))));
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
                ("surgery_name", &self.surgery_name),
                ("surgery_type", &self.surgery_type),
                ("surgery_date", &self.surgery_date),
                ("hospital", &self.hospital),
                ("surgeon", &self.surgeon),
                ("category", &self.category),
                ("outcome", &self.outcome),
                ("follow_up_date", &self.follow_up_date),
                ("notes", &self.notes),
            ],
        );
        form
    }
}
