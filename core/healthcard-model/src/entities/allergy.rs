use super::{FALLBACK_COLOR, or, set_all};
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::WireFields;
use crate::record::Record;
use crate::schema::{BodyEncoding, Endpoints, FormField, Messages, ModuleSchema};
use crate::suggestions::ALLERGENS;
use crate::view::{Badge, Card, CardLine, Tone};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub static ALLERGY: ModuleSchema = ModuleSchema {
    name: "allergy",
    noun: "allergy",
    title: "Allergy",
    collection_key: "allergies",
    stats_key: None,
    endpoints: Endpoints::rest("/api/allergies", "/api/allergies/{id}"),
    encoding: BodyEncoding::Json,
    fields: &[
        FormField::text("allergen", "Allergen").required(),
        FormField::choice(
            "severity",
            "Severity",
            &["Mild", "Moderate", "Severe", "Life-threatening"],
        )
        .required(),
        FormField::text("reaction", "Reaction"),
        FormField::date("diagnosed_date", "First Reaction"),
        FormField::choice(
            "category",
            "Category",
            &["Food", "Drug", "Environmental", "Other"],
        ),
        FormField::flag("active", "Active", true),
        FormField::text("notes", "Notes"),
    ],
    suggestions: Some(&ALLERGENS),
    attachments: None,
    any_of: None,
    messages: Messages::NONE,
};

/// A recorded allergy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", rename_all = "camelCase")]
pub struct Allergy {
    pub id: RecordId,
    pub allergen: Option<String>,
    pub severity: Option<String>,
    pub reaction: Option<String>,
    pub diagnosed_date: Option<String>,
    pub category: Option<String>,
    /// Absent means active.
    pub active: bool,
    pub notes: Option<String>,
}

impl TryFrom<Map<String, Value>> for Allergy {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            allergen: f.text(&["allergen"]),
            severity: f.text(&["severity"]),
            reaction: f.text(&["reaction"]),
            diagnosed_date: f.text(&["diagnosedDate", "diagnosed_date"]),
            category: f.text(&["category"]),
            active: f.flag(&["active", "is_active", "isActive"]).unwrap_or(true),
            notes: f.text(&["notes"]),
        })
    }
}

/// Badge colour for a severity, matched case-insensitively.
pub fn severity_color(severity: Option<&str>) -> &'static str {
    match severity.map(str::to_lowercase).as_deref() {
        Some("life-threatening") => "#d32f2f",
        Some("severe") => "#f44336",
        Some("moderate") => "#ff9800",
        Some("mild") => "#4caf50",
        _ => FALLBACK_COLOR,
    }
}

impl Record for Allergy {
    type Stats = ();

    fn schema() -> &'static ModuleSchema {
        &ALLERGY
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let mut card = Card::new(self.id, or(&self.allergen, "Unknown"))
            .subtitle(self.category.clone())
            .badge(Badge::new(
                or(&self.severity, "N/A"),
                Tone::Hex(severity_color(self.severity.as_deref())),
            ))
            .line_if("Reaction", self.reaction.as_deref());
        if let Some(date) = self.diagnosed_date.as_deref().filter(|d| !d.is_empty()) {
            card = card.line(CardLine::muted(format!("First Reaction: {date}")));
        }
        card
    }

    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        set_all(
            &mut form,
            &[
                ("allergen", &self.allergen),
                ("severity", &self.severity),
                ("reaction", &self.reaction),
                ("diagnosed_date", &self.diagnosed_date),
                ("category", &self.category),
                ("notes", &self.notes),
            ],
        );
        form.set("active", self.active);
        form
    }
}
