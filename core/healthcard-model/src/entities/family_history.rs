use super::or;
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::{WireFields, lenient_count, lenient_text};
use crate::record::Record;
use crate::schema::{
    AttachmentPolicy, BodyEncoding, Endpoints, FormField, HttpMethod, Messages, ModuleSchema, Route,
};
use crate::view::{Action, Badge, Card, CardLine, Link, StatTile, StatsView, Tone};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Condition chips shown on a card before collapsing into `+N more`.
pub const VISIBLE_CONDITIONS: usize = 3;

pub static FAMILY_HISTORY: ModuleSchema = ModuleSchema {
    name: "family_history",
    noun: "family history",
    title: "Family History",
    collection_key: "records",
    stats_key: Some("stats"),
    endpoints: Endpoints {
        list: "/api/family-history",
        create: Some(Route::new(HttpMethod::Post, "/family-history/add")),
        update: Some(Route::new(HttpMethod::Post, "/family-history/edit/{id}")),
        delete: Some(Route::new(HttpMethod::Post, "/family-history/delete/{id}")),
    },
    encoding: BodyEncoding::Multipart,
    fields: &[
        FormField::text("relation", "Relation").required(),
        FormField::choice("living_status", "Living Status", &["Alive", "Deceased"]).required(),
        FormField::number("age", "Age"),
        FormField::text("gender", "Gender"),
        FormField::text("notes", "Notes"),
        FormField::multi("medical_conditions", "Medical Conditions", &[]),
        FormField::multi("remove_documents", "Remove Documents", &[]),
    ],
    suggestions: None,
    attachments: Some(AttachmentPolicy {
        field: "documents",
        max_files: 3,
        max_bytes: 5 * 1024 * 1024,
        extensions: &["pdf", "jpg", "jpeg", "png"],
    }),
    any_of: None,
    messages: Messages {
        created: Some("Record saved successfully"),
        updated: Some("Record saved successfully"),
        confirm_delete: None,
    },
};

/// Free-text detail attached to a relative's conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionDetail {
    #[serde(default, deserialize_with = "lenient_text")]
    pub notes: Option<String>,
}

/// A document uploaded with a family history record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryDocument {
    #[serde(alias = "originalName")]
    pub original_name: String,
    #[serde(alias = "storedName")]
    pub stored_name: String,
}

/// Medical history of one relative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", rename_all = "camelCase")]
pub struct FamilyHistoryRecord {
    pub id: RecordId,
    pub relation: String,
    pub living_status: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub medical_conditions: Vec<String>,
    pub condition_details: Vec<ConditionDetail>,
    pub documents: Vec<HistoryDocument>,
}

impl TryFrom<Map<String, Value>> for FamilyHistoryRecord {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            relation: f.text(&["relation"]).unwrap_or_default(),
            living_status: f.text(&["livingStatus", "living_status"]),
            age: f.text(&["age"]),
            gender: f.text(&["gender"]),
            medical_conditions: f.strings(&["medicalConditions", "medical_conditions"]),
            condition_details: f
                .embedded(&["conditionDetails", "condition_details"])
                .unwrap_or_default(),
            documents: f.embedded(&["documents"]).unwrap_or_default(),
        })
    }
}

impl FamilyHistoryRecord {
    pub fn is_alive(&self) -> bool {
        self.living_status.as_deref() == Some("Alive")
    }

    /// `Age` for living relatives, `Age at death` otherwise.
    pub fn age_label(&self) -> &'static str {
        if self.is_alive() { "Age" } else { "Age at death" }
    }

    /// Notes of the first condition detail, which the form edits.
    pub fn notes(&self) -> Option<&str> {
        self.condition_details
            .first()
            .and_then(|d| d.notes.as_deref())
    }

    pub fn pdf_path(&self) -> String {
        format!("/family-history/pdf/{}", self.id)
    }

    /// Download path of an uploaded document.
    pub fn document_path(&self, document: &HistoryDocument) -> String {
        format!(
            "/family-history/document/{}/{}",
            self.id,
            urlencoding::encode(&document.original_name)
        )
    }
}

impl Record for FamilyHistoryRecord {
    type Stats = FamilyHistoryStats;

    fn schema() -> &'static ModuleSchema {
        &FAMILY_HISTORY
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let status = self.living_status.clone().unwrap_or_default();
        let tone = if self.is_alive() {
            Tone::Success
        } else {
            Tone::Secondary
        };
        let mut card = Card::new(self.id, &self.relation)
            .badge(Badge::new(status, tone))
            .line(CardLine::muted(format!(
                "{}: {} • Gender: {}",
                self.age_label(),
                or(&self.age, "N/A"),
                or(&self.gender, "N/A")
            )))
            .actions(&[Action::View, Action::Edit, Action::Delete]);

        card.chips = self
            .medical_conditions
            .iter()
            .take(VISIBLE_CONDITIONS)
            .cloned()
            .collect();
        if self.medical_conditions.len() > VISIBLE_CONDITIONS {
            card.chip_overflow = Some(format!(
                "+{} more",
                self.medical_conditions.len() - VISIBLE_CONDITIONS
            ));
        }
        card.chips_placeholder = Some("None recorded".to_string());
        card.links.push(Link {
            label: "Download PDF".to_string(),
            href: self.pdf_path(),
        });
        card
    }

    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("relation", self.relation.as_str());
        form.set_text("living_status", self.living_status.as_deref());
        form.set_text("age", self.age.as_deref());
        form.set_text("gender", self.gender.as_deref());
        form.set_text("notes", self.notes());
        form.set("medical_conditions", self.medical_conditions.clone());
        form.set("remove_documents", Vec::<String>::new());
        form
    }
}

/// Server-computed family history stats.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyHistoryStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, alias = "with_conditions", deserialize_with = "lenient_count")]
    pub with_conditions: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub genetic: u64,
    #[serde(
        default,
        alias = "last_updated",
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_updated: Option<String>,
}

impl FamilyHistoryStats {
    /// The date part of `last_updated`, `N/A` when absent.
    pub fn last_updated_label(&self) -> String {
        self.last_updated
            .as_deref()
            .and_then(|s| s.split('T').next())
            .unwrap_or("N/A")
            .to_string()
    }
}

impl StatsView for FamilyHistoryStats {
    fn tiles(&self) -> Vec<StatTile> {
        vec![
            StatTile::new("Family Members", self.total),
            StatTile::new("With Conditions", self.with_conditions),
            StatTile::new("Genetic Risks", self.genetic),
            StatTile::new("Last Updated", self.last_updated_label()),
        ]
    }
}
