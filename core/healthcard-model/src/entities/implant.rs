use super::{FALLBACK_COLOR, or, set_all};
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::WireFields;
use crate::record::Record;
use crate::schema::{BodyEncoding, Endpoints, FormField, Messages, ModuleSchema};
use crate::suggestions::IMPLANTS as IMPLANT_SUGGESTIONS;
use crate::view::{Badge, Card, CardLine, LineStyle, Tone};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DEFAULT_STATUS: &str = "Active";

pub static IMPLANTS: ModuleSchema = ModuleSchema {
    name: "implants",
    noun: "implant",
    title: "Implant",
    collection_key: "implants",
    stats_key: None,
    endpoints: Endpoints::rest("/api/implants", "/api/implants/{id}"),
    encoding: BodyEncoding::Json,
    fields: &[
        FormField::text("device_name", "Device Name").required(),
        FormField::date("implantation_date", "Implant Date").required(),
        FormField::text("manufacturer", "Manufacturer"),
        FormField::text("model_number", "Model Number"),
        FormField::text("serial_number", "Serial Number"),
        FormField::text("category", "Category"),
        FormField::choice(
            "status",
            "Status",
            &["Active", "Explanted", "Recall", "Failed"],
        )
        .defaulting_to(DEFAULT_STATUS),
        FormField::date("expiry_date", "Warranty Expiry"),
        FormField::text("surgeon_name", "Surgeon"),
        FormField::text("hospital_name", "Hospital"),
        FormField::text("notes", "Notes"),
    ],
    suggestions: Some(&IMPLANT_SUGGESTIONS),
    attachments: None,
    any_of: None,
    messages: Messages::NONE,
};

/// An implanted medical device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", rename_all = "camelCase")]
pub struct Implant {
    pub id: RecordId,
    pub device_name: Option<String>,
    pub implantation_date: Option<String>,
    pub manufacturer: Option<String>,
    pub model_number: Option<String>,
    pub serial_number: Option<String>,
    pub warranty_expiry: Option<String>,
    pub category: Option<String>,
    /// `Active` when the server omits it.
    pub status: String,
    pub surgeon_name: Option<String>,
    pub hospital_name: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<Map<String, Value>> for Implant {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            device_name: f.text(&["deviceName", "device_name"]),
            implantation_date: f.text(&["implantationDate", "implantation_date"]),
            manufacturer: f.text(&["manufacturer"]),
            model_number: f.text(&["modelNumber", "model_number"]),
            serial_number: f.text(&["serialNumber", "serial_number"]),
            warranty_expiry: f.text(&[
                "warrantyExpiry",
                "warranty_expiry",
                "expiryDate",
                "expiry_date",
            ]),
            category: f.text(&["category"]),
            status: f
                .text(&["status"])
                .unwrap_or_else(|| DEFAULT_STATUS.to_string()),
            surgeon_name: f.text(&["surgeonName", "surgeon_name"]),
            hospital_name: f.text(&["hospitalName", "hospital_name"]),
            notes: f.text(&["notes"]),
        })
    }
}

/// Badge colour for an implant status. Matching is exact.
pub fn implant_status_color(status: &str) -> &'static str {
    match status {
        "Active" => "#4caf50",
        "Explanted" => "#9e9e9e",
        "Recall" => "#f44336",
        "Failed" => "#ff9800",
        _ => FALLBACK_COLOR,
    }
}

impl Record for Implant {
    type Stats = ();

    fn schema() -> &'static ModuleSchema {
        &IMPLANTS
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let mut card = Card::new(self.id, or(&self.device_name, "Unknown Device"))
            .subtitle(self.category.clone())
            .badge(Badge::new(
                &self.status,
                Tone::Hex(implant_status_color(&self.status)),
            ))
            .line(CardLine::labeled(
                "Implant Date",
                or(&self.implantation_date, "N/A"),
            ))
            .line_if("Manufacturer", self.manufacturer.as_deref())
            .line_if("Model", self.model_number.as_deref());
        if let Some(serial) = &self.serial_number {
            card = card.line(CardLine::muted(format!("Serial: {serial}")));
        }
        if let Some(expiry) = &self.warranty_expiry {
            card = card.line(CardLine::muted(format!("Expires: {expiry}")).styled(LineStyle::Warning));
        }
        card
    }

    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        set_all(
            &mut form,
            &[
                ("device_name", &self.device_name),
                ("implantation_date", &self.implantation_date),
                ("manufacturer", &self.manufacturer),
                ("model_number", &self.model_number),
                ("serial_number", &self.serial_number),
                ("category", &self.category),
                ("expiry_date", &self.warranty_expiry),
                ("surgeon_name", &self.surgeon_name),
                ("hospital_name", &self.hospital_name),
                ("notes", &self.notes),
            ],
        );
        form.set("status", self.status.as_str());
        form
    }
}
