use super::set_all;
use crate::error::ModelError;
use crate::form::FormValues;
use crate::normalize::{WireFields, lenient_count};
use crate::record::Record;
use crate::schema::{BodyEncoding, Endpoints, FormField, HttpMethod, Messages, ModuleSchema, Route};
use crate::view::{Badge, Card, CardLine, LineStyle, StatTile, StatsView, Tone};
use healthcard_types::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stock below this is flagged as low.
pub const LOW_STOCK_THRESHOLD: u64 = 10;

pub static PHARMACY_INVENTORY: ModuleSchema = ModuleSchema {
    name: "pharmacy_inventory",
    noun: "medicine",
    title: "Medicine",
    collection_key: "inventory",
    stats_key: None,
    endpoints: Endpoints {
        list: "/api/pharmacy/inventory",
        create: Some(Route::new(HttpMethod::Post, "/api/pharmacy/inventory/add")),
        update: Some(Route::keyed_by_body(
            HttpMethod::Post,
            "/api/pharmacy/inventory/update",
        )),
        delete: Some(Route::keyed_by_body(
            HttpMethod::Post,
            "/api/pharmacy/inventory/delete",
        )),
    },
    encoding: BodyEncoding::Json,
    fields: &[
        FormField::text("name", "Medicine Name").required(),
        FormField::text("category", "Category"),
        FormField::number("stock", "Stock").required(),
        FormField::date("expiry", "Expiry Date"),
        FormField::text("notes", "Notes"),
    ],
    suggestions: None,
    attachments: None,
    any_of: None,
    messages: Messages {
        created: Some("Medicine added successfully"),
        updated: None,
        confirm_delete: Some("Are you sure you want to delete this medicine?"),
    },
};

/// A medicine held in the pharmacy's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Medicine {
    pub id: RecordId,
    pub name: String,
    pub category: Option<String>,
    pub stock: u64,
    pub expiry: Option<String>,
    pub notes: Option<String>,
}

impl TryFrom<Map<String, Value>> for Medicine {
    type Error = ModelError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let f = WireFields::new(map);
        Ok(Self {
            id: f.id()?,
            name: f.text(&["name", "medicine_name", "medicineName"]).unwrap_or_default(),
            category: f.text(&["category"]),
            stock: f.count(&["stock", "quantity"]),
            expiry: f.text(&["expiry", "expiry_date", "expiryDate"]),
            notes: f.text(&["notes"]),
        })
    }
}

impl Medicine {
    pub fn is_low_stock(&self) -> bool {
        self.stock < LOW_STOCK_THRESHOLD
    }
}

impl Record for Medicine {
    type Stats = InventoryStats;

    fn schema() -> &'static ModuleSchema {
        &PHARMACY_INVENTORY
    }

    fn id(&self) -> RecordId {
        self.id
    }

    fn card(&self) -> Card {
        let stock = CardLine::labeled("Stock", self.stock.to_string());
        let mut card = Card::new(self.id, &self.name)
            .badge(Badge::new(
                self.category.as_deref().unwrap_or("N/A"),
                Tone::Secondary,
            ))
            .line(if self.is_low_stock() {
                stock.styled(LineStyle::Warning)
            } else {
                stock
            })
            .line(CardLine::labeled(
                "Expiry",
                self.expiry.as_deref().unwrap_or("-"),
            ));
        if self.is_low_stock() {
            card.tags.push(Badge::new("Low Stock", Tone::Danger));
        }
        if let Some(notes) = &self.notes {
            card = card.line(CardLine::muted(notes));
        }
        card
    }

    fn to_form(&self) -> FormValues {
        let mut form = FormValues::new();
        form.set("name", self.name.as_str());
        form.set("stock", self.stock.to_string());
        set_all(
            &mut form,
            &[
                ("category", &self.category),
                ("expiry", &self.expiry),
                ("notes", &self.notes),
            ],
        );
        form
    }

    fn derive_stats(records: &[Self], _reported: Option<Self::Stats>) -> Option<Self::Stats> {
        Some(InventoryStats::from_records(records))
    }
}

/// Stock counters computed from the loaded inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryStats {
    #[serde(default, deserialize_with = "lenient_count")]
    pub total: u64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub low_stock: u64,
}

impl InventoryStats {
    pub fn from_records(records: &[Medicine]) -> Self {
        Self {
            total: records.len() as u64,
            low_stock: records.iter().filter(|m| m.is_low_stock()).count() as u64,
        }
    }
}

impl StatsView for InventoryStats {
    fn tiles(&self) -> Vec<StatTile> {
        vec![
            StatTile::new("Total Medicines", self.total),
            StatTile::new("Low Stock", self.low_stock),
        ]
    }
}
