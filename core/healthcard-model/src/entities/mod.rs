//! The record modules.
//!
//! Each submodule defines the normalized entity, its static [`ModuleSchema`]
//! and its [`Record`](crate::Record) implementation.
//!
//! [`ModuleSchema`]: crate::ModuleSchema

mod allergy;
mod assessment;
mod family_history;
mod implant;
mod medicine;
mod surgery;
mod vaccination;
mod vitals;

pub use allergy::{ALLERGY, Allergy, severity_color};
pub use assessment::{
    AssessmentStats, ChildData, HEALTH_ASSESSMENTS, HealthAssessment, MentalHealthData, NcdData,
    PregnancyData,
};
pub use family_history::{
    ConditionDetail, FAMILY_HISTORY, FamilyHistoryRecord, FamilyHistoryStats, HistoryDocument,
};
pub use implant::{IMPLANTS, Implant, implant_status_color};
pub use medicine::{InventoryStats, LOW_STOCK_THRESHOLD, Medicine, PHARMACY_INVENTORY};
pub use surgery::{SURGERY, Surgery, outcome_color};
pub use vaccination::{VACCINATION, Vaccination, VaccinationStats, vaccination_status_color};
pub use vitals::{NO_READING, VITALS, VitalRecord, VitalsStats, bmi, format_bmi};

use crate::form::FormValues;

/// Colour used when a status has no mapping.
pub const FALLBACK_COLOR: &str = "#666";

/// Text of an optional field, or `fallback` when absent.
fn or<'a>(value: &'a Option<String>, fallback: &'a str) -> &'a str {
    value.as_deref().filter(|v| !v.is_empty()).unwrap_or(fallback)
}

fn set_all(form: &mut FormValues, pairs: &[(&str, &Option<String>)]) {
    for (name, value) in pairs {
        form.set_text(name, value.as_deref());
    }
}
