use healthcard_model::entities::{
    ALLERGY, AssessmentStats, FamilyHistoryStats, HEALTH_ASSESSMENTS, HealthAssessment, IMPLANTS,
    SURGERY, VaccinationStats,
};
use healthcard_model::filter::{AssessmentCategory, HistoryQuery, ListQuery};
use healthcard_model::suggestions::{ALLERGENS, IMPLANTS as IMPLANT_SUGGESTIONS, SURGERIES};
use healthcard_model::{HttpMethod, Record, StatsView};
use healthcard_types::RecordId;
use pretty_assertions::assert_eq;
use serde_json::json;

// ── Suggestions ──────────────────────────────────────────────────

#[test]
fn food_allergens_in_order() {
    assert_eq!(
        ALLERGENS.lookup("Food"),
        [
            "Peanuts",
            "Tree Nuts",
            "Milk",
            "Eggs",
            "Wheat",
            "Soy",
            "Fish",
            "Shellfish",
            "Sesame",
            "Gluten"
        ]
    );
}

#[test]
fn unknown_category_has_no_suggestions() {
    assert!(ALLERGENS.lookup("").is_empty());
    assert!(SURGERIES.lookup("food").is_empty());
}

#[test]
fn catalogs_are_wired_to_their_modules() {
    assert_eq!(ALLERGY.suggestions.map(|c| c.input_field), Some("allergen"));
    assert_eq!(SURGERY.suggestions.map(|c| c.input_field), Some("surgery_name"));
    assert_eq!(IMPLANTS.suggestions.map(|c| c.input_field), Some("device_name"));
    assert_eq!(
        IMPLANT_SUGGESTIONS.categories().collect::<Vec<_>>(),
        vec!["Pacemaker", "Stent", "Prosthetic", "Joint Replacement", "Other"]
    );
    assert_eq!(SURGERIES.lookup("Cardiac")[0], "Bypass Surgery (CABG)");
}

// ── Schemas ──────────────────────────────────────────────────────

#[test]
fn rest_routes_expand_ids() {
    let update = ALLERGY.endpoints.update.expect("update route");
    assert_eq!(update.method, HttpMethod::Put);
    assert_eq!(update.path_for(Some(RecordId::new(7))), "/api/allergies/7");
    assert_eq!(ALLERGY.delete_prompt(), "Are you sure you want to delete this allergy record?");
    assert_eq!(ALLERGY.save_failure_text(), "Failed to save allergy");
}

#[test]
fn assessments_are_read_only() {
    assert!(HEALTH_ASSESSMENTS.is_read_only());
    assert!(!ALLERGY.is_read_only());
}

// ── Stats ────────────────────────────────────────────────────────

#[test]
fn vaccination_last_updated_formats() {
    let cases = [
        (json!({"last_updated": "2025-03-04T10:11:12Z"}), "2025-03-04"),
        (json!({"last_updated": "Tue, 04 Mar 2025 10:11:12 GMT"}), "2025-03-04"),
        (json!({"last_updated": "2025-03-04 10:11:12.123"}), "2025-03-04"),
        (json!({"lastUpdated": "2025-03-04"}), "2025-03-04"),
        (json!({"last_updated": null}), "N/A"),
        (json!({}), "N/A"),
    ];
    for (raw, expected) in cases {
        let stats: VaccinationStats = serde_json::from_value(raw.clone()).expect("stats");
        assert_eq!(stats.last_updated_label(), expected, "{raw}");
    }
}

#[test]
fn vaccination_counts_tolerate_nulls() {
    let stats: VaccinationStats =
        serde_json::from_value(json!({"total": 4, "upcoming": null, "overdue": "2"}))
            .expect("stats");
    assert_eq!((stats.total, stats.upcoming, stats.overdue), (4, 0, 2));
    assert_eq!(stats.tiles()[0].value, "4");
}

#[test]
fn family_history_stats_split_timestamp() {
    let stats: FamilyHistoryStats = serde_json::from_value(json!({
        "total": 5, "withConditions": 3, "genetic": 1, "lastUpdated": "2025-01-02T08:00:00"
    }))
    .expect("stats");
    assert_eq!(stats.with_conditions, 3);
    assert_eq!(stats.last_updated_label(), "2025-01-02");
    assert_eq!(FamilyHistoryStats::default().last_updated_label(), "N/A");
}

fn assessments() -> Vec<HealthAssessment> {
    serde_json::from_value(json!([
        {"id": 2, "date": "14 Oct 2025, 09:15", "assessment_type": "NCD Screening",
         "systolic_bp": 130, "diastolic_bp": 85, "pulse": 76},
        {"id": 1, "date": "01 Sep 2025, 11:00", "assessment_type": "pregnancy"}
    ]))
    .expect("assessments")
}

#[test]
fn assessment_stats_come_from_newest_record() {
    let records = assessments();
    let stats = HealthAssessment::derive_stats(&records, None).expect("derived");
    assert_eq!(
        stats,
        AssessmentStats {
            total: 2,
            last_bp: Some("130/85 mmHg".to_string()),
            last_pulse: Some("76 bpm".to_string()),
            last_date: Some("14 Oct 2025".to_string()),
        }
    );
    assert_eq!(AssessmentStats::from_records(&[]).total, 0);
}

// ── Filters ──────────────────────────────────────────────────────

#[test]
fn assessment_category_filter() {
    let records = assessments();
    assert_eq!(AssessmentCategory::parse("all").apply(&records).len(), 2);
    let ncd = AssessmentCategory::parse("ncd").apply(&records);
    assert_eq!(ncd.len(), 1);
    assert_eq!(ncd[0].id, RecordId::new(2));
    assert!(AssessmentCategory::parse("child").apply(&records).is_empty());
}

#[test]
fn history_query_omits_empty_params() {
    assert!(HistoryQuery::default().params().is_empty());
    let query = HistoryQuery {
        q: "dia".to_string(),
        relation: String::new(),
        condition: "Diabetes".to_string(),
    };
    assert_eq!(
        query.params(),
        vec![("q", "dia".to_string()), ("condition", "Diabetes".to_string())]
    );
    let mut query = query;
    query.reset();
    assert_eq!(query, HistoryQuery::default());
}
