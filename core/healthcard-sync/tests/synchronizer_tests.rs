mod common;

use common::{RecordingPrompt, ScriptedTransport, response};
use healthcard_model::entities::{ALLERGY, SURGERY};
use healthcard_model::filter::HistoryQuery;
use healthcard_model::{
    Allergy, FamilyHistoryRecord, FieldValue, FormValues, HealthAssessment, HttpMethod, RequestBody,
    Surgery,
};
use healthcard_sync::modules::{InventorySync, VitalsSync};
use healthcard_sync::{
    DeleteOutcome, FamilyHistorySearch, LoadOutcome, ModalMode, RecordSynchronizer, SaveOutcome,
    SyncError,
};
use healthcard_types::{LoadGeneration, RecordId};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;

fn allergies_body(ids: &[i64]) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "allergen": format!("A{id}"), "severity": "Mild"}))
        .collect();
    json!({"success": true, "allergies": items})
}

fn setup(prompt: Arc<RecordingPrompt>) -> (Arc<ScriptedTransport>, RecordSynchronizer<Allergy>) {
    let transport = ScriptedTransport::new();
    let sync = RecordSynchronizer::new(transport.clone(), prompt);
    (transport, sync)
}

async fn loaded(
    ids: &[i64],
    prompt: Arc<RecordingPrompt>,
) -> (Arc<ScriptedTransport>, RecordSynchronizer<Allergy>) {
    let (transport, sync) = setup(prompt);
    transport.reply(allergies_body(ids));
    assert!(sync.load().await.unwrap().is_applied());
    (transport, sync)
}

fn ids(records: &[Allergy]) -> Vec<i64> {
    records.iter().map(|r| r.id.get()).collect()
}

// ── Loading ──────────────────────────────────────────────────────

#[tokio::test]
async fn load_applies_records_in_order() {
    let (transport, sync) = setup(RecordingPrompt::accepting());
    transport.reply(allergies_body(&[3, 1, 2]));

    let outcome = sync.load().await.unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Applied {
            generation: LoadGeneration::from(1),
            count: 3
        }
    );
    assert_eq!(ids(&sync.records().await), vec![3, 1, 2]);
    let view = sync.render().await;
    assert_eq!(view.len(), 3);
    assert!(!view.empty_state_visible);
    assert_eq!(transport.requests()[0].path, "/api/allergies");
    assert_eq!(transport.requests()[0].method, HttpMethod::Get);
}

#[tokio::test]
async fn empty_collection_shows_empty_state() {
    let (transport, sync) = setup(RecordingPrompt::accepting());
    transport.reply(json!({"success": true}));

    sync.load().await.unwrap();

    assert!(sync.render().await.empty_state_visible);
}

#[tokio::test]
async fn rejected_load_alerts_and_keeps_records() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = loaded(&[1], prompt.clone()).await;
    transport.reply(json!({"success": false, "message": "Session expired"}));

    let outcome = sync.load().await.unwrap();

    assert_eq!(
        outcome,
        LoadOutcome::Rejected {
            message: "Session expired".to_string()
        }
    );
    assert_eq!(ids(&sync.records().await), vec![1]);
    assert_eq!(prompt.alerts(), vec!["Session expired"]);
}

#[tokio::test]
async fn failed_load_alerts_generic_text() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = loaded(&[1], prompt.clone()).await;
    transport.fail(SyncError::Network("connection refused".to_string()));

    let err = sync.load().await.unwrap_err();

    assert!(matches!(err, SyncError::Network(_)));
    assert_eq!(ids(&sync.records().await), vec![1]);
    assert_eq!(prompt.alerts(), vec!["Failed to load allergy records"]);
}

#[tokio::test]
async fn malformed_records_are_a_load_failure() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = setup(prompt.clone());
    transport.reply(json!({"success": true, "allergies": [{"allergen": "no id"}]}));

    assert!(sync.load().await.is_err());
    assert!(sync.records().await.is_empty());
    assert_eq!(prompt.alerts().len(), 1);
}

#[tokio::test]
async fn stale_response_never_overwrites_newer_one() {
    let (transport, sync) = setup(RecordingPrompt::accepting());
    let first_reply = transport.defer();
    let second_reply = transport.defer();

    let first = tokio::spawn({
        let sync = sync.clone();
        async move { sync.load().await }
    });
    transport.wait_for_requests(1).await;
    let second = tokio::spawn({
        let sync = sync.clone();
        async move { sync.load().await }
    });
    transport.wait_for_requests(2).await;

    second_reply.send(response(allergies_body(&[20, 21]))).unwrap();
    let second = second.await.unwrap().unwrap();
    first_reply.send(response(allergies_body(&[10]))).unwrap();
    let first = first.await.unwrap().unwrap();

    assert!(second.is_applied());
    assert_eq!(
        first,
        LoadOutcome::Discarded {
            generation: LoadGeneration::from(1)
        }
    );
    assert_eq!(ids(&sync.records().await), vec![20, 21]);
    assert_eq!(sync.applied_generation().await, LoadGeneration::from(2));
}

#[tokio::test]
async fn cancel_discards_in_flight_load() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = setup(prompt.clone());
    let reply = transport.defer();

    let pending = tokio::spawn({
        let sync = sync.clone();
        async move { sync.load().await }
    });
    transport.wait_for_requests(1).await;
    sync.cancel_pending().await;
    reply.send(response(allergies_body(&[1, 2]))).unwrap();

    let outcome = pending.await.unwrap().unwrap();
    assert!(matches!(outcome, LoadOutcome::Discarded { .. }));
    assert!(sync.records().await.is_empty());
    assert!(prompt.alerts().is_empty());
}

#[tokio::test]
async fn superseded_failure_is_silent() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = setup(prompt.clone());
    let reply = transport.defer();

    let pending = tokio::spawn({
        let sync = sync.clone();
        async move { sync.load().await }
    });
    transport.wait_for_requests(1).await;
    sync.cancel_pending().await;
    drop(reply);

    let outcome = pending.await.unwrap().unwrap();
    assert!(matches!(outcome, LoadOutcome::Discarded { .. }));
    assert!(prompt.alerts().is_empty());
}

#[tokio::test]
async fn assessment_stats_are_derived_locally() {
    let transport = ScriptedTransport::new();
    let sync: RecordSynchronizer<HealthAssessment> =
        RecordSynchronizer::new(transport.clone(), RecordingPrompt::accepting());
    transport.reply(json!({
        "success": true,
        "assessments": [{"id": 1, "date": "02 Jan 2025, 10:00", "pulse": 70}]
    }));

    sync.load().await.unwrap();

    let stats = sync.stats().await.expect("derived stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.last_pulse.as_deref(), Some("70 bpm"));
    assert_eq!(sync.stat_tiles().await[3].value, "02 Jan 2025");
}

// ── Modal ────────────────────────────────────────────────────────

#[tokio::test]
async fn add_modal_is_always_blank() {
    let (_transport, sync) = loaded(&[7], RecordingPrompt::accepting()).await;

    sync.open_modal(Some(RecordId::new(7))).await.unwrap();
    sync.set_field("notes", "dirty").await.unwrap();
    sync.close_modal().await;
    let modal = sync.open_modal(None).await.unwrap();

    assert_eq!(modal.mode, ModalMode::Add);
    assert_eq!(modal.title, "Add Allergy");
    assert_eq!(modal.form, FormValues::blank(&ALLERGY));
}

#[tokio::test]
async fn edit_modal_matches_record_from_either_casing() {
    let transport = ScriptedTransport::new();
    let sync: RecordSynchronizer<Surgery> =
        RecordSynchronizer::new(transport.clone(), RecordingPrompt::accepting());
    transport.reply(json!({
        "success": true,
        "surgeries": [
            {"id": 1, "surgery_name": "Appendectomy", "surgeon_name": "Dr. Rao",
             "surgery_date": "2023-05-10", "post_op_notes": "Fine"},
            {"id": 2, "surgeryName": "Appendectomy", "surgeon": "Dr. Rao",
             "surgeryDate": "2023-05-10", "notes": "Fine"}
        ]
    }));
    sync.load().await.unwrap();

    let snake = sync.open_modal(Some(RecordId::new(1))).await.unwrap();
    let camel = sync.open_modal(Some(RecordId::new(2))).await.unwrap();

    assert_eq!(snake.mode, ModalMode::Edit(RecordId::new(1)));
    assert_eq!(snake.title, "Edit Surgery");
    assert_eq!(snake.form, camel.form);
    assert_eq!(snake.form.text("surgeon"), "Dr. Rao");
    assert_eq!(snake.form.text("notes"), "Fine");
}

#[tokio::test]
async fn unknown_edit_id_opens_add_modal() {
    let (_transport, sync) = loaded(&[1], RecordingPrompt::accepting()).await;

    let modal = sync.open_modal(Some(RecordId::new(99))).await.unwrap();

    assert_eq!(modal.mode, ModalMode::Add);
    assert_eq!(modal.form, FormValues::blank(&ALLERGY));
}

#[tokio::test]
async fn category_change_repopulates_suggestions() {
    let (_transport, sync) = setup(RecordingPrompt::accepting());
    let modal = sync.open_modal(None).await.unwrap();
    assert!(modal.suggestions.is_empty());

    sync.set_field("category", "Drug").await.unwrap();
    let modal = sync.modal().await.unwrap();
    assert_eq!(modal.suggestions[0], "Penicillin");

    let food = sync.update_suggestions("Food").await;
    assert_eq!(food.len(), 10);
    assert_eq!(sync.modal().await.unwrap().suggestions, food);
}

#[tokio::test]
async fn field_edits_need_an_open_modal() {
    let (_transport, sync) = setup(RecordingPrompt::accepting());
    assert!(matches!(
        sync.set_field("allergen", "Milk").await,
        Err(SyncError::NoModal)
    ));
    sync.open_modal(None).await.unwrap();
    assert!(matches!(
        sync.set_field("nonsense", "x").await,
        Err(SyncError::UnknownField(_))
    ));
}

#[tokio::test]
async fn read_only_module_has_no_edit_modal() {
    let sync: RecordSynchronizer<HealthAssessment> =
        RecordSynchronizer::new(ScriptedTransport::new(), RecordingPrompt::accepting());
    assert!(matches!(
        sync.open_modal(None).await,
        Err(SyncError::Unsupported { .. })
    ));
}

// ── Save ─────────────────────────────────────────────────────────

#[tokio::test]
async fn save_creates_closes_and_reloads() {
    let (transport, sync) = setup(RecordingPrompt::accepting());
    sync.open_modal(None).await.unwrap();
    sync.set_field("allergen", "Peanuts").await.unwrap();
    sync.set_field("severity", "Severe").await.unwrap();
    transport.reply(json!({"success": true, "message": "Allergy added"}));
    transport.reply(allergies_body(&[5]));

    let outcome = sync.save().await.unwrap();

    assert_eq!(outcome, SaveOutcome::Saved { id: None });
    assert!(sync.modal().await.is_none());
    assert_eq!(ids(&sync.records().await), vec![5]);
    let requests = transport.requests();
    assert_eq!(requests[0].method, HttpMethod::Post);
    assert_eq!(requests[0].path, "/api/allergies");
    let body = requests[0].body.as_json().expect("json body");
    assert_eq!(body["allergen"], "Peanuts");
    assert_eq!(body["active"], true);
    assert_eq!(requests[1].method, HttpMethod::Get);
}

#[tokio::test]
async fn unmodified_edit_puts_the_record_back() {
    let (transport, sync) = setup(RecordingPrompt::accepting());
    transport.reply(json!({"success": true, "allergies": [{
        "id": 7, "allergen": "Peanuts", "severity": "severe", "reaction": "Hives",
        "diagnosedDate": "2020-04-02", "category": "Food", "active": true, "notes": ""
    }]}));
    sync.load().await.unwrap();
    sync.open_modal(Some(RecordId::new(7))).await.unwrap();
    transport.reply(json!({"success": true}));
    transport.reply(allergies_body(&[7]));

    assert_eq!(
        sync.save().await.unwrap(),
        SaveOutcome::Saved {
            id: Some(RecordId::new(7))
        }
    );

    let put = &transport.requests()[1];
    assert_eq!(put.method, HttpMethod::Put);
    assert_eq!(put.path, "/api/allergies/7");
    assert_eq!(
        serde_json::Value::Object(put.body.as_json().unwrap().clone()),
        json!({
            "allergen": "Peanuts", "severity": "severe", "reaction": "Hives",
            "diagnosed_date": "2020-04-02", "category": "Food", "active": true, "notes": ""
        })
    );
}

#[tokio::test]
async fn rejected_save_shows_message_and_stays_open() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = loaded(&[1], prompt.clone()).await;
    sync.open_modal(None).await.unwrap();
    sync.set_field("allergen", "Dust").await.unwrap();
    sync.set_field("severity", "Mild").await.unwrap();
    transport.reply(json!({"success": false, "message": "UID must be exactly 16 digits"}));

    let outcome = sync.save().await.unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Rejected {
            message: "UID must be exactly 16 digits".to_string()
        }
    );
    assert_eq!(prompt.alerts(), vec!["UID must be exactly 16 digits"]);
    let modal = sync.modal().await.expect("modal stays open");
    assert!(!modal.submitting);
    assert_eq!(modal.form.text("allergen"), "Dust");
    assert_eq!(transport.request_count(), 2, "no reload after rejection");
}

#[tokio::test]
async fn rejection_without_message_uses_fallback() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = setup(prompt.clone());
    sync.open_modal(None).await.unwrap();
    sync.set_field("allergen", "Dust").await.unwrap();
    sync.set_field("severity", "Mild").await.unwrap();
    transport.reply(json!({"success": false}));

    sync.save().await.unwrap();

    assert_eq!(prompt.alerts(), vec!["Unknown error"]);
}

#[tokio::test]
async fn invalid_form_is_not_sent() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = setup(prompt.clone());
    sync.open_modal(None).await.unwrap();

    let outcome = sync.save().await.unwrap();

    let SaveOutcome::Invalid(errors) = outcome else {
        panic!("expected validation errors, got {outcome:?}");
    };
    assert_eq!(errors.len(), 2);
    assert_eq!(transport.request_count(), 0);
    assert!(sync.modal().await.is_some());
    assert_eq!(prompt.alerts(), vec!["allergen is required\nseverity is required"]);
}

#[tokio::test]
async fn transport_failure_on_save_alerts_generic_text() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = setup(prompt.clone());
    sync.open_modal(None).await.unwrap();
    sync.set_field("allergen", "Dust").await.unwrap();
    sync.set_field("severity", "Mild").await.unwrap();
    transport.fail(SyncError::Timeout);

    assert!(matches!(sync.save().await, Err(SyncError::Timeout)));
    assert_eq!(prompt.alerts(), vec!["Failed to save allergy"]);
    assert!(sync.modal().await.is_some());
}

#[tokio::test]
async fn save_in_flight_blocks_a_second_submit() {
    let (transport, sync) = setup(RecordingPrompt::accepting());
    sync.open_modal(None).await.unwrap();
    sync.set_field("allergen", "Dust").await.unwrap();
    sync.set_field("severity", "Mild").await.unwrap();
    let reply = transport.defer();

    let first = tokio::spawn({
        let sync = sync.clone();
        async move { sync.save().await }
    });
    transport.wait_for_requests(1).await;

    assert!(matches!(sync.save().await, Err(SyncError::Busy)));
    assert!(!sync.close_modal().await);
    assert!(sync.modal().await.unwrap().submitting);

    transport.reply(allergies_body(&[1]));
    reply.send(response(json!({"success": true}))).unwrap();
    assert!(matches!(
        first.await.unwrap().unwrap(),
        SaveOutcome::Saved { .. }
    ));
    assert_eq!(transport.request_count(), 2);
}

#[tokio::test]
async fn view_modal_is_read_only() {
    let (_transport, sync) = loaded(&[4], RecordingPrompt::accepting()).await;

    let modal = sync.open_view(RecordId::new(4)).await.unwrap();
    assert_eq!(modal.mode, ModalMode::View(RecordId::new(4)));
    assert!(matches!(sync.save().await, Err(SyncError::ViewOnly)));
    assert!(matches!(
        sync.open_view(RecordId::new(5)).await,
        Err(SyncError::UnknownRecord(_))
    ));
}

// ── Delete ───────────────────────────────────────────────────────

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let prompt = RecordingPrompt::declining();
    let (transport, sync) = loaded(&[1, 2], prompt.clone()).await;
    let before = sync.records().await;

    let outcome = sync.delete(RecordId::new(1)).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(transport.request_count(), 1, "only the initial load");
    assert_eq!(sync.records().await, before);
    assert_eq!(
        prompt.confirms(),
        vec!["Are you sure you want to delete this allergy record?"]
    );
}

#[tokio::test]
async fn confirmed_delete_reloads() {
    let (transport, sync) = loaded(&[1, 2], RecordingPrompt::accepting()).await;
    transport.reply(json!({"success": true}));
    transport.reply(allergies_body(&[2]));

    let outcome = sync.delete(RecordId::new(1)).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Deleted(RecordId::new(1)));
    let requests = transport.requests();
    assert_eq!(requests[1].method, HttpMethod::Delete);
    assert_eq!(requests[1].path, "/api/allergies/1");
    assert_eq!(ids(&sync.records().await), vec![2]);
}

#[tokio::test]
async fn rejected_delete_keeps_records() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = loaded(&[1], prompt.clone()).await;
    transport.reply(json!({"success": false, "error": "Record is locked"}));

    let outcome = sync.delete(RecordId::new(1)).await.unwrap();

    assert_eq!(
        outcome,
        DeleteOutcome::Rejected {
            message: "Record is locked".to_string()
        }
    );
    assert_eq!(ids(&sync.records().await), vec![1]);
    assert_eq!(prompt.alerts(), vec!["Record is locked"]);
}

#[tokio::test]
async fn surgery_routes_follow_schema() {
    let transport = ScriptedTransport::new();
    let surgery: RecordSynchronizer<Surgery> =
        RecordSynchronizer::new(transport.clone(), RecordingPrompt::accepting());
    transport.reply(json!({"success": true}));
    transport.reply(json!({"success": true, "surgeries": []}));

    surgery.delete(RecordId::new(3)).await.unwrap();

    let route = SURGERY.endpoints.delete.unwrap();
    assert_eq!(transport.requests()[0].path, route.path_for(Some(RecordId::new(3))));
    assert_eq!(transport.requests()[1].path, "/api/surgery");
}

#[tokio::test]
async fn set_field_accepts_lists_and_flags() {
    let (_transport, sync) = setup(RecordingPrompt::accepting());
    sync.open_modal(None).await.unwrap();
    sync.set_field("active", false).await.unwrap();
    let modal = sync.modal().await.unwrap();
    assert_eq!(modal.form.get("active"), Some(&FieldValue::Flag(false)));
}

// ── Filters across mutations ─────────────────────────────────────

fn history_body(ids: &[i64]) -> serde_json::Value {
    let records: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "relation": "Father", "livingStatus": "Alive"}))
        .collect();
    json!({"success": true, "records": records})
}

fn query_of(request: &healthcard_sync::ApiRequest) -> Vec<(&str, &str)> {
    request
        .query
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect()
}

async fn filtered_history(
    prompt: Arc<RecordingPrompt>,
) -> (Arc<ScriptedTransport>, RecordSynchronizer<FamilyHistoryRecord>, FamilyHistorySearch) {
    let transport = ScriptedTransport::new();
    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport.clone(), prompt);
    let search = FamilyHistorySearch::new(sync.clone());
    transport.reply(history_body(&[4]));
    search.filter_relation("Father").await.unwrap();
    (transport, sync, search)
}

#[tokio::test]
async fn save_reloads_under_the_active_filters() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync, search) = filtered_history(prompt.clone()).await;
    sync.open_modal(None).await.unwrap();
    sync.set_field("relation", "Father").await.unwrap();
    sync.set_field("living_status", "Alive").await.unwrap();
    transport.reply(json!({"success": true}));
    transport.reply(history_body(&[4, 9]));

    let outcome = sync.save().await.unwrap();

    assert_eq!(outcome, SaveOutcome::Saved { id: None });
    let requests = transport.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].path, "/family-history/add");
    assert_eq!(requests[2].path, "/api/family-history");
    assert_eq!(query_of(&requests[2]), vec![("relation", "Father")]);
    assert_eq!(search.query().await.relation, "Father");
    assert_eq!(sync.records().await.len(), 2);
    assert_eq!(prompt.alerts(), vec!["Record saved successfully"]);
}

#[tokio::test]
async fn delete_reloads_under_the_active_filters() {
    let (transport, sync, _search) = filtered_history(RecordingPrompt::accepting()).await;
    transport.reply(json!({"success": true}));
    transport.reply(history_body(&[]));

    sync.delete(RecordId::new(4)).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[1].path, "/family-history/delete/4");
    assert_eq!(query_of(&requests[2]), vec![("relation", "Father")]);
    assert!(sync.render().await.empty_state_visible);
}

#[tokio::test]
async fn reload_repeats_the_latest_query() {
    let transport = ScriptedTransport::new();
    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport.clone(), RecordingPrompt::accepting());
    let query = HistoryQuery {
        q: "diab".to_string(),
        condition: "Diabetes".to_string(),
        ..HistoryQuery::default()
    };
    transport.reply(history_body(&[1]));
    transport.reply(history_body(&[1]));
    transport.reply(history_body(&[1]));

    sync.load_with(&query).await.unwrap();
    sync.reload().await.unwrap();
    assert_eq!(
        sync.current_query().await,
        vec![("q", "diab".to_string()), ("condition", "Diabetes".to_string())]
    );
    sync.load().await.unwrap();

    let requests = transport.requests();
    assert_eq!(query_of(&requests[1]), vec![("q", "diab"), ("condition", "Diabetes")]);
    assert!(requests[2].query.is_empty());
    assert!(sync.current_query().await.is_empty());
}

// ── Vitals ───────────────────────────────────────────────────────

fn vitals_body() -> serde_json::Value {
    json!({"success": true, "vitals": [
        {"id": 7, "weight": 70, "height": 175, "heart_rate": "72"}
    ]})
}

#[tokio::test]
async fn vitals_need_one_measurement() {
    let prompt = RecordingPrompt::accepting();
    let transport = ScriptedTransport::new();
    let sync: VitalsSync = RecordSynchronizer::new(transport.clone(), prompt.clone());
    sync.open_modal(None).await.unwrap();
    sync.set_field("notes", "after a run").await.unwrap();

    let outcome = sync.save().await.unwrap();

    assert!(matches!(outcome, SaveOutcome::Invalid(_)));
    assert_eq!(prompt.alerts(), vec!["Please fill at least one vital measurement."]);
    assert_eq!(transport.request_count(), 0);
}

#[tokio::test]
async fn vitals_save_keeps_the_day_window() {
    let prompt = RecordingPrompt::accepting();
    let transport = ScriptedTransport::new();
    let sync: VitalsSync = RecordSynchronizer::new(transport.clone(), prompt.clone());
    transport.reply(vitals_body());
    sync.load_days(30).await.unwrap();
    sync.open_modal(None).await.unwrap();
    sync.set_field("weight", "71").await.unwrap();
    transport.reply(json!({"success": true}));
    transport.reply(vitals_body());

    sync.save().await.unwrap();

    let requests = transport.requests();
    assert_eq!(query_of(&requests[0]), vec![("days", "30")]);
    assert_eq!(requests[1].method, HttpMethod::Post);
    assert_eq!(requests[1].path, "/api/vitals");
    match &requests[1].body {
        RequestBody::Json(body) => {
            assert_eq!(body["weight"], json!("71"));
            assert_eq!(body["heart_rate"], json!(null));
            assert_eq!(body["temperature_unit"], json!("F"));
        }
        other => panic!("unexpected body: {other:?}"),
    }
    assert_eq!(query_of(&requests[2]), vec![("days", "30")]);
    assert_eq!(prompt.alerts(), vec!["Vital recorded successfully!"]);
    let stats = sync.stats().await.unwrap();
    assert_eq!(stats.bmi.as_deref(), Some("22.9"));
    assert_eq!(stats.heart_rate.as_deref(), Some("72 bpm"));
}

#[tokio::test]
async fn vitals_have_no_edit_modal() {
    let transport = ScriptedTransport::new();
    let sync: VitalsSync = RecordSynchronizer::new(transport.clone(), RecordingPrompt::accepting());
    transport.reply(vitals_body());
    sync.load().await.unwrap();

    let err = sync.open_modal(Some(RecordId::new(7))).await.unwrap_err();

    assert!(matches!(err, SyncError::Unsupported { operation: "edit", .. }));
    assert!(sync.modal().await.is_none());
}

#[tokio::test]
async fn vitals_delete_uses_its_own_prompt() {
    let prompt = RecordingPrompt::declining();
    let transport = ScriptedTransport::new();
    let sync: VitalsSync = RecordSynchronizer::new(transport.clone(), prompt.clone());

    let outcome = sync.delete(RecordId::new(7)).await.unwrap();

    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(prompt.confirms(), vec!["Delete this vital record?"]);
}

// ── Routes keyed by body ─────────────────────────────────────────

async fn loaded_inventory(prompt: Arc<RecordingPrompt>) -> (Arc<ScriptedTransport>, InventorySync) {
    let transport = ScriptedTransport::new();
    let sync: InventorySync = RecordSynchronizer::new(transport.clone(), prompt);
    transport.reply(json!({"success": true, "inventory": [
        {"id": 2, "name": "Amoxicillin", "category": "Antibiotic", "stock": "25"}
    ]}));
    sync.load().await.unwrap();
    (transport, sync)
}

#[tokio::test]
async fn inventory_update_carries_id_in_body() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = loaded_inventory(prompt.clone()).await;
    sync.open_modal(Some(RecordId::new(2))).await.unwrap();
    sync.set_field("stock", "8").await.unwrap();
    transport.reply(json!({"success": true}));
    transport.reply(json!({"success": true, "inventory": []}));

    sync.save().await.unwrap();

    let request = &transport.requests()[1];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "/api/pharmacy/inventory/update");
    match &request.body {
        RequestBody::Json(body) => {
            assert_eq!(body["id"], json!(2));
            assert_eq!(body["name"], json!("Amoxicillin"));
            assert_eq!(body["stock"], json!("8"));
        }
        other => panic!("unexpected body: {other:?}"),
    }
    assert!(prompt.alerts().is_empty());
}

#[tokio::test]
async fn inventory_delete_posts_the_id() {
    let prompt = RecordingPrompt::accepting();
    let (transport, sync) = loaded_inventory(prompt.clone()).await;
    transport.reply(json!({"success": true}));
    transport.reply(json!({"success": true, "inventory": []}));

    sync.delete(RecordId::new(2)).await.unwrap();

    assert_eq!(
        prompt.confirms(),
        vec!["Are you sure you want to delete this medicine?"]
    );
    let request = &transport.requests()[1];
    assert_eq!(request.method, HttpMethod::Post);
    assert_eq!(request.path, "/api/pharmacy/inventory/delete");
    assert_eq!(
        request.body,
        RequestBody::Json(json!({"id": 2}).as_object().unwrap().clone())
    );
}
