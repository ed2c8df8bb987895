mod common;

use common::RecordingPrompt;
use healthcard_model::filter::HistoryQuery;
use healthcard_model::{Allergy, Attachment, FamilyHistoryRecord, HttpMethod};
use healthcard_sync::{
    ApiRequest, ClientConfig, Debouncer, FamilyHistorySearch, HttpTransport, LoadOutcome,
    RecordSynchronizer, RecordTransport, SaveOutcome, SyncError,
};
use healthcard_types::RecordId;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn transport(server: &MockServer) -> Arc<HttpTransport> {
    let config = ClientConfig {
        session_cookie: Some("abc123".to_string()),
        timeout_secs: 5,
        ..ClientConfig::default().with_base_url(server.uri())
    };
    Arc::new(HttpTransport::new(config).expect("client"))
}

// ── Envelope handling ────────────────────────────────────────────

#[tokio::test]
async fn envelope_is_read_regardless_of_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({"success": false, "message": "Please log in"})),
        )
        .mount(&server)
        .await;

    let response = transport(&server)
        .send(ApiRequest::get("/api/allergies"))
        .await
        .unwrap();

    assert_eq!(response.status, 401);
    assert!(!response.envelope.success);
    assert_eq!(response.envelope.failure_message(), Some("Please log in"));
}

#[tokio::test]
async fn non_json_error_page_is_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .send(ApiRequest::get("/api/surgery"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Http { status: 502, .. }), "{err}");
}

#[tokio::test]
async fn non_json_success_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("OK"))
        .mount(&server)
        .await;

    let err = transport(&server)
        .send(ApiRequest::get("/api/surgery"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Decode(_)), "{err}");
}

#[tokio::test]
async fn slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": true}))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let config = ClientConfig {
        timeout_secs: 1,
        ..ClientConfig::default().with_base_url(server.uri())
    };
    let transport = HttpTransport::new(config).unwrap();

    let err = transport.send(ApiRequest::get("/api/implants")).await.unwrap_err();

    assert!(matches!(err, SyncError::Timeout), "{err}");
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
    let transport = HttpTransport::new(config).unwrap();

    let err = transport.send(ApiRequest::get("/api/implants")).await.unwrap_err();

    assert!(matches!(err, SyncError::Network(_) | SyncError::Timeout), "{err}");
}

#[test]
fn invalid_session_cookie_is_a_config_error() {
    let config = ClientConfig {
        session_cookie: Some("bad\nvalue".to_string()),
        ..ClientConfig::default()
    };
    assert!(matches!(
        HttpTransport::new(config),
        Err(SyncError::Config(_))
    ));
}

// ── Synchronizer over HTTP ───────────────────────────────────────

#[tokio::test]
async fn allergy_round_trip_sends_session_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/allergies"))
        .and(header("cookie", "session=abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "allergies": [{"id": 7, "allergen": "Peanuts", "severity": "severe", "category": "Food"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/allergies/7"))
        .and(header_regex("content-type", "^application/json"))
        .and(body_string_contains("\"severity\":\"Moderate\""))
        .and(body_string_contains("\"allergen\":\"Peanuts\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let sync: RecordSynchronizer<Allergy> =
        RecordSynchronizer::new(transport(&server), RecordingPrompt::accepting());
    sync.load().await.unwrap();
    assert_eq!(sync.render().await.cards[0].title, "Peanuts");

    sync.open_modal(Some(RecordId::new(7))).await.unwrap();
    sync.set_field("severity", "Moderate").await.unwrap();
    let outcome = sync.save().await.unwrap();

    assert_eq!(
        outcome,
        SaveOutcome::Saved {
            id: Some(RecordId::new(7))
        }
    );
}

#[tokio::test]
async fn family_history_saves_as_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/family-history/add"))
        .and(header_regex("content-type", "^multipart/form-data"))
        .and(body_string_contains("Grandmother"))
        .and(body_string_contains("filename=\"scan.pdf\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/family-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "records": [{"id": 1, "relation": "Grandmother", "living_status": "Deceased"}],
            "stats": {"total": 1, "withConditions": 0, "genetic": 0}
        })))
        .mount(&server)
        .await;

    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport(&server), RecordingPrompt::accepting());
    sync.open_modal(None).await.unwrap();
    sync.set_field("relation", "Grandmother").await.unwrap();
    sync.set_field("living_status", "Deceased").await.unwrap();
    sync.attach(Attachment::new("scan.pdf", b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    assert_eq!(sync.save().await.unwrap(), SaveOutcome::Saved { id: None });
    assert_eq!(sync.records().await.len(), 1);
    assert_eq!(sync.stats().await.map(|s| s.total), Some(1));
}

#[tokio::test]
async fn family_history_delete_is_a_post() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/family-history/delete/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/family-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "records": []})))
        .mount(&server)
        .await;

    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport(&server), RecordingPrompt::accepting());

    sync.delete(RecordId::new(4)).await.unwrap();
}

#[tokio::test]
async fn family_history_filters_become_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/family-history"))
        .and(query_param("relation", "Father"))
        .and(query_param("condition", "Diabetes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "records": [
            {"id": 2, "relation": "Father", "medicalConditions": ["Diabetes"]}
        ]})))
        .mount(&server)
        .await;

    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport(&server), RecordingPrompt::accepting());
    let query = HistoryQuery {
        relation: "Father".to_string(),
        condition: "Diabetes".to_string(),
        ..HistoryQuery::default()
    };

    let outcome = sync.load_with(&query).await.unwrap();

    assert!(matches!(outcome, LoadOutcome::Applied { count: 1, .. }));
}

#[tokio::test]
async fn debounced_search_sends_one_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/family-history"))
        .and(query_param("q", "diab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "records": []})))
        .expect(1)
        .mount(&server)
        .await;

    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport(&server), RecordingPrompt::accepting());
    let search = FamilyHistorySearch::with_debouncer(sync, Debouncer::new(Duration::from_millis(50)));

    let (a, b, c) = tokio::join!(
        search.search("d"),
        async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            search.search("dia").await
        },
        async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            search.search("diab").await
        },
    );

    assert!(a.is_none());
    assert!(b.is_none());
    assert!(c.expect("last keystroke fires").unwrap().is_applied());
    assert_eq!(search.query().await.q, "diab");
}

#[tokio::test]
async fn reset_clears_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/family-history"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true, "records": []})))
        .mount(&server)
        .await;
    let sync: RecordSynchronizer<FamilyHistoryRecord> =
        RecordSynchronizer::new(transport(&server), RecordingPrompt::accepting());
    let search = FamilyHistorySearch::new(sync);

    search.filter_relation("Mother").await.unwrap();
    assert_eq!(search.query().await.relation, "Mother");
    search.reset().await.unwrap();

    assert_eq!(search.query().await, HistoryQuery::default());
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].url.query(), None);
    assert_eq!(requests[0].method.as_str(), HttpMethod::Get.as_str());
}
