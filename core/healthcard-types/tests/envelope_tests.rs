use healthcard_types::Envelope;
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize, PartialEq)]
struct Item {
    id: i64,
    name: String,
}

fn decode(value: serde_json::Value) -> Envelope {
    serde_json::from_value(value).unwrap()
}

#[test]
fn success_envelope_exposes_collection() {
    let env = decode(json!({
        "success": true,
        "items": [{"id": 1, "name": "a"}, {"id": 2, "name": "b"}]
    }));
    assert!(env.success);
    let items: Vec<Item> = env.collection("items").unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].name, "b");
}

#[test]
fn missing_collection_is_empty() {
    let env = decode(json!({"success": true}));
    let items: Vec<Item> = env.collection("items").unwrap();
    assert!(items.is_empty());
}

#[test]
fn null_collection_is_empty() {
    let env = decode(json!({"success": true, "items": null}));
    let items: Vec<Item> = env.collection("items").unwrap();
    assert!(items.is_empty());
}

#[test]
fn malformed_collection_is_an_error() {
    let env = decode(json!({"success": true, "items": "nope"}));
    let result: healthcard_types::Result<Vec<Item>> = env.collection("items");
    let err = result.unwrap_err().to_string();
    assert!(err.contains("items"));
}

#[test]
fn absent_success_is_failure() {
    let env = decode(json!({"items": []}));
    assert!(!env.success);
}

#[test]
fn failure_message_prefers_message_over_error() {
    let env = decode(json!({"success": false, "message": "first", "error": "second"}));
    assert_eq!(env.failure_message(), Some("first"));
}

#[test]
fn failure_message_falls_back_to_error_key() {
    let env = decode(json!({"success": false, "error": "boom"}));
    assert_eq!(env.failure_message(), Some("boom"));
}

#[test]
fn failure_message_or_uses_fallback() {
    let env = decode(json!({"success": false, "message": ""}));
    assert_eq!(env.failure_message_or("Unknown error"), "Unknown error");
}

#[test]
fn field_decodes_optional_object() {
    #[derive(Debug, Deserialize)]
    struct Stats {
        total: u32,
    }

    let env = decode(json!({"success": true, "stats": {"total": 4}}));
    let stats: Option<Stats> = env.field("stats").unwrap();
    assert_eq!(stats.unwrap().total, 4);

    let env = decode(json!({"success": true}));
    let stats: Option<Stats> = env.field("stats").unwrap();
    assert!(stats.is_none());
}

#[test]
fn constructors() {
    let ok = Envelope::ok(serde_json::Map::new());
    assert!(ok.success);
    assert!(ok.failure_message().is_none());

    let failed = Envelope::failure("nope");
    assert!(!failed.success);
    assert_eq!(failed.failure_message(), Some("nope"));
}

#[test]
fn from_slice_rejects_non_json() {
    assert!(Envelope::from_slice(b"<html>").is_err());
    assert!(Envelope::from_slice(br#"{"success": true}"#).unwrap().success);
}
