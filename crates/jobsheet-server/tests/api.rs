//! End-to-end tests for the HTTP surface, driven through `dispatch` so no
//! socket is needed.

use std::fs;

use jobsheet_core::CANONICAL_FIELDS;
use jobsheet_server::{dispatch, ServerConfig, SyncService};
use pretty_assertions::assert_eq;
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;
use tiny_http::Method;

fn service_in(dir: &TempDir) -> SyncService {
    SyncService::initialize(ServerConfig::with_data_dir(dir.path().join("db"))).unwrap()
}

fn get(service: &SyncService, url: &str) -> (u16, JsonValue) {
    let response = dispatch(service, &Method::Get, url, "");
    (response.status, response.body)
}

fn post(service: &SyncService, url: &str, body: &JsonValue) -> (u16, JsonValue) {
    let response = dispatch(service, &Method::Post, url, &body.to_string());
    (response.status, response.body)
}

#[test]
fn headers_lists_the_canonical_schema() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, body) = get(&service, "/headers");
    assert_eq!(status, 200);

    let headers = body["headers"].as_array().unwrap();
    assert_eq!(headers.len(), CANONICAL_FIELDS.len());
    assert_eq!(headers[0], "S.O.#");
}

#[test]
fn records_404_when_the_table_is_missing() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);
    fs::remove_file(dir.path().join("db/jobs.csv")).unwrap();

    let (status, _) = get(&service, "/records");
    assert_eq!(status, 404);

    let (status, _) = get(&service, "/headers");
    assert_eq!(status, 404);
}

#[test]
fn insert_then_search_round_trip() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = post(
        &service,
        "/records",
        &json!({"S.O.#": "10234", "Customer": "Acme"}),
    );
    assert_eq!(status, 200);

    let (status, body) = get(&service, "/search?field=S.O.%23&value=10234");
    assert_eq!(status, 200);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Customer"], "Acme");

    // Every canonical field is present, defaulting to empty
    for field in CANONICAL_FIELDS {
        assert!(rows[0].get(field).is_some(), "missing field {field}");
    }
    assert_eq!(rows[0]["Contact"], "");
}

#[test]
fn search_defaults_to_the_configured_field() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    post(
        &service,
        "/records",
        &json!({"S.O.#": "10234", "P.O.#": "7700001"}),
    );

    let (status, body) = get(&service, "/search?value=7700001");
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[test]
fn search_requires_a_value() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = get(&service, "/search");
    assert_eq!(status, 400);

    let (status, _) = get(&service, "/search?value=");
    assert_eq!(status, 400);
}

#[test]
fn search_with_no_matches_is_404() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, body) = get(&service, "/search?value=99999");
    assert_eq!(status, 404);
    assert!(body["message"].as_str().unwrap().contains("99999"));
}

#[test]
fn search_unknown_field_is_400() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = get(&service, "/search?field=Nope&value=1");
    assert_eq!(status, 400);
}

#[test]
fn insert_rejects_an_empty_body() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let response = dispatch(&service, &Method::Post, "/records", "");
    assert_eq!(response.status, 400);

    let (status, _) = post(&service, "/records", &json!({}));
    assert_eq!(status, 400);
}

#[test]
fn insert_feeds_the_suggestion_lists() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    post(
        &service,
        "/records",
        &json!({"S.O.#": "10234", "machine type": "E-TURN 52"}),
    );

    let (status, body) = get(&service, "/refined");
    assert_eq!(status, 200);
    let lists = body["files"].as_object().unwrap();
    assert_eq!(lists["machine_type"], json!(["E-TURN 52"]));
    assert_eq!(lists["S_O__"], json!(["10234"]));
}

#[test]
fn update_patches_and_missing_identifier_is_404() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    post(
        &service,
        "/records",
        &json!({"S.O.#": "10234", "Customer": "Acme", "REP": "JD"}),
    );

    let (status, _) = post(&service, "/records/10234", &json!({"Customer": "Globex"}));
    assert_eq!(status, 200);

    let (_, body) = get(&service, "/search?field=S.O.%23&value=10234");
    assert_eq!(body[0]["Customer"], "Globex");
    assert_eq!(body[0]["REP"], "JD");

    let (status, _) = post(&service, "/records/99999", &json!({"Customer": "Globex"}));
    assert_eq!(status, 404);
}

#[test]
fn add_suggestion_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = post(
        &service,
        "/refined/machine%20type",
        &json!({"value": "E-TURN 52"}),
    );
    assert_eq!(status, 200);
    let (status, _) = post(
        &service,
        "/refined/machine%20type",
        &json!({"value": "E-TURN 52"}),
    );
    assert_eq!(status, 200);

    let (_, body) = get(&service, "/refined");
    assert_eq!(body["files"]["machine_type"], json!(["E-TURN 52"]));
}

#[test]
fn add_suggestion_validates_input() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = post(&service, "/refined/machine%20type", &json!({"value": ""}));
    assert_eq!(status, 400);

    let (status, _) = post(&service, "/refined/Nope", &json!({"value": "x"}));
    assert_eq!(status, 400);

    let (status, _) = post(&service, "/refined/machine%20type", &json!({"wrong": "x"}));
    assert_eq!(status, 400);
}

#[test]
fn resync_rebuilds_lists_from_the_table() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    post(
        &service,
        "/records",
        &json!({"S.O.#": "10234", "Customer": "Acme"}),
    );

    // Wipe the refined directory, then resync from the table
    fs::remove_dir_all(dir.path().join("db/refined")).unwrap();
    let (status, _) = post(&service, "/refined/sync", &json!(null));
    assert_eq!(status, 200);

    let (_, body) = get(&service, "/refined");
    assert_eq!(body["files"]["Customer"], json!(["Acme"]));
}

#[test]
fn lock_state_merges_across_writes() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = post(&service, "/locks", &json!({"Customer": true}));
    assert_eq!(status, 200);
    let (status, _) = post(&service, "/locks", &json!({"REP": false}));
    assert_eq!(status, 200);

    let (status, body) = get(&service, "/locks");
    assert_eq!(status, 200);
    assert_eq!(body, json!({"Customer": true, "REP": false}));
}

#[test]
fn lock_state_rejects_non_boolean_values() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = post(&service, "/locks", &json!({"Customer": "yes"}));
    assert_eq!(status, 400);
}

#[test]
fn unknown_routes_and_methods() {
    let dir = TempDir::new().unwrap();
    let service = service_in(&dir);

    let (status, _) = get(&service, "/nope");
    assert_eq!(status, 404);

    let response = dispatch(&service, &Method::Post, "/headers", "");
    assert_eq!(response.status, 405);

    let response = dispatch(&service, &Method::Get, "/records/10234", "");
    assert_eq!(response.status, 405);
}

#[test]
fn initialization_is_idempotent_and_syncs_existing_data() {
    let dir = TempDir::new().unwrap();
    {
        let service = service_in(&dir);
        post(
            &service,
            "/records",
            &json!({"S.O.#": "10234", "Customer": "Acme"}),
        );
    }

    // A second process start re-initializes over the same directory
    let service = service_in(&dir);
    let (status, body) = get(&service, "/records");
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (_, body) = get(&service, "/refined");
    assert_eq!(body["files"]["Customer"], json!(["Acme"]));
}
