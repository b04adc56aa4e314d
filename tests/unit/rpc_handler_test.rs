//! Unit tests for the JSON-RPC dispatcher against a temp database.

use std::sync::Mutex;

use gitlab_reporter::app::App;
use gitlab_reporter::rpc_handler::{handle_async_method, handle_method, is_async_method};
use gitlab_reporter::services::capture_channel;
use serde_json::{json, Value};
use tempfile::TempDir;

fn setup() -> (Mutex<App>, TempDir) {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("store.db").to_string_lossy().to_string();
    let settings = dir.path().join("settings.json").to_string_lossy().to_string();
    let app = App::open(&db, Some(settings)).unwrap();
    (Mutex::new(app), dir)
}

fn call(app: &Mutex<App>, method: &str, params: Value) -> Result<Value, String> {
    handle_method(app, method, &params)
}

fn profile_json(name: &str, address: &str) -> Value {
    json!({
        "profileName": name,
        "projectAddress": address,
        "privateToken": "glpat-secret",
        "labels": [{"name": "bug"}, {"name": "priority::high"}],
    })
}

#[test]
fn test_ping() {
    let (app, _dir) = setup();
    assert_eq!(call(&app, "ping", json!({})).unwrap(), json!({"pong": true}));
}

#[test]
fn test_unknown_method() {
    let (app, _dir) = setup();
    let err = call(&app, "profile.explode", json!({})).unwrap_err();
    assert_eq!(err, "unknown method: profile.explode");
}

#[test]
fn test_async_method_classification() {
    assert!(is_async_method("issue.submit"));
    assert!(is_async_method("capture.store"));
    assert!(!is_async_method("profile.resolve"));
}

#[test]
fn test_profile_crud() {
    let (app, _dir) = setup();
    call(
        &app,
        "profile.upsert",
        json!({"profile": profile_json("web", "https://git.example.com/qa/web")}),
    )
    .unwrap();

    let listed = call(&app, "profile.list", json!({})).unwrap();
    assert_eq!(listed.as_array().map(|a| a.len()), Some(1));

    let got = call(&app, "profile.get", json!({"name": "web"})).unwrap();
    assert_eq!(got["projectAddress"], "https://git.example.com/qa/web");
    assert_eq!(got["versionExtractionMode"], "text");

    call(&app, "profile.delete", json!({"name": "web"})).unwrap();
    assert_eq!(call(&app, "profile.get", json!({"name": "web"})).unwrap(), Value::Null);
}

#[test]
fn test_upsert_auto_is_rejected() {
    let (app, _dir) = setup();
    let err = call(&app, "profile.upsert", json!({"profile": profile_json("auto", "x")}))
        .unwrap_err();
    assert!(err.contains("Invalid profile name"));
}

#[test]
fn test_missing_params() {
    let (app, _dir) = setup();
    assert_eq!(call(&app, "profile.get", json!({})).unwrap_err(), "missing name");
    assert_eq!(call(&app, "profile.upsert", json!({})).unwrap_err(), "missing profile");
}

#[test]
fn test_rules_set_get_and_match() {
    let (app, _dir) = setup();
    let saved = call(
        &app,
        "rules.set",
        json!({"text": "staging.example.com/api api\nstaging.example.com web"}),
    )
    .unwrap();
    assert_eq!(saved.as_array().map(|a| a.len()), Some(2));

    let got = call(&app, "rules.get", json!({})).unwrap();
    assert_eq!(got["text"], "staging.example.com/api api\nstaging.example.com web");

    let matched = call(
        &app,
        "rules.match",
        json!({"url": "https://staging.example.com/login"}),
    )
    .unwrap();
    assert_eq!(matched["profile"], "web");

    let none = call(&app, "rules.match", json!({"url": "https://prod.example.com/"})).unwrap();
    assert_eq!(none, Value::Null);
}

#[test]
fn test_rules_set_from_structured_list_drops_incomplete() {
    let (app, _dir) = setup();
    let saved = call(
        &app,
        "rules.set",
        json!({"rules": [
            {"url": "a.example.com", "profile": "a"},
            {"url": "", "profile": "b"},
        ]}),
    )
    .unwrap();
    assert_eq!(saved.as_array().map(|a| a.len()), Some(1));
    assert_eq!(saved[0]["url"], "a.example.com");
}

#[test]
fn test_resolve_auto_through_rules() {
    let (app, _dir) = setup();
    call(
        &app,
        "profile.upsert",
        json!({"profile": profile_json("web", "https://git.example.com/qa/web")}),
    )
    .unwrap();
    call(&app, "rules.set", json!({"text": "staging.example.com web"})).unwrap();

    assert_eq!(
        call(&app, "profile.resolve", json!({"url": "https://staging.example.com/"})).unwrap(),
        Value::Null
    );

    call(&app, "selection.set", json!({"name": "auto"})).unwrap();
    assert_eq!(
        call(&app, "selection.get", json!({})).unwrap(),
        json!({"selected": "auto"})
    );
    let resolved =
        call(&app, "profile.resolve", json!({"url": "https://staging.example.com/"})).unwrap();
    assert_eq!(resolved["profileName"], "web");
}

#[test]
fn test_pure_helpers() {
    let (app, _dir) = setup();

    let translated = call(
        &app,
        "url.translate",
        json!({"url": "https://git.example.com/qa/web.git"}),
    )
    .unwrap();
    assert_eq!(translated["url"], "https://git.example.com/api/v4/projects/qa%2Fweb");

    let version = call(
        &app,
        "version.extract",
        json!({"text": "{\"build\":{\"version\":\"2.4.1\"}}", "mode": "json", "rule": "build.version"}),
    )
    .unwrap();
    assert_eq!(version["version"], "2.4.1");

    let grouped = call(
        &app,
        "labels.group",
        json!({"labels": [{"name": "bug"}, {"name": "p::1"}, {"name": "p::2"}]}),
    )
    .unwrap();
    assert_eq!(grouped["selected"], json!(["bug", "p::1"]));
    assert_eq!(grouped["groups"]["scoped"][0]["scope"], "p");
}

#[test]
fn test_issue_render_includes_sections() {
    let (app, _dir) = setup();
    let rendered = call(
        &app,
        "issue.render",
        json!({
            "draft": {
                "title": "t",
                "steps": "open page",
                "actual": "500",
                "expected": "200",
                "page_url": "https://staging.example.com/",
            },
            "screenshot_markdown": "![s](/uploads/s.png)",
        }),
    )
    .unwrap();
    let body = rendered["description"].as_str().unwrap();
    assert!(body.contains("## Steps to reproduce\nopen page\n"));
    assert!(!body.contains("Version:"));
}

#[tokio::test]
async fn test_capture_round_trip_through_rpc() {
    let (app, _dir) = setup();
    let capture = capture_channel::spawn();

    handle_async_method(
        &app,
        &capture,
        "capture.store",
        &json!({"screenshot_data_url": "data:image/png;base64,AA==", "page_url": "https://a.example.com/"}),
    )
    .await
    .unwrap();

    let url = handle_async_method(&app, &capture, "capture.url", &json!({}))
        .await
        .unwrap();
    assert_eq!(url, json!({"url": "https://a.example.com/"}));
}

#[tokio::test]
async fn test_submit_without_profile_fails() {
    let (app, _dir) = setup();
    let capture = capture_channel::spawn();

    let err = handle_async_method(
        &app,
        &capture,
        "issue.submit",
        &json!({
            "draft": {"title": "t", "steps": "s", "actual": "a", "expected": "e",
                      "page_url": "https://nowhere.example.com/"},
            "screenshot_data_url": "data:image/png;base64,AA==",
        }),
    )
    .await
    .unwrap_err();
    assert_eq!(err, "no profile available");
}

#[test]
fn test_rules_set_keeps_editor_ids() {
    let (app, _dir) = setup();
    let saved = call(
        &app,
        "rules.set",
        json!({"rules": [
            {"id": "rule-a", "url": "a.example.com", "profile": "a"},
            {"id": "rule-b", "url": "b.example.com", "profile": "b"},
        ]}),
    )
    .unwrap();
    assert_eq!(saved[0]["id"], "rule-a");
    assert_eq!(saved[1]["id"], "rule-b");

    let first = call(&app, "rules.get", json!({})).unwrap();
    let second = call(&app, "rules.get", json!({})).unwrap();
    assert_eq!(first["rules"][0]["id"], "rule-a");
    assert_eq!(first, second);
}

#[test]
fn test_rules_set_rejects_separator_in_token() {
    let (app, _dir) = setup();
    call(&app, "rules.set", json!({"text": "keep.example.com web"})).unwrap();

    let err = call(
        &app,
        "rules.set",
        json!({"rules": [{"url": "staging.example.com/a b", "profile": "web"}]}),
    )
    .unwrap_err();
    assert!(err.starts_with("Invalid rule:"));

    let got = call(&app, "rules.get", json!({})).unwrap();
    assert_eq!(got["text"], "keep.example.com web");
}
