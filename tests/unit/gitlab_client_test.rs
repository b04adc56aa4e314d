//! Unit tests for the GitLab client: construction, error mapping, label
//! de-duplication, and requests against a local stub server.

mod common;

use common::StubServer;
use gitlab_reporter::services::gitlab_client::{
    dedup_labels, error_from_response, GitLabClient, OP_CREATE_ISSUE, OP_LIST_LABELS, OP_UPLOAD,
};
use gitlab_reporter::types::errors::GitLabError;
use gitlab_reporter::types::issue::{ApiLabel, NewIssue};
use gitlab_reporter::types::profile::Profile;
use gitlab_reporter::types::settings::NetworkSettings;

fn api_label(name: &str, color: &str) -> ApiLabel {
    ApiLabel {
        name: name.to_string(),
        color: Some(color.to_string()),
        text_color: Some("#FFFFFF".to_string()),
    }
}

#[test]
fn test_client_uses_translated_api_base() {
    let profile = Profile::new("web", "https://git.example.com/qa/web.git", "t");
    let client = GitLabClient::for_profile(&profile, &NetworkSettings::default()).unwrap();
    assert_eq!(client.api_base(), "https://git.example.com/api/v4/projects/qa%2Fweb");
}

#[test]
fn test_client_rejects_unparseable_address() {
    let result = GitLabClient::new("qa/web", "t", &NetworkSettings::default());
    assert!(matches!(result, Err(GitLabError::InvalidProjectAddress(_))));
}

#[test]
fn test_error_uses_string_message() {
    let err = error_from_response(OP_CREATE_ISSUE, 401, r#"{"message":"401 Unauthorized"}"#);
    assert_eq!(err.to_string(), "401 Unauthorized");
}

#[test]
fn test_error_renders_structured_message_as_json() {
    let err = error_from_response(OP_CREATE_ISSUE, 400, r#"{"message":{"title":["can't be blank"]}}"#);
    assert_eq!(err.to_string(), r#"{"title":["can't be blank"]}"#);
}

#[test]
fn test_error_falls_back_to_status() {
    let err = error_from_response(OP_UPLOAD, 502, "<html>Bad Gateway</html>");
    assert_eq!(err.to_string(), "upload image failed, status: 502");

    let err = error_from_response(OP_UPLOAD, 500, r#"{"error":"boom"}"#);
    assert!(matches!(err, GitLabError::StatusError { status: 500, .. }));
}

#[test]
fn test_dedup_keeps_first_occurrence() {
    let labels = dedup_labels(vec![
        api_label("bug", "#FF0000"),
        api_label("priority::high", "#00FF00"),
        api_label("bug", "#0000FF"),
    ]);
    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["bug", "priority::high"]);
    assert_eq!(labels[0].color.as_deref(), Some("#FF0000"));
    assert_eq!(labels[0].text_color.as_deref(), Some("#FFFFFF"));
}

fn stub_client(server: &StubServer) -> GitLabClient {
    let address = format!("{}/qa/web", server.origin);
    GitLabClient::new(&address, "glpat-secret", &NetworkSettings::default()).unwrap()
}

fn new_issue() -> NewIssue {
    NewIssue {
        title: "Broken login".to_string(),
        description: "## Preconditions".to_string(),
        labels: "bug,priority::high".to_string(),
    }
}

#[tokio::test]
async fn test_upload_sends_token_and_returns_markdown() {
    let server = StubServer::start(&[(
        "/uploads",
        201,
        r#"{"alt":"screenshot","url":"/uploads/abc/screenshot.png","markdown":"![screenshot](/uploads/abc/screenshot.png)"}"#,
    )])
    .await;

    let markdown = stub_client(&server)
        .upload_image(vec![0x89, b'P', b'N', b'G'], "screenshot.png")
        .await
        .unwrap();
    assert_eq!(markdown, "![screenshot](/uploads/abc/screenshot.png)");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/api/v4/projects/qa%2Fweb/uploads");
    assert_eq!(requests[0].token.as_deref(), Some("glpat-secret"));
    assert!(requests[0].body.contains("filename=\"screenshot.png\""));
}

#[tokio::test]
async fn test_create_issue_posts_labels() {
    let server = StubServer::start(&[(
        "/issues",
        201,
        r#"{"iid":12,"title":"Broken login","web_url":"https://git.example.com/qa/web/-/issues/12"}"#,
    )])
    .await;

    let created = stub_client(&server).create_issue(&new_issue()).await.unwrap();
    assert_eq!(created.iid, Some(12));
    assert_eq!(created.web_url, "https://git.example.com/qa/web/-/issues/12");

    let requests = server.requests();
    assert_eq!(requests[0].token.as_deref(), Some("glpat-secret"));
    assert!(requests[0].body.contains(r#""labels":"bug,priority::high""#));
}

#[tokio::test]
async fn test_failed_call_surfaces_gitlab_message() {
    let server = StubServer::start(&[(
        "/issues",
        400,
        r#"{"message":{"title":["can't be blank"]}}"#,
    )])
    .await;

    let err = stub_client(&server).create_issue(&new_issue()).await.unwrap_err();
    match err {
        GitLabError::ApiError { operation, message } => {
            assert_eq!(operation, OP_CREATE_ISSUE);
            assert_eq!(message, r#"{"title":["can't be blank"]}"#);
        }
        other => panic!("expected ApiError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_failed_call_without_message_reports_status() {
    let server = StubServer::start(&[("/labels", 503, "")]).await;

    let err = stub_client(&server).list_labels().await.unwrap_err();
    assert!(matches!(err, GitLabError::StatusError { status: 503, .. }));
    assert_eq!(err.to_string(), format!("{} failed, status: 503", OP_LIST_LABELS));
}

#[tokio::test]
async fn test_list_labels_pages_and_dedups() {
    let server = StubServer::start(&[(
        "/labels",
        200,
        r##"[{"name":"bug","color":"#FF0000","text_color":"#FFFFFF"},{"name":"bug","color":"#000000"},{"name":"priority::high"}]"##,
    )])
    .await;

    let labels = stub_client(&server).list_labels().await.unwrap();
    let names: Vec<&str> = labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["bug", "priority::high"]);
    assert_eq!(labels[0].color.as_deref(), Some("#FF0000"));

    let requests = server.requests();
    assert_eq!(requests[0].method, "GET");
    assert_eq!(requests[0].query.as_deref(), Some("per_page=100"));
    assert_eq!(requests[0].token.as_deref(), Some("glpat-secret"));
}
