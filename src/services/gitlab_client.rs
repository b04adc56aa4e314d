//! GitLab REST client for gitlab-reporter.
//!
//! Covers the three project-scoped calls the reporter needs: uploading the
//! screenshot, creating the issue and listing labels. Every request carries
//! `PRIVATE-TOKEN`; statuses outside 200..400 become [`GitLabError`]s.

use std::time::Duration;

use log::{debug, warn};
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::Value;
use zeroize::Zeroize;

use crate::services::url_translator::translate_project_url;
use crate::types::errors::GitLabError;
use crate::types::issue::{ApiLabel, CreatedIssue, NewIssue, UploadedFile};
use crate::types::profile::{Label, Profile};
use crate::types::settings::NetworkSettings;

const TOKEN_HEADER: &str = "PRIVATE-TOKEN";

pub const OP_UPLOAD: &str = "upload image";
pub const OP_CREATE_ISSUE: &str = "create issue";
pub const OP_LIST_LABELS: &str = "list labels";

/// Client bound to one project's API base and token.
pub struct GitLabClient {
    http: reqwest::Client,
    api_base: String,
    token: String,
}

impl GitLabClient {
    pub fn new(
        project_address: &str,
        token: &str,
        settings: &NetworkSettings,
    ) -> Result<Self, GitLabError> {
        let api_base = translate_project_url(project_address)
            .map_err(|e| GitLabError::InvalidProjectAddress(e.to_string()))?;
        let http = build_http_client(settings)?;
        Ok(Self {
            http,
            api_base,
            token: token.to_string(),
        })
    }

    pub fn for_profile(profile: &Profile, settings: &NetworkSettings) -> Result<Self, GitLabError> {
        Self::new(&profile.project_address, &profile.private_token, settings)
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Uploads an image and returns the Markdown snippet GitLab generated for it.
    pub async fn upload_image(&self, png: Vec<u8>, file_name: &str) -> Result<String, GitLabError> {
        let part = Part::bytes(png)
            .file_name(file_name.to_string())
            .mime_str("image/png")?;
        let form = Form::new().part("file", part);

        let response = self
            .http
            .post(format!("{}/uploads", self.api_base))
            .header(TOKEN_HEADER, &self.token)
            .multipart(form)
            .send()
            .await?;
        let response = check_response(response, OP_UPLOAD).await?;

        let uploaded: UploadedFile = response
            .json()
            .await
            .map_err(|e| GitLabError::InvalidResponse(e.to_string()))?;
        debug!("Uploaded {} to {}", file_name, self.api_base);
        Ok(uploaded.markdown)
    }

    pub async fn create_issue(&self, issue: &NewIssue) -> Result<CreatedIssue, GitLabError> {
        let response = self
            .http
            .post(format!("{}/issues", self.api_base))
            .header(TOKEN_HEADER, &self.token)
            .json(issue)
            .send()
            .await?;
        let response = check_response(response, OP_CREATE_ISSUE).await?;

        response
            .json()
            .await
            .map_err(|e| GitLabError::InvalidResponse(e.to_string()))
    }

    /// Lists up to 100 project labels, de-duplicated by name.
    pub async fn list_labels(&self) -> Result<Vec<Label>, GitLabError> {
        let response = self
            .http
            .get(format!("{}/labels", self.api_base))
            .query(&[("per_page", "100")])
            .header(TOKEN_HEADER, &self.token)
            .send()
            .await?;
        let response = check_response(response, OP_LIST_LABELS).await?;

        let labels: Vec<ApiLabel> = response
            .json()
            .await
            .map_err(|e| GitLabError::InvalidResponse(e.to_string()))?;
        Ok(dedup_labels(labels))
    }
}

impl Drop for GitLabClient {
    fn drop(&mut self) {
        self.token.zeroize();
    }
}

/// Builds the shared HTTP client with the configured timeout and user agent.
pub fn build_http_client(settings: &NetworkSettings) -> Result<reqwest::Client, GitLabError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.timeout_secs))
        .user_agent(settings.user_agent.clone())
        .build()
        .map_err(GitLabError::from)
}

async fn check_response(response: Response, operation: &str) -> Result<Response, GitLabError> {
    let status = response.status().as_u16();
    if (200..400).contains(&status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = error_from_response(operation, status, &body);
    warn!("GitLab {} returned {}: {}", operation, status, err);
    Err(err)
}

/// Maps a failed response to an error, preferring GitLab's `message` field.
///
/// String messages are used verbatim; structured messages (GitLab sends maps
/// for validation failures) are rendered as JSON.
pub fn error_from_response(operation: &str, status: u16, body: &str) -> GitLabError {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").cloned())
        .and_then(|m| match m {
            Value::Null => None,
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        });

    match message {
        Some(message) => GitLabError::ApiError {
            operation: operation.to_string(),
            message,
        },
        None => GitLabError::StatusError {
            operation: operation.to_string(),
            status,
        },
    }
}

/// Converts API labels and keeps only the first label of each name.
pub fn dedup_labels(labels: Vec<ApiLabel>) -> Vec<Label> {
    let mut result: Vec<Label> = Vec::with_capacity(labels.len());
    for label in labels {
        if result.iter().any(|l| l.name == label.name) {
            continue;
        }
        result.push(Label {
            name: label.name,
            color: label.color,
            text_color: label.text_color,
        });
    }
    result
}
