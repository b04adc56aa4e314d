//! Issue Reporter for gitlab-reporter.
//!
//! Turns a tester's draft and screenshot into a GitLab issue. The screenshot
//! is uploaded first; if that fails no issue is created.

use chrono::Local;
use log::info;

use crate::services::gitlab_client::GitLabClient;
use crate::types::errors::IssueError;
use crate::types::issue::{CreatedIssue, IssueDraft, NewIssue};

pub const SCREENSHOT_FILE_NAME: &str = "screenshot.png";

impl IssueDraft {
    /// Fails on the first empty required field.
    pub fn validate(&self) -> Result<(), IssueError> {
        let required = [
            ("title", &self.title),
            ("steps", &self.steps),
            ("actual", &self.actual),
            ("expected", &self.expected),
            ("page_url", &self.page_url),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(IssueError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// Renders the issue body. `version` is omitted from the preconditions when empty.
pub fn render_description(
    draft: &IssueDraft,
    screenshot_markdown: &str,
    version: &str,
    reported_at: &str,
) -> String {
    let mut preconditions = vec![
        format!("1. Environment: {}", draft.user_agent),
        format!("1. Test URL: {}", draft.page_url),
        format!("1. Test time: {}", reported_at),
    ];
    if !version.is_empty() {
        preconditions.push(format!("1. Version: {}", version));
    }

    format!(
        "## Preconditions\n{}\n## Steps to reproduce\n{}\n## Screenshot\n{}\n## Actual result\n{}\n## Expected result\n{}\n",
        preconditions.join("\n"),
        draft.steps,
        screenshot_markdown,
        draft.actual,
        draft.expected,
    )
}

/// Local time in the format used for the "Test time" line.
pub fn reported_at_now() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Validates, uploads the screenshot, then creates the issue.
pub async fn submit(
    client: &GitLabClient,
    draft: &IssueDraft,
    screenshot_png: Vec<u8>,
    labels: &[String],
    version: &str,
) -> Result<CreatedIssue, IssueError> {
    draft.validate()?;
    if screenshot_png.is_empty() {
        return Err(IssueError::InvalidScreenshot("screenshot is empty".to_string()));
    }

    let markdown = client
        .upload_image(screenshot_png, SCREENSHOT_FILE_NAME)
        .await?;

    let issue = NewIssue {
        title: draft.title.clone(),
        description: render_description(draft, &markdown, version, &reported_at_now()),
        labels: labels.join(","),
    };
    let created = client.create_issue(&issue).await?;

    info!("Created issue {}", created.web_url);
    Ok(created)
}
