use serde::{Deserialize, Serialize};

/// The fields a tester fills in before filing a report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueDraft {
    pub title: String,
    pub steps: String,
    pub actual: String,
    pub expected: String,
    #[serde(default)]
    pub page_url: String,
    #[serde(default)]
    pub user_agent: String,
}

/// Body of `POST {base}/issues`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewIssue {
    pub title: String,
    pub description: String,
    /// Comma-joined label names.
    pub labels: String,
}

/// The parts of GitLab's issue object this crate uses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedIssue {
    #[serde(default)]
    pub iid: Option<u64>,
    #[serde(default)]
    pub title: String,
    pub web_url: String,
}

/// Response of `POST {base}/uploads`.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadedFile {
    pub markdown: String,
}

/// A label as returned by `GET {base}/labels`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub text_color: Option<String>,
}
