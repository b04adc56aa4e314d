use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Profile name that switches the resolver into rule-based selection.
pub const AUTO_PROFILE: &str = "auto";

/// A GitLab label attached to a profile or returned by the labels API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Label {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

impl Label {
    /// Creates a label carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: None,
            text_color: None,
        }
    }

    /// Returns true if the label follows the `scope::value` convention.
    pub fn is_scoped(&self) -> bool {
        self.name.contains("::")
    }
}

/// How a version string is pulled out of the version endpoint's body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum VersionExtractionMode {
    #[default]
    Text,
    Json,
    Regex,
}

impl VersionExtractionMode {
    /// Parses a stored mode string. Unknown or missing values fall back to `Text`.
    pub fn from_stored(raw: Option<&str>) -> Self {
        match raw {
            Some("json") => VersionExtractionMode::Json,
            Some("regex") => VersionExtractionMode::Regex,
            _ => VersionExtractionMode::Text,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VersionExtractionMode::Text => "text",
            VersionExtractionMode::Json => "json",
            VersionExtractionMode::Regex => "regex",
        }
    }
}

/// A fully materialized profile with every optional field defaulted.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub profile_name: String,
    pub project_address: String,
    pub private_token: String,
    #[serde(default)]
    pub labels: Vec<Label>,
    #[serde(default)]
    pub version_path: String,
    #[serde(default)]
    pub version_extraction_mode: VersionExtractionMode,
    #[serde(default)]
    pub version_extraction_rule: String,
}

impl Profile {
    /// Creates a profile with default labels and version settings.
    pub fn new(
        profile_name: impl Into<String>,
        project_address: impl Into<String>,
        private_token: impl Into<String>,
    ) -> Self {
        Self {
            profile_name: profile_name.into(),
            project_address: project_address.into(),
            private_token: private_token.into(),
            labels: Vec::new(),
            version_path: String::new(),
            version_extraction_mode: VersionExtractionMode::Text,
            version_extraction_rule: String::new(),
        }
    }

    /// Materializes a stored entry under the given name.
    pub fn from_entry(name: &str, entry: &ProfileEntry) -> Self {
        Self {
            profile_name: name.to_string(),
            project_address: entry.project_address.clone(),
            private_token: entry.private_token.clone(),
            labels: labels_from_value(&entry.labels),
            version_path: entry.version_path.clone().unwrap_or_default(),
            version_extraction_mode: VersionExtractionMode::from_stored(
                entry.version_extraction_mode.as_deref(),
            ),
            version_extraction_rule: entry.version_extraction_rule.clone().unwrap_or_default(),
        }
    }

    /// Converts the profile into its stored shape (the name becomes the map key).
    pub fn to_entry(&self) -> ProfileEntry {
        ProfileEntry {
            project_address: self.project_address.clone(),
            private_token: self.private_token.clone(),
            labels: serde_json::to_value(&self.labels).unwrap_or(Value::Array(Vec::new())),
            version_path: Some(self.version_path.clone()),
            version_extraction_mode: Some(self.version_extraction_mode.as_str().to_string()),
            version_extraction_rule: Some(self.version_extraction_rule.clone()),
        }
    }
}

impl fmt::Debug for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Profile")
            .field("profile_name", &self.profile_name)
            .field("project_address", &self.project_address)
            .field("private_token", &"<redacted>")
            .field("labels", &self.labels)
            .field("version_path", &self.version_path)
            .field("version_extraction_mode", &self.version_extraction_mode)
            .field("version_extraction_rule", &self.version_extraction_rule)
            .finish()
    }
}

/// Stored shape of a single profile inside the `projectsProfile` document.
///
/// Optional fields stay optional here; defaults are applied only when the entry
/// is materialized into a [`Profile`]. `labels` is kept as raw JSON because two
/// shapes exist in persisted data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEntry {
    #[serde(default)]
    pub project_address: String,
    #[serde(default)]
    pub private_token: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub labels: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_extraction_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_extraction_rule: Option<String>,
}

/// The whole `projectsProfile` document: profile name to stored entry.
pub type ProfilesMap = BTreeMap<String, ProfileEntry>;

/// Normalizes the raw `labels` value of a stored profile.
///
/// - an array keeps every entry that decodes as a label; nulls are dropped
/// - a string is the legacy comma-separated format and yields name-only labels
/// - anything else (absent, null, numbers) yields no labels
pub fn labels_from_value(raw: &Value) -> Vec<Label> {
    match raw {
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .filter_map(|item| serde_json::from_value::<Label>(item.clone()).ok())
            .collect(),
        // Unlike a bare comma split, "bug, urgent" yields "bug" and "urgent".
        Value::String(legacy) => legacy
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(Label::named)
            .collect(),
        _ => Vec::new(),
    }
}

/// The selection mode persisted under `selectedProfile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileSelection {
    /// No profile is in use.
    None,
    /// Pick the profile by matching the page URL against the rules.
    Auto,
    /// Always use the named profile.
    Named(String),
}

impl ProfileSelection {
    /// Interprets the stored string value.
    pub fn from_stored(raw: &str) -> Self {
        match raw {
            "" => ProfileSelection::None,
            AUTO_PROFILE => ProfileSelection::Auto,
            name => ProfileSelection::Named(name.to_string()),
        }
    }

    /// Returns the string written to the store.
    pub fn as_stored(&self) -> &str {
        match self {
            ProfileSelection::None => "",
            ProfileSelection::Auto => AUTO_PROFILE,
            ProfileSelection::Named(name) => name,
        }
    }
}
