//! Version Extractor for gitlab-reporter.
//!
//! Pulls a version string out of the body served at a profile's version
//! endpoint. Version display is advisory: every failure degrades to an empty
//! string and a log line.

use log::{debug, warn};
use regex::Regex;
use serde_json::Value;

use crate::services::url_translator;
use crate::types::profile::{Profile, VersionExtractionMode};

/// Extracts a version from `raw_text` according to `mode` and `rule`.
///
/// - `Text`: the trimmed body
/// - `Json`: `rule` is a dot path such as `data.version`; objects only, no indices
/// - `Regex`: first capture group if the pattern has one, else the whole match
pub fn extract_version(raw_text: &str, mode: VersionExtractionMode, rule: &str) -> String {
    match mode {
        VersionExtractionMode::Text => raw_text.trim().to_string(),
        VersionExtractionMode::Json => extract_json(raw_text, rule),
        VersionExtractionMode::Regex => extract_regex(raw_text, rule),
    }
}

fn extract_json(raw_text: &str, path: &str) -> String {
    let parsed: Value = match serde_json::from_str(raw_text) {
        Ok(v) => v,
        Err(e) => {
            warn!("Version body is not valid JSON: {}", e);
            return String::new();
        }
    };

    let mut current = &parsed;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => match map.get(segment) {
                Some(next) => next,
                None => {
                    debug!("Version path '{}' has no segment '{}'", path, segment);
                    return String::new();
                }
            },
            _ => return String::new(),
        };
    }

    match current {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        // Numbers, booleans and containers keep their JSON text: 1.0 stays "1.0".
        other => other.to_string().trim().to_string(),
    }
}

fn extract_regex(raw_text: &str, pattern: &str) -> String {
    let re = match Regex::new(pattern) {
        Ok(re) => re,
        Err(e) => {
            warn!("Invalid version pattern '{}': {}", pattern, e);
            return String::new();
        }
    };

    match re.captures(raw_text) {
        Some(caps) => caps
            .get(1)
            .or_else(|| caps.get(0))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        None => {
            debug!("Version pattern '{}' did not match", pattern);
            String::new()
        }
    }
}

/// Builds `{origin(page_url)}/{version_path}`; `None` when there is nothing to fetch.
pub fn version_endpoint(page_url: &str, version_path: &str) -> Option<String> {
    if version_path.trim().is_empty() {
        return None;
    }
    let origin = url_translator::origin(page_url).ok()?;
    let path = version_path.trim_start_matches('/');
    Some(format!("{}/{}", origin, path))
}

/// Fetches the profile's version endpoint for `page_url` and extracts the version.
pub async fn fetch_version(client: &reqwest::Client, page_url: &str, profile: &Profile) -> String {
    let endpoint = match version_endpoint(page_url, &profile.version_path) {
        Some(endpoint) => endpoint,
        None => return String::new(),
    };

    let response = match client.get(&endpoint).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("Version request to {} failed: {}", endpoint, e);
            return String::new();
        }
    };

    if !response.status().is_success() {
        debug!("Version endpoint {} returned {}", endpoint, response.status());
        return String::new();
    }

    match response.text().await {
        Ok(body) => extract_version(
            &body,
            profile.version_extraction_mode,
            &profile.version_extraction_rule,
        ),
        Err(e) => {
            warn!("Reading version body from {} failed: {}", endpoint, e);
            String::new()
        }
    }
}
