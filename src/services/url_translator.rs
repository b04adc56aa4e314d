//! Translates GitLab project web addresses into REST API base URLs.

use url::Url;

use crate::types::errors::UrlError;

/// Path marker that identifies an address as already pointing at the API.
pub const API_PROJECTS_MARKER: &str = "/api/v4/projects/";

/// Turns `http://host/group/sub/project.git` into
/// `http://host/api/v4/projects/group%2Fsub%2Fproject`.
///
/// Addresses that already contain [`API_PROJECTS_MARKER`] are returned as-is,
/// which makes the translation idempotent.
pub fn translate_project_url(project_url: &str) -> Result<String, UrlError> {
    if project_url.contains(API_PROJECTS_MARKER) {
        return Ok(project_url.to_string());
    }

    let url = parse_absolute(project_url)?;
    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);
    let path = path.strip_suffix('/').unwrap_or(path);
    let project_path = path.strip_suffix(".git").unwrap_or(path);

    Ok(format!(
        "{}{}{}",
        origin_of(&url),
        API_PROJECTS_MARKER,
        urlencoding::encode(project_path)
    ))
}

/// Returns `scheme://host[:port]` of an absolute URL.
pub fn origin(page_url: &str) -> Result<String, UrlError> {
    let url = parse_absolute(page_url)?;
    Ok(origin_of(&url))
}

fn origin_of(url: &Url) -> String {
    url.origin().ascii_serialization()
}

fn parse_absolute(raw: &str) -> Result<Url, UrlError> {
    let url = Url::parse(raw).map_err(|e| UrlError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !url.has_host() {
        return Err(UrlError::InvalidUrl {
            url: raw.to_string(),
            reason: "URL has no host".to_string(),
        });
    }
    Ok(url)
}
