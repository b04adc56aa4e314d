//! RPC method handler for the gitlab-reporter JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! Store-backed and pure methods go through [`handle_method`]; methods that
//! talk to GitLab or the capture channel go through [`handle_async_method`].

use std::sync::Mutex;

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::profile_manager::{ProfileManager, ProfileManagerTrait};
use crate::managers::rule_manager::{
    match_url, parse_rules, serialize_rules, RuleManager, RuleManagerTrait,
};
use crate::services::capture_channel::{decode_data_url, CaptureHandle};
use crate::services::gitlab_client::{build_http_client, GitLabClient};
use crate::services::issue_reporter::{self, render_description, reported_at_now};
use crate::services::label_groups::{group_by_scope, LabelSelection};
use crate::services::profile_resolver::resolve_profile;
use crate::services::settings_engine::SettingsEngineTrait;
use crate::services::url_translator::translate_project_url;
use crate::services::version_extractor::{extract_version, fetch_version};
use crate::types::capture::CapturedPage;
use crate::types::issue::IssueDraft;
use crate::types::profile::{Label, Profile, VersionExtractionMode};
use crate::types::rule::{Rule, RuleList};
use crate::types::settings::NetworkSettings;

const ASYNC_METHODS: &[&str] = &[
    "capture.store",
    "capture.screenshot",
    "capture.url",
    "labels.list",
    "version.fetch",
    "issue.submit",
];

/// Returns true if `method` must be dispatched through [`handle_async_method`].
pub fn is_async_method(method: &str) -> bool {
    ASYNC_METHODS.contains(&method)
}

fn str_param<'p>(params: &'p Value, key: &str) -> Result<&'p str, String> {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("missing {}", key))
}

fn rules_param(params: &Value) -> Result<Vec<Rule>, String> {
    let raw = params.get("rules").cloned().ok_or("missing rules")?;
    let items: Vec<Value> = serde_json::from_value(raw).map_err(|e| e.to_string())?;
    // Editors may send rules without ids
    Ok(items
        .iter()
        .map(|item| {
            let url = item.get("url").and_then(|v| v.as_str()).unwrap_or_default();
            let profile = item.get("profile").and_then(|v| v.as_str()).unwrap_or_default();
            match item.get("id").and_then(|v| v.as_str()) {
                Some(id) => Rule {
                    id: id.to_string(),
                    url: url.to_string(),
                    profile: profile.to_string(),
                },
                None => Rule::new(url, profile),
            }
        })
        .collect())
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<Value, String> {
    serde_json::to_value(value).map_err(|e| e.to_string())
}

/// Dispatch a store-backed or pure JSON-RPC method.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub fn handle_method(app: &Mutex<App>, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true})),

        // ─── Profiles ───
        "profile.list" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            let profiles = ProfileManager::new(&store)
                .list_profiles()
                .map_err(|e| e.to_string())?;
            to_json(&profiles)
        }
        "profile.get" => {
            let name = str_param(params, "name")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            let profile = ProfileManager::new(&store)
                .get_profile(name)
                .map_err(|e| e.to_string())?;
            to_json(&profile)
        }
        "profile.upsert" => {
            let raw = params.get("profile").cloned().ok_or("missing profile")?;
            let profile: Profile =
                serde_json::from_value(raw).map_err(|e| format!("invalid profile: {}", e))?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            ProfileManager::new(&store)
                .upsert_profile(&profile)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "profile.delete" => {
            let name = str_param(params, "name")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            ProfileManager::new(&store)
                .delete_profile(name)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "profile.resolve" => {
            let url = str_param(params, "url")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            let profile = resolve_profile(&store, url).map_err(|e| e.to_string())?;
            to_json(&profile)
        }

        // ─── Selection ───
        "selection.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            let selected = ProfileManager::new(&store)
                .get_selected_profile_name()
                .map_err(|e| e.to_string())?;
            Ok(json!({"selected": selected}))
        }
        "selection.set" => {
            let name = str_param(params, "name")?;
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            ProfileManager::new(&store)
                .set_selected_profile_name(name)
                .map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }

        // ─── Rules ───
        "rules.get" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            let mgr = RuleManager::new(&store);
            let text = mgr.get_rules_text().map_err(|e| e.to_string())?;
            let rules = mgr.load_rules().map_err(|e| e.to_string())?;
            Ok(json!({"text": text, "rules": to_json(&rules.rules())?}))
        }
        "rules.set" => {
            let a = app.lock().map_err(|e| e.to_string())?;
            let store = a.store();
            let mut mgr = RuleManager::new(&store);
            if let Some(text) = params.get("text").and_then(|v| v.as_str()) {
                mgr.save_rules_text(text).map_err(|e| e.to_string())?;
            } else {
                let rules = RuleList::from_rules(rules_param(params)?);
                mgr.save_rules(&rules).map_err(|e| e.to_string())?;
            }
            let rules = mgr.load_rules().map_err(|e| e.to_string())?;
            to_json(&rules.rules())
        }
        "rules.parse" => {
            let text = str_param(params, "text")?;
            to_json(&parse_rules(text))
        }
        "rules.serialize" => {
            let rules = rules_param(params)?;
            Ok(json!({"text": serialize_rules(&rules)}))
        }
        "rules.match" => {
            let url = str_param(params, "url")?;
            let rules = if params.get("rules").is_some() {
                rules_param(params)?
            } else {
                let a = app.lock().map_err(|e| e.to_string())?;
                let store = a.store();
                RuleManager::new(&store)
                    .load_rules()
                    .map_err(|e| e.to_string())?
                    .into_rules()
            };
            to_json(&match_url(url, &rules))
        }

        // ─── Pure helpers ───
        "version.extract" => {
            let text = str_param(params, "text")?;
            let mode = VersionExtractionMode::from_stored(params.get("mode").and_then(|v| v.as_str()));
            let rule = params.get("rule").and_then(|v| v.as_str()).unwrap_or("");
            Ok(json!({"version": extract_version(text, mode, rule)}))
        }
        "url.translate" => {
            let url = str_param(params, "url")?;
            let api = translate_project_url(url).map_err(|e| e.to_string())?;
            Ok(json!({"url": api}))
        }
        "labels.group" => {
            let raw = params.get("labels").cloned().ok_or("missing labels")?;
            let labels: Vec<Label> = serde_json::from_value(raw).map_err(|e| e.to_string())?;
            let groups = group_by_scope(&labels);
            let selected = LabelSelection::new(&groups).selected_names();
            Ok(json!({"groups": to_json(&groups)?, "selected": selected}))
        }
        "issue.render" => {
            let raw = params.get("draft").cloned().ok_or("missing draft")?;
            let draft: IssueDraft = serde_json::from_value(raw).map_err(|e| e.to_string())?;
            let screenshot = params.get("screenshot_markdown").and_then(|v| v.as_str()).unwrap_or("");
            let version = params.get("version").and_then(|v| v.as_str()).unwrap_or("");
            let description = render_description(&draft, screenshot, version, &reported_at_now());
            Ok(json!({"description": description}))
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}

/// Picks the profile for a remote call: an explicit `profile` name wins,
/// otherwise the profile resolved for `page_url`.
fn profile_for(
    app: &Mutex<App>,
    params: &Value,
    page_url: &str,
) -> Result<(Profile, NetworkSettings), String> {
    let a = app.lock().map_err(|e| e.to_string())?;
    let store = a.store();
    let profile = match params.get("profile").and_then(|v| v.as_str()) {
        Some(name) => ProfileManager::new(&store)
            .get_profile(name)
            .map_err(|e| e.to_string())?,
        None => resolve_profile(&store, page_url).map_err(|e| e.to_string())?,
    };
    let network = a.settings_engine.get_settings().network.clone();
    profile
        .map(|p| (p, network))
        .ok_or_else(|| "no profile available".to_string())
}

/// Dispatch a method that awaits the network or the capture channel.
///
/// The app lock is never held across an await point.
pub async fn handle_async_method(
    app: &Mutex<App>,
    capture: &CaptureHandle,
    method: &str,
    params: &Value,
) -> Result<Value, String> {
    match method {
        // ─── Capture ───
        "capture.store" => {
            let page = CapturedPage {
                screenshot_data_url: params
                    .get("screenshot_data_url")
                    .and_then(|v| v.as_str())
                    .map(str::to_string),
                page_url: params.get("page_url").and_then(|v| v.as_str()).map(str::to_string),
            };
            capture.store(page).await.map_err(|e| e.to_string())?;
            Ok(json!({"ok": true}))
        }
        "capture.screenshot" => {
            let screenshot = capture.screenshot().await.map_err(|e| e.to_string())?;
            Ok(json!({"screenshot_data_url": screenshot}))
        }
        "capture.url" => {
            let url = capture.page_url().await.map_err(|e| e.to_string())?;
            Ok(json!({"url": url}))
        }

        // ─── GitLab ───
        "labels.list" => {
            let page_url = params.get("url").and_then(|v| v.as_str()).unwrap_or("");
            let (profile, network) = profile_for(app, params, page_url)?;
            let client = GitLabClient::for_profile(&profile, &network).map_err(|e| e.to_string())?;
            let labels = client.list_labels().await.map_err(|e| e.to_string())?;
            to_json(&labels)
        }
        "version.fetch" => {
            let page_url = str_param(params, "url")?;
            let (profile, network) = profile_for(app, params, page_url)?;
            let http = build_http_client(&network).map_err(|e| e.to_string())?;
            let version = fetch_version(&http, page_url, &profile).await;
            Ok(json!({"version": version}))
        }
        "issue.submit" => {
            let raw = params.get("draft").cloned().ok_or("missing draft")?;
            let mut draft: IssueDraft = serde_json::from_value(raw).map_err(|e| e.to_string())?;
            if draft.page_url.is_empty() {
                draft.page_url = capture
                    .page_url()
                    .await
                    .map_err(|e| e.to_string())?
                    .unwrap_or_default();
            }

            let data_url = match params.get("screenshot_data_url").and_then(|v| v.as_str()) {
                Some(url) => url.to_string(),
                None => capture
                    .screenshot()
                    .await
                    .map_err(|e| e.to_string())?
                    .ok_or("no screenshot captured")?,
            };
            let png = decode_data_url(&data_url).map_err(|e| e.to_string())?;

            let (profile, network) = profile_for(app, params, &draft.page_url)?;
            let labels: Vec<String> = match params.get("labels") {
                Some(raw) => serde_json::from_value(raw.clone()).map_err(|e| e.to_string())?,
                None => profile.labels.iter().map(|l| l.name.clone()).collect(),
            };

            let http = build_http_client(&network).map_err(|e| e.to_string())?;
            let version = fetch_version(&http, &draft.page_url, &profile).await;

            let client = GitLabClient::for_profile(&profile, &network).map_err(|e| e.to_string())?;
            let created = issue_reporter::submit(&client, &draft, png, &labels, &version)
                .await
                .map_err(|e| e.to_string())?;
            to_json(&created)
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
