//! Profile Resolver for gitlab-reporter.
//!
//! Answers "which profile applies to this page" from the selection mode,
//! the persisted rules and the profile registry. Read-only.

use log::debug;

use crate::database::kv_store::KeyValueStore;
use crate::managers::profile_manager::{ProfileManager, ProfileManagerTrait};
use crate::managers::rule_manager::{match_url, RuleManager, RuleManagerTrait};
use crate::types::errors::ProfileError;
use crate::types::profile::{Profile, ProfileSelection};

/// Resolves the profile for `current_page_url`.
///
/// `Ok(None)` covers every "nothing configured" case: no selection, no rule
/// match in auto mode, or a selection/rule naming a profile that no longer exists.
/// Only store failures are errors.
pub fn resolve_profile(
    store: &dyn KeyValueStore,
    current_page_url: &str,
) -> Result<Option<Profile>, ProfileError> {
    let profiles = ProfileManager::new(store);

    let name = match profiles.get_selection()? {
        ProfileSelection::None => return Ok(None),
        ProfileSelection::Named(name) => name,
        ProfileSelection::Auto => {
            let rules = RuleManager::new(store)
                .load_rules()
                .map_err(|e| ProfileError::StorageError(e.to_string()))?;
            match match_url(current_page_url, rules.rules()) {
                Some(rule) => rule.profile.clone(),
                None => {
                    debug!("No rule matches {}", current_page_url);
                    return Ok(None);
                }
            }
        }
    };

    let profile = profiles.get_profile(&name)?;
    if profile.is_none() {
        debug!("Profile '{}' is selected but not stored", name);
    }
    Ok(profile)
}
