//! Profile Manager for gitlab-reporter.
//!
//! Implements `ProfileManagerTrait`: CRUD over the `projectsProfile` document
//! plus the `selectedProfile` value that deletion keeps consistent.

use log::{debug, info};

use crate::database::kv_store::{KeyValueStore, PROFILES_KEY, SELECTED_PROFILE_KEY};
use crate::types::errors::ProfileError;
use crate::types::profile::{Profile, ProfileSelection, ProfilesMap, AUTO_PROFILE};

/// Trait defining profile registry operations.
pub trait ProfileManagerTrait {
    fn list_profiles(&self) -> Result<Vec<Profile>, ProfileError>;
    fn get_profile(&self, name: &str) -> Result<Option<Profile>, ProfileError>;
    /// Inserts or fully replaces the entry stored under `profile.profile_name`.
    fn upsert_profile(&mut self, profile: &Profile) -> Result<(), ProfileError>;
    /// Removes a profile. Absent names are not an error.
    fn delete_profile(&mut self, name: &str) -> Result<(), ProfileError>;
    fn get_selected_profile_name(&self) -> Result<String, ProfileError>;
    fn set_selected_profile_name(&mut self, name: &str) -> Result<(), ProfileError>;
    fn get_selection(&self) -> Result<ProfileSelection, ProfileError>;
}

/// Profile registry over a key/value store.
pub struct ProfileManager<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> ProfileManager<'a> {
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Reads and decodes the profile map. A missing or empty document is an empty map.
    pub fn load_map(&self) -> Result<ProfilesMap, ProfileError> {
        match self.store.get(PROFILES_KEY)? {
            Some(raw) if !raw.trim().is_empty() => parse_profiles(&raw),
            _ => Ok(ProfilesMap::new()),
        }
    }

    fn save_map(&self, profiles: &ProfilesMap) -> Result<(), ProfileError> {
        let raw = serde_json::to_string(profiles)
            .map_err(|e| ProfileError::SerializationError(e.to_string()))?;
        self.store.set(PROFILES_KEY, &raw)?;
        Ok(())
    }
}

/// Decodes a `projectsProfile` document.
///
/// Pure: label normalization happens later in [`Profile::from_entry`].
pub fn parse_profiles(raw: &str) -> Result<ProfilesMap, ProfileError> {
    serde_json::from_str(raw).map_err(|e| ProfileError::SerializationError(e.to_string()))
}

/// Rejects names that can never be stored.
pub fn validate_profile_name(name: &str) -> Result<(), ProfileError> {
    if name.is_empty() {
        return Err(ProfileError::InvalidName(
            "profile name cannot be empty".to_string(),
        ));
    }
    if name == AUTO_PROFILE {
        return Err(ProfileError::InvalidName(format!(
            "'{}' is reserved for automatic matching",
            AUTO_PROFILE
        )));
    }
    Ok(())
}

impl<'a> ProfileManagerTrait for ProfileManager<'a> {
    fn list_profiles(&self) -> Result<Vec<Profile>, ProfileError> {
        let map = self.load_map()?;
        Ok(map
            .iter()
            .map(|(name, entry)| Profile::from_entry(name, entry))
            .collect())
    }

    fn get_profile(&self, name: &str) -> Result<Option<Profile>, ProfileError> {
        let map = self.load_map()?;
        Ok(map.get(name).map(|entry| Profile::from_entry(name, entry)))
    }

    fn upsert_profile(&mut self, profile: &Profile) -> Result<(), ProfileError> {
        validate_profile_name(&profile.profile_name)?;

        let mut map = self.load_map()?;
        map.insert(profile.profile_name.clone(), profile.to_entry());
        self.save_map(&map)?;

        debug!("Saved profile '{}'", profile.profile_name);
        Ok(())
    }

    fn delete_profile(&mut self, name: &str) -> Result<(), ProfileError> {
        let mut map = self.load_map()?;
        if map.remove(name).is_some() {
            self.save_map(&map)?;
            info!("Deleted profile '{}'", name);
        }

        if self.get_selected_profile_name()? == name {
            self.set_selected_profile_name("")?;
        }
        Ok(())
    }

    fn get_selected_profile_name(&self) -> Result<String, ProfileError> {
        Ok(self.store.get(SELECTED_PROFILE_KEY)?.unwrap_or_default())
    }

    fn set_selected_profile_name(&mut self, name: &str) -> Result<(), ProfileError> {
        self.store.set(SELECTED_PROFILE_KEY, name)?;
        Ok(())
    }

    fn get_selection(&self) -> Result<ProfileSelection, ProfileError> {
        let raw = self.get_selected_profile_name()?;
        Ok(ProfileSelection::from_stored(&raw))
    }
}
