//! Profile manager: owns the in-memory profile and keeps the store in step
//!
//! Loading never fails hard: a missing record is the normal first launch and
//! anything else (unreachable store, corrupt bytes) is reported through
//! [`ProfileManager::error_message`] while the in-memory profile stays usable.
//!
//! Saving goes through `create` first and falls back to `update` when the
//! record already exists, re-encoding the profile for the second attempt.
//! The manager takes `&mut self` for every mutation, so one edit and its save
//! finish before the next edit can start.

use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::codec::{EncodedProfile, ProfileCodec};
use super::types::{Onboarding, Profile, Supplement};
use crate::error::{Result, SupplyError};
use crate::settings::Settings;
use crate::storage::{open_store, SecureStore};

/// Which store primitive a successful save used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// No record existed; `create` inserted one
    Created,
    /// The record existed; `update` overwrote it
    Updated,
}

/// Result of reading the persisted profile
#[derive(Debug)]
pub enum LoadOutcome {
    /// A stored profile replaced the in-memory one
    Restored,
    /// Nothing stored yet; the default profile is kept
    FirstLaunch,
    /// The store or the stored bytes could not be used; the in-memory profile is kept
    Failed(SupplyError),
}

/// Owns the user's profile and persists it after every change
pub struct ProfileManager {
    /// Storage backend
    store: Arc<dyn SecureStore>,
    /// Key of the single profile record
    key: String,
    /// Current in-memory profile
    profile: Profile,
    /// Last user-visible persistence failure
    error_message: Option<String>,
}

impl ProfileManager {
    /// Create a manager with a fresh default profile
    pub fn new(store: Arc<dyn SecureStore>, key: &str) -> Self {
        Self {
            store,
            key: key.to_string(),
            profile: Profile::new(),
            error_message: None,
        }
    }

    /// Create a manager using the backend and key named in the settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(open_store(settings), settings.effective_profile_key())
    }

    /// Current in-memory profile
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Key of the profile record
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Storage backend in use
    pub fn store(&self) -> &dyn SecureStore {
        self.store.as_ref()
    }

    /// Last persistence failure, formatted for display
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Dismiss the current error message
    pub fn clear_error(&mut self) {
        self.error_message = None;
    }

    /// Load the persisted profile once at process start
    pub fn load_profile_on_launch(&mut self) -> &Profile {
        self.load();
        &self.profile
    }

    /// Replace the in-memory profile with the stored one, if there is one
    pub fn load(&mut self) -> LoadOutcome {
        let bytes = match self.store.fetch(&self.key) {
            Ok(bytes) => EncodedProfile::new(bytes),
            Err(e) if e.is_not_found() => {
                debug!("No stored profile under {}, keeping defaults", self.key);
                self.error_message = None;
                return LoadOutcome::FirstLaunch;
            }
            Err(e) => return self.load_failed(e),
        };

        match ProfileCodec::decode(bytes.as_bytes()) {
            Ok(profile) => {
                info!("Restored profile {}", profile.id());
                self.profile = profile;
                self.error_message = None;
                LoadOutcome::Restored
            }
            Err(e) => self.load_failed(e),
        }
    }

    fn load_failed(&mut self, error: SupplyError) -> LoadOutcome {
        warn!("Failed to load profile from {}: {}", self.store.backend_name(), error);
        self.error_message = Some(format!("Failed to load profile data: {}", error));
        LoadOutcome::Failed(error)
    }

    /// Persist the in-memory profile
    pub fn save(&mut self) -> Result<SaveOutcome> {
        match self.write_profile() {
            Ok(outcome) => {
                debug!("Saved profile {} ({:?})", self.profile.id(), outcome);
                self.error_message = None;
                Ok(outcome)
            }
            Err(e) => {
                warn!("Failed to save profile to {}: {}", self.store.backend_name(), e);
                self.error_message = Some(format!("Failed to save profile data: {}", e));
                Err(e)
            }
        }
    }

    fn write_profile(&self) -> Result<SaveOutcome> {
        let encoded = ProfileCodec::encode(&self.profile)?;

        match self.store.create(&self.key, encoded.as_bytes()) {
            Ok(()) => Ok(SaveOutcome::Created),
            Err(e) if e.is_duplicate_entry() => {
                debug!("Profile record exists under {}, updating", self.key);
                let fresh = ProfileCodec::encode(&self.profile)?;
                self.store.update(&self.key, fresh.as_bytes())?;
                Ok(SaveOutcome::Updated)
            }
            Err(e) => Err(e),
        }
    }

    /// Replace the in-memory profile and persist it
    ///
    /// The replacement must carry the same identifier as the current profile.
    pub fn persist(&mut self, profile: Profile) -> Result<()> {
        if profile.id() != self.profile.id() {
            return Err(SupplyError::InvalidProfile(format!(
                "profile id {} does not match {}",
                profile.id(),
                self.profile.id()
            )));
        }
        profile.validate()?;

        self.profile = profile;
        self.save()?;
        Ok(())
    }

    /// Apply an edit and persist it
    ///
    /// The edit runs on a copy; if the result breaks an invariant nothing is
    /// committed. Once committed, the change stays in memory even if saving fails.
    pub fn update<F>(&mut self, edit: F) -> Result<SaveOutcome>
    where
        F: FnOnce(&mut Profile),
    {
        let mut draft = self.profile.clone();
        edit(&mut draft);
        draft.validate()?;

        self.profile = draft;
        self.save()
    }

    /// Store the onboarding answers
    pub fn complete_onboarding(&mut self, answers: Onboarding) -> Result<()> {
        self.update(|profile| answers.apply_to(profile))?;
        info!("Onboarding completed for profile {}", self.profile.id());
        Ok(())
    }

    /// Start tracking a supplement
    pub fn add_supplement(&mut self, supplement: Supplement) -> Result<Uuid> {
        let id = supplement.id;
        self.profile.add_supplement(supplement)?;
        self.save()?;
        Ok(id)
    }

    /// Stop tracking a supplement
    pub fn remove_supplement(&mut self, id: Uuid) -> Result<Supplement> {
        let removed = self.profile.remove_supplement(id)?;
        self.save()?;
        Ok(removed)
    }

    /// Flip a supplement's "taken today" flag and return the new value
    pub fn toggle_supplement_taken(&mut self, id: Uuid) -> Result<bool> {
        let taken = self.profile.toggle_supplement_taken(id)?;
        self.save()?;
        Ok(taken)
    }

    /// Clear every "taken" flag
    pub fn reset_daily_intake(&mut self) -> Result<()> {
        self.profile.reset_daily_intake();
        self.save()?;
        Ok(())
    }

    /// Delete the stored record and start over with a fresh profile
    pub fn delete_persisted(&mut self) -> Result<()> {
        self.store.delete(&self.key)?;
        self.profile = Profile::new();
        self.error_message = None;
        info!("Deleted stored profile under {}", self.key);
        Ok(())
    }
}
