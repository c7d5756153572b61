//! # supply-core
//!
//! Secure local profile store for the Supply wellness tracker:
//! - Profile model (demographics, goals, dietary preferences, supplements)
//! - Field-tagged JSON codec with zeroize-on-drop buffers
//! - OS keychain storage with explicit create/update semantics
//! - Profile manager that loads on launch and persists after every change

pub mod error;
pub mod profile;
pub mod settings;
pub mod storage;

pub use error::{Result, SupplyError};
pub use profile::{
    DietaryPreference, EncodedProfile, FitnessGoal, Gender, LoadOutcome, Onboarding, Profile,
    ProfileCodec, ProfileManager, SaveOutcome, Supplement, SupplementCategory,
};
pub use settings::{Settings, SettingsManager, StoreBackend, DEFAULT_PROFILE_KEY};
pub use storage::{open_store, KeychainStorage, MemoryStore, SecureStore};
