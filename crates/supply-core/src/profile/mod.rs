//! User profile: model, stored form and persistence orchestration

mod codec;
mod manager;
mod types;

pub use codec::{EncodedProfile, ProfileCodec};
pub use manager::{LoadOutcome, ProfileManager, SaveOutcome};
pub use types::*;
