//! Profile <-> stored bytes
//!
//! Records are JSON objects keyed by field name, so fields added later can be
//! given defaults without invalidating records written by older builds.
//! Unknown fields are ignored on decode.
//!
//! The final encoded buffer is zeroed on drop. Scratch buffers serde_json
//! grows and discards while serializing are not.

use zeroize::{Zeroize, ZeroizeOnDrop};

use super::types::Profile;
use crate::error::{Result, SupplyError};

/// Serialized profile bytes - automatically zeroed when dropped
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncodedProfile {
    bytes: Vec<u8>,
}

impl EncodedProfile {
    /// Wrap bytes read back from a store
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for EncodedProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodedProfile")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Converts profiles to and from their stored form
pub struct ProfileCodec;

impl ProfileCodec {
    /// Serialize a profile. List order is kept as-is.
    pub fn encode(profile: &Profile) -> Result<EncodedProfile> {
        let bytes = serde_json::to_vec(profile)?;
        Ok(EncodedProfile::new(bytes))
    }

    /// Deserialize a profile, failing on malformed data, a missing `id`, or a
    /// record that breaks profile invariants
    pub fn decode(bytes: &[u8]) -> Result<Profile> {
        let profile: Profile =
            serde_json::from_slice(bytes).map_err(|e| SupplyError::DecodeError(e.to_string()))?;
        profile
            .validate()
            .map_err(|e| SupplyError::DecodeError(e.to_string()))?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::types::{
        DietaryPreference, FitnessGoal, Gender, Supplement, SupplementCategory,
    };

    fn full_profile() -> Profile {
        let mut profile = Profile::new();
        profile.name = "Jordan".to_string();
        profile.age = 41;
        profile.height = Some(1.7823456789);
        profile.weight = Some(0.1 + 0.2);
        profile.gender = Some(Gender::NonBinary);
        profile.fitness_goals = vec![
            FitnessGoal::MoreFocus,
            FitnessGoal::BuildMuscle,
            FitnessGoal::MoreFocus,
        ];
        profile.dietary_preferences = vec![DietaryPreference::Vegan, DietaryPreference::Paleo];

        let mut creatine = Supplement::new("Creatine", SupplementCategory::PreWorkout)
            .with_description("Supports strength output")
            .with_schedule("5g", "Daily")
            .with_benefits(["Strength", "Power", ""]);
        creatine.is_taken = true;
        profile.add_supplement(creatine).unwrap();
        profile
            .add_supplement(
                Supplement::new("Zinc \"chelated\" \u{1F48A}", SupplementCategory::Minerals)
                    .with_schedule("15mg", "Twice weekly"),
            )
            .unwrap();
        profile
    }

    #[test]
    fn test_round_trip_full_profile() {
        let profile = full_profile();
        let encoded = ProfileCodec::encode(&profile).unwrap();
        let decoded = ProfileCodec::decode(encoded.as_bytes()).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn test_round_trip_default_profile() {
        let profile = Profile::new();
        let encoded = ProfileCodec::encode(&profile).unwrap();
        assert_eq!(ProfileCodec::decode(encoded.as_bytes()).unwrap(), profile);
    }

    #[test]
    fn test_encode_is_deterministic() {
        let profile = full_profile();
        let first = ProfileCodec::encode(&profile).unwrap();
        let second = ProfileCodec::encode(&profile.clone()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_encoding_is_field_tagged() {
        let profile = full_profile();
        let encoded = ProfileCodec::encode(&profile).unwrap();
        let value: serde_json::Value = serde_json::from_slice(encoded.as_bytes()).unwrap();

        assert_eq!(value["id"], profile.id().to_string());
        assert_eq!(value["name"], "Jordan");
        assert_eq!(value["gender"], "non_binary");
        assert_eq!(value["fitness_goals"][0], "more_focus");
        assert_eq!(value["supplements"][0]["category"], "pre_workout");
    }

    #[test]
    fn test_decode_missing_optional_fields() {
        let id = uuid::Uuid::new_v4();
        let json = format!(r#"{{"id":"{}","name":"Sam"}}"#, id);

        let profile = ProfileCodec::decode(json.as_bytes()).unwrap();
        assert_eq!(profile.id(), id);
        assert_eq!(profile.name, "Sam");
        assert_eq!(profile.age, 0);
        assert_eq!(profile.height, None);
        assert!(profile.fitness_goals.is_empty());
        assert!(profile.supplements.is_empty());
    }

    #[test]
    fn test_decode_ignores_unknown_fields() {
        let id = uuid::Uuid::new_v4();
        let json = format!(r#"{{"id":"{}","age":22,"streak_days":14}}"#, id);

        let profile = ProfileCodec::decode(json.as_bytes()).unwrap();
        assert_eq!(profile.age, 22);
    }

    #[test]
    fn test_decode_missing_id() {
        let result = ProfileCodec::decode(br#"{"name":"No Id","age":30}"#);
        assert!(matches!(result, Err(SupplyError::DecodeError(_))));
    }

    #[test]
    fn test_decode_malformed() {
        let cases: [&[u8]; 5] = [b"", b"not json", b"{\"id\":", b"[1,2,3]", &[0xff, 0xfe, 0x00]];
        for bytes in cases {
            let result = ProfileCodec::decode(bytes);
            assert!(
                matches!(result, Err(SupplyError::DecodeError(_))),
                "expected decode error for {:?}",
                bytes
            );
        }
    }

    #[test]
    fn test_decode_rejects_invalid_record() {
        let id = uuid::Uuid::new_v4();
        let negative_height = format!(r#"{{"id":"{}","height":-1.0}}"#, id);
        assert!(matches!(
            ProfileCodec::decode(negative_height.as_bytes()),
            Err(SupplyError::DecodeError(_))
        ));

        let supplement = uuid::Uuid::new_v4();
        let duplicate_ids = format!(
            r#"{{"id":"{}","supplements":[{{"id":"{}","name":"A"}},{{"id":"{}","name":"B"}}]}}"#,
            id, supplement, supplement
        );
        assert!(matches!(
            ProfileCodec::decode(duplicate_ids.as_bytes()),
            Err(SupplyError::DecodeError(ref m)) if m.contains(&supplement.to_string())
        ));
    }

    #[test]
    fn test_debug_redacts_bytes() {
        let encoded = ProfileCodec::encode(&full_profile()).unwrap();
        let debug = format!("{:?}", encoded);
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("Jordan"));
    }
}
