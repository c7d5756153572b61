//! Profile type definitions

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{Result, SupplyError};

/// Declares a closed, snake_case-encoded enumeration with a display label
/// and a `FromStr` accepting the wire name.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => ($wire:literal, $label:literal) ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Name used in the stored record and on the command line
            pub fn wire_name(self) -> &'static str {
                match self {
                    $( $name::$variant => $wire ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let label = match self {
                    $( $name::$variant => $label ),+
                };
                f.write_str(label)
            }
        }

        impl FromStr for $name {
            type Err = SupplyError;

            fn from_str(s: &str) -> Result<Self> {
                let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
                match normalized.as_str() {
                    $( $wire => Ok($name::$variant), )+
                    _ => Err(SupplyError::InvalidProfile(format!(
                        "unknown {} '{}', expected one of: {}",
                        stringify!($name),
                        s,
                        [$( $wire ),+].join(", ")
                    ))),
                }
            }
        }
    };
}

labelled_enum! {
    /// Gender as reported during onboarding
    Gender {
        Male => ("male", "Male"),
        Female => ("female", "Female"),
        NonBinary => ("non_binary", "Non-binary"),
        PreferNotToSay => ("prefer_not_to_say", "Prefer not to say"),
    }
}

labelled_enum! {
    /// What the user wants supplements to help with
    FitnessGoal {
        BuildMuscle => ("build_muscle", "Build Muscle"),
        HappierLifestyle => ("happier_lifestyle", "Happier Lifestyle"),
        CognitiveClarity => ("cognitive_clarity", "Cognitive Clarity"),
        Performance => ("performance", "Performance"),
        BetterSleep => ("better_sleep", "Better Sleep"),
        MoreFocus => ("more_focus", "More Focus"),
    }
}

labelled_enum! {
    /// Dietary restriction or style
    DietaryPreference {
        Vegan => ("vegan", "Vegan"),
        Vegetarian => ("vegetarian", "Vegetarian"),
        Paleo => ("paleo", "Paleo"),
        Keto => ("keto", "Keto"),
        None => ("none", "None"),
    }
}

labelled_enum! {
    /// Supplement grouping shown on the log screen
    SupplementCategory {
        Vitamins => ("vitamins", "Vitamins"),
        Minerals => ("minerals", "Minerals"),
        Protein => ("protein", "Protein"),
        PreWorkout => ("pre_workout", "Pre-Workout"),
        PostWorkout => ("post_workout", "Post-Workout"),
        Other => ("other", "Other"),
    }
}

impl Default for SupplementCategory {
    fn default() -> Self {
        Self::Other
    }
}

/// A tracked supplement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Supplement {
    /// Unique identifier within the owning profile
    pub id: Uuid,

    /// Display name (e.g., "Creatine")
    #[serde(default)]
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Short benefit statements
    #[serde(default)]
    pub benefits: Vec<String>,

    /// Amount per serving (e.g., "5g")
    #[serde(default)]
    pub dosage: String,

    /// How often to take it (e.g., "Daily")
    #[serde(default)]
    pub frequency: String,

    #[serde(default)]
    pub category: SupplementCategory,

    /// Whether it has been taken today
    #[serde(default)]
    pub is_taken: bool,
}

impl Supplement {
    /// Create a new supplement with a fresh identifier
    pub fn new(name: &str, category: SupplementCategory) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: String::new(),
            benefits: Vec::new(),
            dosage: String::new(),
            frequency: String::new(),
            category,
            is_taken: false,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Set dosage and frequency
    pub fn with_schedule(mut self, dosage: &str, frequency: &str) -> Self {
        self.dosage = dosage.to_string();
        self.frequency = frequency.to_string();
        self
    }

    /// Append benefit statements
    pub fn with_benefits<I, S>(mut self, benefits: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.benefits.extend(benefits.into_iter().map(Into::into));
        self
    }
}

/// The user's profile: demographics, goals and supplement tracking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Assigned once at creation; required in every stored record
    id: Uuid,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub age: u32,

    /// Height in meters
    #[serde(default)]
    pub height: Option<f64>,

    /// Weight in kilograms
    #[serde(default)]
    pub weight: Option<f64>,

    #[serde(default)]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub fitness_goals: Vec<FitnessGoal>,

    #[serde(default)]
    pub dietary_preferences: Vec<DietaryPreference>,

    #[serde(default)]
    pub supplements: Vec<Supplement>,
}

impl Profile {
    /// Create an empty profile with a fresh identifier
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            name: String::new(),
            age: 0,
            height: None,
            weight: None,
            gender: None,
            fitness_goals: Vec::new(),
            dietary_preferences: Vec::new(),
            supplements: Vec::new(),
        }
    }

    /// The profile's immutable identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Check the invariants a stored profile must hold
    pub fn validate(&self) -> Result<()> {
        validate_measurement("height", self.height)?;
        validate_measurement("weight", self.weight)?;

        let mut seen = HashSet::with_capacity(self.supplements.len());
        for supplement in &self.supplements {
            if !seen.insert(supplement.id) {
                return Err(SupplyError::DuplicateSupplement(supplement.id));
            }
        }

        Ok(())
    }

    /// Look up a supplement by identifier
    pub fn supplement(&self, id: Uuid) -> Option<&Supplement> {
        self.supplements.iter().find(|s| s.id == id)
    }

    /// Append a supplement, rejecting an identifier that is already tracked
    pub fn add_supplement(&mut self, supplement: Supplement) -> Result<()> {
        if self.supplement(supplement.id).is_some() {
            return Err(SupplyError::DuplicateSupplement(supplement.id));
        }
        self.supplements.push(supplement);
        Ok(())
    }

    /// Remove a supplement by identifier, keeping the order of the rest
    pub fn remove_supplement(&mut self, id: Uuid) -> Result<Supplement> {
        let index = self
            .supplements
            .iter()
            .position(|s| s.id == id)
            .ok_or(SupplyError::SupplementNotFound(id))?;
        Ok(self.supplements.remove(index))
    }

    /// Flip the "taken today" flag of one supplement and return the new value
    pub fn toggle_supplement_taken(&mut self, id: Uuid) -> Result<bool> {
        let supplement = self
            .supplements
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(SupplyError::SupplementNotFound(id))?;
        supplement.is_taken = !supplement.is_taken;
        Ok(supplement.is_taken)
    }

    /// Number of supplements marked as taken today
    pub fn taken_count(&self) -> usize {
        self.supplements.iter().filter(|s| s.is_taken).count()
    }

    /// Clear every "taken" flag for a new day
    pub fn reset_daily_intake(&mut self) {
        for supplement in &mut self.supplements {
            supplement.is_taken = false;
        }
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_measurement(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !v.is_finite() || v <= 0.0 => Err(SupplyError::InvalidProfile(format!(
            "{} must be a positive number, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

/// Answers collected by the onboarding flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Onboarding {
    pub name: String,
    pub age: u32,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub gender: Option<Gender>,
    pub goals: Vec<FitnessGoal>,
    pub preferences: Vec<DietaryPreference>,
}

impl Onboarding {
    /// Copy the answers onto a profile, leaving its id and supplements alone
    pub fn apply_to(self, profile: &mut Profile) {
        profile.name = self.name;
        profile.age = self.age;
        profile.height = self.height;
        profile.weight = self.weight;
        profile.gender = self.gender;
        profile.fitness_goals = self.goals;
        profile.dietary_preferences = self.preferences;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with_supplements() -> (Profile, Vec<Uuid>) {
        let mut profile = Profile::new();
        let ids = ["Vitamin D", "Creatine", "Magnesium"]
            .iter()
            .map(|name| {
                let supplement = Supplement::new(name, SupplementCategory::Other);
                let id = supplement.id;
                profile.add_supplement(supplement).unwrap();
                id
            })
            .collect();
        (profile, ids)
    }

    #[test]
    fn test_new_profile_defaults() {
        let profile = Profile::new();
        assert!(profile.name.is_empty());
        assert_eq!(profile.age, 0);
        assert_eq!(profile.height, None);
        assert_eq!(profile.weight, None);
        assert_eq!(profile.gender, None);
        assert!(profile.fitness_goals.is_empty());
        assert!(profile.dietary_preferences.is_empty());
        assert!(profile.supplements.is_empty());
        assert_ne!(profile.id(), Profile::new().id());
    }

    #[test]
    fn test_toggle_affects_only_target() {
        let (mut profile, ids) = profile_with_supplements();
        let before = profile.supplements.clone();

        assert!(profile.toggle_supplement_taken(ids[1]).unwrap());

        assert_eq!(profile.supplements.len(), before.len());
        for (after, before) in profile.supplements.iter().zip(&before) {
            assert_eq!(after.id, before.id);
            if after.id == ids[1] {
                assert!(after.is_taken);
            } else {
                assert_eq!(after, before);
            }
        }
        assert_eq!(profile.taken_count(), 1);

        assert!(!profile.toggle_supplement_taken(ids[1]).unwrap());
        assert_eq!(profile.supplements, before);
    }

    #[test]
    fn test_toggle_unknown_supplement() {
        let (mut profile, _) = profile_with_supplements();
        let missing = Uuid::new_v4();
        let result = profile.toggle_supplement_taken(missing);
        assert!(matches!(result, Err(SupplyError::SupplementNotFound(id)) if id == missing));
    }

    #[test]
    fn test_remove_keeps_order() {
        let (mut profile, ids) = profile_with_supplements();

        let removed = profile.remove_supplement(ids[0]).unwrap();
        assert_eq!(removed.name, "Vitamin D");

        let remaining: Vec<Uuid> = profile.supplements.iter().map(|s| s.id).collect();
        assert_eq!(remaining, vec![ids[1], ids[2]]);
        assert!(profile.remove_supplement(ids[0]).is_err());
    }

    #[test]
    fn test_duplicate_supplement_rejected() {
        let (mut profile, ids) = profile_with_supplements();
        let copy = profile.supplement(ids[2]).cloned().unwrap();

        let result = profile.add_supplement(copy);
        assert!(matches!(result, Err(SupplyError::DuplicateSupplement(_))));
        assert_eq!(profile.supplements.len(), 3);
    }

    #[test]
    fn test_reset_daily_intake() {
        let (mut profile, ids) = profile_with_supplements();
        profile.toggle_supplement_taken(ids[0]).unwrap();
        profile.toggle_supplement_taken(ids[2]).unwrap();
        assert_eq!(profile.taken_count(), 2);

        profile.reset_daily_intake();
        assert_eq!(profile.taken_count(), 0);
    }

    #[test]
    fn test_validate_measurements() {
        let mut profile = Profile::new();
        profile.height = Some(1.8);
        profile.weight = Some(72.5);
        assert!(profile.validate().is_ok());

        profile.height = Some(0.0);
        assert!(matches!(profile.validate(), Err(SupplyError::InvalidProfile(_))));

        profile.height = None;
        profile.weight = Some(f64::NAN);
        assert!(matches!(profile.validate(), Err(SupplyError::InvalidProfile(_))));
    }

    #[test]
    fn test_validate_duplicate_ids() {
        let (mut profile, ids) = profile_with_supplements();
        let copy = profile.supplement(ids[0]).cloned().unwrap();
        profile.supplements.push(copy);
        assert!(matches!(profile.validate(), Err(SupplyError::DuplicateSupplement(_))));
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("build_muscle".parse::<FitnessGoal>().unwrap(), FitnessGoal::BuildMuscle);
        assert_eq!("Better Sleep".parse::<FitnessGoal>().unwrap(), FitnessGoal::BetterSleep);
        assert_eq!("pre-workout".parse::<SupplementCategory>().unwrap(), SupplementCategory::PreWorkout);
        assert_eq!("non_binary".parse::<Gender>().unwrap(), Gender::NonBinary);
        assert!("carnivore".parse::<DietaryPreference>().is_err());

        assert_eq!(SupplementCategory::PostWorkout.to_string(), "Post-Workout");
        assert_eq!(DietaryPreference::ALL.len(), 5);
        assert_eq!(FitnessGoal::MoreFocus.wire_name(), "more_focus");
    }

    #[test]
    fn test_onboarding_keeps_identity_and_supplements() {
        let (mut profile, _) = profile_with_supplements();
        let id = profile.id();

        Onboarding {
            name: "Alex".to_string(),
            age: 30,
            height: Some(1.75),
            weight: None,
            gender: Some(Gender::PreferNotToSay),
            goals: vec![FitnessGoal::Performance],
            preferences: vec![DietaryPreference::Keto],
        }
        .apply_to(&mut profile);

        assert_eq!(profile.id(), id);
        assert_eq!(profile.name, "Alex");
        assert_eq!(profile.supplements.len(), 3);
        assert_eq!(profile.fitness_goals, vec![FitnessGoal::Performance]);
    }
}
