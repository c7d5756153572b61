//! Subcommands and their plain-text output

use clap::Subcommand;
use std::fmt::Write;
use uuid::Uuid;

use supply_core::{
    DietaryPreference, FitnessGoal, Gender, Onboarding, Profile, ProfileManager, Result,
    SettingsManager, StoreBackend, Supplement, SupplementCategory, SupplyError,
};

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the stored profile
    Show,

    /// Record onboarding answers
    Onboard {
        #[arg(long)]
        name: String,

        #[arg(long)]
        age: u32,

        /// Height in meters
        #[arg(long)]
        height: Option<f64>,

        /// Weight in kilograms
        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        gender: Option<Gender>,

        /// Fitness goal (repeatable)
        #[arg(long = "goal")]
        goals: Vec<FitnessGoal>,

        /// Dietary preference (repeatable)
        #[arg(long = "diet")]
        preferences: Vec<DietaryPreference>,
    },

    /// Change individual profile fields
    Edit {
        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        age: Option<u32>,

        #[arg(long)]
        height: Option<f64>,

        #[arg(long)]
        weight: Option<f64>,

        #[arg(long)]
        gender: Option<Gender>,
    },

    /// Replace the list of fitness goals
    Goals {
        #[arg(long = "goal")]
        goals: Vec<FitnessGoal>,
    },

    /// Replace the list of dietary preferences
    Diet {
        #[arg(long = "diet")]
        preferences: Vec<DietaryPreference>,
    },

    /// Start tracking a supplement
    AddSupplement {
        name: String,

        #[arg(long, default_value = "other")]
        category: SupplementCategory,

        #[arg(long, default_value = "")]
        dosage: String,

        #[arg(long, default_value = "")]
        frequency: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Benefit statement (repeatable)
        #[arg(long = "benefit")]
        benefits: Vec<String>,
    },

    /// Stop tracking a supplement
    RemoveSupplement { id: Uuid },

    /// Mark a supplement as taken / not taken today
    Toggle { id: Uuid },

    /// Clear today's intake log
    NewDay,

    /// Delete the stored profile
    Forget,

    /// Show or change where the profile is stored
    Config {
        /// Keychain service name
        #[arg(long = "set-service")]
        service: Option<String>,

        /// Key of the profile record
        #[arg(long = "set-profile-key")]
        profile_key: Option<String>,

        /// Storage backend (keychain or memory)
        #[arg(long = "set-backend")]
        backend: Option<StoreBackend>,
    },
}

/// Print settings, saving them first when any value was given
pub fn configure(
    manager: &mut SettingsManager,
    service: Option<String>,
    profile_key: Option<String>,
    backend: Option<StoreBackend>,
) -> Result<String> {
    let changed = service.is_some() || profile_key.is_some() || backend.is_some();

    if changed {
        let mut settings = manager.get().clone();
        if service.is_some() {
            settings.service_name = service;
        }
        if profile_key.is_some() {
            settings.profile_key = profile_key;
        }
        if let Some(backend) = backend {
            settings.backend = backend;
        }
        manager.update(settings)?;
    }

    let settings = manager.get();
    let mut out = String::new();
    if changed {
        let _ = writeln!(out, "Saved {}", manager.settings_file().display());
    }
    let _ = writeln!(out, "  Service:     {}", settings.effective_service_name());
    let _ = writeln!(out, "  Profile key: {}", settings.effective_profile_key());
    let _ = writeln!(out, "  Backend:     {}", settings.backend);
    Ok(out)
}

/// Run a command against the manager and return what to print
pub fn execute(manager: &mut ProfileManager, command: Command) -> Result<String> {
    match command {
        Command::Show => Ok(render_profile(manager.profile())),

        Command::Onboard {
            name,
            age,
            height,
            weight,
            gender,
            goals,
            preferences,
        } => {
            manager.complete_onboarding(Onboarding {
                name,
                age,
                height,
                weight,
                gender,
                goals,
                preferences,
            })?;
            Ok(render_profile(manager.profile()))
        }

        Command::Edit {
            name,
            age,
            height,
            weight,
            gender,
        } => {
            manager.update(|profile| {
                if let Some(name) = name {
                    profile.name = name;
                }
                if let Some(age) = age {
                    profile.age = age;
                }
                if height.is_some() {
                    profile.height = height;
                }
                if weight.is_some() {
                    profile.weight = weight;
                }
                if gender.is_some() {
                    profile.gender = gender;
                }
            })?;
            Ok(render_profile(manager.profile()))
        }

        Command::Goals { goals } => {
            manager.update(|profile| profile.fitness_goals = goals)?;
            Ok(render_profile(manager.profile()))
        }

        Command::Diet { preferences } => {
            manager.update(|profile| profile.dietary_preferences = preferences)?;
            Ok(render_profile(manager.profile()))
        }

        Command::AddSupplement {
            name,
            category,
            dosage,
            frequency,
            description,
            benefits,
        } => {
            let supplement = Supplement::new(&name, category)
                .with_description(&description)
                .with_schedule(&dosage, &frequency)
                .with_benefits(benefits);
            let id = manager.add_supplement(supplement)?;
            Ok(format!("Added {} ({})", name, id))
        }

        Command::RemoveSupplement { id } => {
            let removed = manager.remove_supplement(id)?;
            Ok(format!("Removed {}", removed.name))
        }

        Command::Toggle { id } => {
            let taken = manager.toggle_supplement_taken(id)?;
            let name = manager
                .profile()
                .supplement(id)
                .map(|s| s.name.as_str())
                .unwrap_or_default();
            let state = if taken { "taken" } else { "not taken" };
            Ok(format!("{} marked {}", name, state))
        }

        Command::NewDay => {
            manager.reset_daily_intake()?;
            Ok("Daily intake cleared".to_string())
        }

        Command::Forget => {
            manager.delete_persisted()?;
            Ok("Stored profile deleted".to_string())
        }

        // Handled by `configure` before any store is opened
        Command::Config { .. } => Err(SupplyError::ConfigError(
            "config does not operate on a loaded profile".to_string(),
        )),
    }
}

/// Format a profile for the terminal
pub fn render_profile(profile: &Profile) -> String {
    let mut out = String::new();
    let name = if profile.name.is_empty() {
        "(not set)"
    } else {
        profile.name.as_str()
    };

    let _ = writeln!(out, "Profile {}", profile.id());
    let _ = writeln!(out, "  Name:    {}", name);
    let _ = writeln!(out, "  Age:     {}", profile.age);
    let _ = writeln!(out, "  Height:  {}", optional(profile.height.map(|h| format!("{:.2} m", h))));
    let _ = writeln!(out, "  Weight:  {}", optional(profile.weight.map(|w| format!("{:.1} kg", w))));
    let _ = writeln!(out, "  Gender:  {}", optional(profile.gender.map(|g| g.to_string())));
    let _ = writeln!(out, "  Goals:   {}", joined(&profile.fitness_goals));
    let _ = writeln!(out, "  Diet:    {}", joined(&profile.dietary_preferences));

    if profile.supplements.is_empty() {
        let _ = writeln!(out, "  No supplements logged today");
        return out;
    }

    let _ = writeln!(
        out,
        "  Supplements ({} of {} taken today):",
        profile.taken_count(),
        profile.supplements.len()
    );
    for supplement in &profile.supplements {
        let mark = if supplement.is_taken { "x" } else { " " };
        let _ = writeln!(
            out,
            "    [{}] {} - {} {} ({}) {}",
            mark,
            supplement.name,
            supplement.dosage,
            supplement.frequency,
            supplement.category,
            supplement.id
        );
    }
    out
}

fn optional(value: Option<String>) -> String {
    value.unwrap_or_else(|| "-".to_string())
}

fn joined<T: ToString>(items: &[T]) -> String {
    if items.is_empty() {
        return "-".to_string();
    }
    items.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
