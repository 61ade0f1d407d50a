use std::path::Path;

use crate::cmd::Runner;
use crate::config::SearxngConfig;
use crate::platform::{self, Substitution};

/// Result of the settings first-run step. Nothing in here is
/// fatal: failures are reported and the sequence continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsOutcome {
    /// No base template to seed from; step skipped.
    MissingBase,
    /// Seeding `settings.yml` from the template failed.
    SeedFailed,
    /// The placeholder was substituted with a fresh key.
    KeyGenerated,
    /// Substitution failed; manual instructions were printed.
    KeyFailed,
}

/// Make sure the settings file exists, then swap its placeholder
/// secret for a random key.
pub fn prepare_settings(
    runner: &dyn Runner,
    substitution: &dyn Substitution,
    root: &Path,
    config: &SearxngConfig,
) -> SettingsOutcome {
    eprintln!("Checking SearXNG settings...");

    let settings = root.join(&config.settings);
    let base = root.join(&config.settings_base);

    if !base.exists() {
        eprintln!(
            "Warning: SearXNG base settings file not found at {}",
            config.settings_base
        );
        return SettingsOutcome::MissingBase;
    }

    if settings.exists() {
        eprintln!("SearXNG settings already exist at {}", config.settings);
    } else {
        eprintln!(
            "SearXNG settings not found. Creating from {}...",
            config.settings_base
        );
        if let Err(e) = std::fs::copy(&base, &settings) {
            tracing::warn!(error = %e, "seeding settings failed");
            eprintln!("Error creating {}: {e}", config.settings);
            return SettingsOutcome::SeedFailed;
        }
        eprintln!("Created {} from {}", config.settings, config.settings_base);
    }

    eprintln!(
        "Generating SearXNG secret key with {}...",
        substitution.name()
    );

    match substitution.replace_with_random_key(
        runner,
        root,
        &config.settings,
        &config.placeholder,
    ) {
        Ok(()) => {
            eprintln!("SearXNG secret key generated successfully.");
            SettingsOutcome::KeyGenerated
        }
        Err(e) => {
            eprintln!("Error generating SearXNG secret key: {e}");
            eprintln!("You may need to manually generate the secret key using the commands:");
            for line in platform::manual_instructions(&config.settings, &config.placeholder) {
                eprintln!("{line}");
            }
            SettingsOutcome::KeyFailed
        }
    }
}
