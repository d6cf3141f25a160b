//! CLI configuration: thin wrapper around `featly_config`.
//!
//! Adds the resolution step that applies `GlobalOpts` flag overrides
//! (--base-url, --api-key, --insecure, --timeout) on top of a profile.

use clap::ValueEnum;
use featly_core::ClientConfig;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

// ── Re-exports from shared crate ────────────────────────────────────

pub use featly_config::{Config, Defaults, Profile, config_path, load_config, save_config};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// `defaults.output` from the config file, if it names a known format.
pub fn default_output(cfg: &Config) -> Option<OutputFormat> {
    if let Ok(format) = OutputFormat::from_str(&cfg.defaults.output, true) {
        Some(format)
    } else {
        tracing::warn!(value = %cfg.defaults.output, "ignoring unknown defaults.output");
        None
    }
}

/// Build the `ClientConfig` for this invocation.
///
/// The active profile supplies the base; flags override it. With no
/// matching profile, `--base-url` alone is enough. Naming a profile
/// that does not exist is an error.
pub fn build_client_config(global: &GlobalOpts, cfg: &Config) -> Result<ClientConfig, CliError> {
    let profile_name = active_profile_name(global, cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        tracing::debug!(profile = %profile_name, "using profile");
        return resolve_profile(profile.clone(), &profile_name, &cfg.defaults, global);
    }

    if global.profile.is_some() {
        return Err(profile_not_found(profile_name, cfg));
    }

    let Some(base_url) = global.base_url.clone() else {
        return Err(CliError::NoConfig {
            path: config_path().display().to_string(),
        });
    };

    let profile = Profile {
        base_url,
        ..Profile::default()
    };
    resolve_profile(profile, &profile_name, &cfg.defaults, global)
}

pub fn profile_not_found(name: String, cfg: &Config) -> CliError {
    let available = if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    };
    CliError::ProfileNotFound { name, available }
}

/// Overlay flags onto `profile`, then translate.
fn resolve_profile(
    mut profile: Profile,
    profile_name: &str,
    defaults: &Defaults,
    global: &GlobalOpts,
) -> Result<ClientConfig, CliError> {
    if let Some(ref url) = global.base_url {
        profile.base_url.clone_from(url);
    }
    if let Some(ref key) = global.api_key {
        profile.api_key = Some(key.clone());
        profile.api_key_env = None;
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    Ok(featly_config::profile_to_client_config(
        &profile,
        profile_name,
        defaults,
    )?)
}
