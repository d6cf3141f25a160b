//! Config subcommand handlers.

use featly_config::ConfigError;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

/// Render config as TOML with any plaintext API key masked.
fn format_config_redacted(cfg: &Config) -> Result<String, CliError> {
    let mut shown = cfg.clone();
    for profile in shown.profiles.values_mut() {
        if profile.api_key.is_some() {
            profile.api_key = Some("****".into());
        }
    }
    toml::to_string_pretty(&shown).map_err(|e| CliError::from(ConfigError::from(e)))
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            output::print_output(format_config_redacted(&cfg)?.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetProfile {
            name,
            url,
            api_key_env,
            per_page,
            default,
        } => {
            if url::Url::parse(&url).is_err() {
                return Err(CliError::Validation {
                    field: "url".into(),
                    reason: format!("invalid URL: {url}"),
                });
            }
            let mut cfg = config::load_config()?;
            let previous = cfg.profiles.remove(&name).unwrap_or_default();
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    base_url: url,
                    api_key_env: api_key_env.or(previous.api_key_env),
                    per_page: per_page.or(previous.per_page),
                    ..previous
                },
            );
            if default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }
            config::save_config(&cfg)?;
            output::print_output(&format!("Saved profile '{name}'"), global.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(config::profile_not_found(name, &cfg));
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::print_output(&format!("Default profile is now '{name}'"), global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn redacts_plaintext_key() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "prod".into(),
            Profile {
                base_url: "https://prod.example.com".into(),
                api_key: Some("super-secret".into()),
                ..Profile::default()
            },
        );
        let shown = format_config_redacted(&cfg).unwrap();
        assert!(shown.contains("[profiles.prod]"));
        assert!(shown.contains("api_key = \"****\""));
        assert!(!shown.contains("super-secret"));
    }
}
