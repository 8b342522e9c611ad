//! Config subcommand handlers.

use tabled::Tabled;

use soliddns_config::{Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn redact(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    cfg
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Appliance")]
    appliance: String,
    #[tabled(rename = "Username")]
    username: String,
}

#[derive(serde::Serialize)]
struct ProfileEntry {
    name: String,
    appliance: String,
    username: Option<String>,
    default: bool,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            println!("{}", soliddns_config::config_path().display());
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redact(soliddns_config::load_config_or_default());
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)
                    .map_err(|e| CliError::Config(Box::new(e.into())))?,
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = soliddns_config::load_config_or_default();
            let default = cfg.default_profile.as_deref().unwrap_or("default");

            let mut entries: Vec<ProfileEntry> = cfg
                .profiles
                .iter()
                .map(|(name, p)| ProfileEntry {
                    name: name.clone(),
                    appliance: p.appliance.clone(),
                    username: p.username.clone(),
                    default: name == default,
                })
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));

            if entries.is_empty() {
                output::warning(
                    "no profiles configured. Run: soliddns config set-profile",
                    &global.color,
                );
                return Ok(());
            }

            let out = output::render_list(
                &global.output,
                &entries,
                |e| ProfileRow {
                    marker: if e.default { "*" } else { "" },
                    name: e.name.clone(),
                    appliance: e.appliance.clone(),
                    username: e.username.clone().unwrap_or_default(),
                },
                |e| e.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetProfile {
            name,
            ca_cert,
            default,
        } => {
            let appliance = global.appliance.clone().ok_or_else(|| CliError::Validation {
                field: "appliance".into(),
                reason: "pass the appliance URL with --appliance".into(),
            })?;
            soliddns_config::parse_appliance_url(&appliance)?;

            let mut cfg = soliddns_config::load_config()?;
            let first = cfg.profiles.is_empty();
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    appliance,
                    username: global.username.clone(),
                    ca_cert,
                    ..Profile::default()
                },
            );
            if default || first {
                cfg.default_profile = Some(name.clone());
            }

            soliddns_config::save_config(&cfg)?;
            output::status(
                &format!(
                    "Profile '{name}' written to {}",
                    soliddns_config::config_path().display()
                ),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = soliddns_config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            if !cfg.profiles.contains_key(&profile_name) {
                return Err(CliError::ProfileNotFound {
                    name: profile_name,
                    available: config::available_profiles(&cfg),
                });
            }

            let secret = dialoguer::Password::new()
                .with_prompt(format!("Password for profile '{profile_name}'"))
                .interact()
                .map_err(prompt_err)?;

            if secret.is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "value cannot be empty".into(),
                });
            }

            soliddns_config::store_password(&profile_name, &secret)?;
            output::status(
                &format!("Password stored in system keyring for profile '{profile_name}'"),
                &global.color,
                global.quiet,
            );
            Ok(())
        }
    }
}
