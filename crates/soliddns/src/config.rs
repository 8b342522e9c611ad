//! CLI flag overlay on top of `soliddns-config` profiles, producing the
//! `ApplianceConfig` core consumes.
//!
//! Precedence is flag > environment > profile > defaults. Core never sees
//! profiles.

use std::time::Duration;

use secrecy::SecretString;

use soliddns_config::{Config, Profile};
use soliddns_core::{ApplianceConfig, ReconcileOptions, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

/// Comma-separated profile names, sorted, for help text.
pub fn available_profiles(config: &Config) -> String {
    let mut names: Vec<&str> = config.profiles.keys().map(String::as_str).collect();
    if names.is_empty() {
        return "(none)".into();
    }
    names.sort_unstable();
    names.join(", ")
}

/// Build an `ApplianceConfig` from the config file, profile, and CLI
/// overrides. Returns the profile name alongside for error messages.
pub fn build_appliance_config(
    global: &GlobalOpts,
) -> Result<(String, ApplianceConfig), CliError> {
    let cfg = soliddns_config::load_config()?;
    let profile_name = active_profile_name(global, &cfg);

    if let Some(profile) = cfg.profiles.get(&profile_name) {
        let config = resolve_profile(profile, &profile_name, &cfg, global)?;
        return Ok((profile_name, config));
    }

    // An explicitly requested profile must exist.
    if global.profile.is_some() {
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: available_profiles(&cfg),
        });
    }

    let config = resolve_flags_only(&profile_name, &cfg, global)?;
    Ok((profile_name, config))
}

/// Translate a profile + global flags into an `ApplianceConfig`.
fn resolve_profile(
    profile: &Profile,
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ApplianceConfig, CliError> {
    let url_str = global.appliance.as_deref().unwrap_or(&profile.appliance);
    let url = soliddns_config::parse_appliance_url(url_str)?;

    let username = global
        .username
        .clone()
        .or_else(|| profile.username.clone())
        .ok_or_else(|| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;
    let password = soliddns_config::resolve_password(profile, profile_name)?;

    let mut config = ApplianceConfig::new(url, username, password);
    config.tls = if global.insecure {
        TlsVerification::DangerAcceptInvalid
    } else {
        soliddns_config::profile_tls(profile, &cfg.defaults)
    };
    config.timeout = Duration::from_secs(
        global
            .timeout
            .or(profile.timeout)
            .unwrap_or(cfg.defaults.timeout),
    );
    config.options = ReconcileOptions {
        retryable_statuses: profile.retry_on.clone(),
    };
    Ok(config)
}

/// No profile on disk: everything comes from flags and environment.
fn resolve_flags_only(
    profile_name: &str,
    cfg: &Config,
    global: &GlobalOpts,
) -> Result<ApplianceConfig, CliError> {
    let url_str = global.appliance.as_deref().ok_or_else(|| CliError::NoConfig {
        path: soliddns_config::config_path().display().to_string(),
    })?;
    let url = soliddns_config::parse_appliance_url(url_str)?;

    let username = global.username.clone().ok_or_else(|| CliError::NoCredentials {
        profile: profile_name.into(),
    })?;
    let password = std::env::var(soliddns_config::PASSWORD_ENV)
        .map(SecretString::from)
        .map_err(|_| CliError::NoCredentials {
            profile: profile_name.into(),
        })?;

    let mut config = ApplianceConfig::new(url, username, password);
    if global.insecure || cfg.defaults.insecure {
        config.tls = TlsVerification::DangerAcceptInvalid;
    }
    config.timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
    Ok(config)
}
