//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use soliddns_config::ConfigError;
use soliddns_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the appliance while handling {entity}")]
    #[diagnostic(
        code(soliddns::connection_failed),
        help(
            "Check that the appliance is running and accessible.\n\
             Try: soliddns read dns-rr --id <ID> --insecure -v"
        )
    )]
    ConnectionFailed {
        entity: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("TLS setup failed: {message}")]
    #[diagnostic(
        code(soliddns::tls_error),
        help(
            "The appliance may use a self-signed certificate.\n\
             Use --insecure (-k) to accept it, or configure ca_cert in your profile."
        )
    )]
    TlsError { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed")]
    #[diagnostic(
        code(soliddns::auth_failed),
        help(
            "Verify the username and password for profile '{profile}'.\n\
             Run: soliddns --profile {profile} config set-password"
        )
    )]
    AuthFailed { profile: String },

    #[error("No credentials configured for profile '{profile}'")]
    #[diagnostic(
        code(soliddns::no_credentials),
        help(
            "Store a password with: soliddns config set-password\n\
             Or set the SOLIDDNS_USERNAME and SOLIDDNS_PASSWORD environment variables."
        )
    )]
    NoCredentials { profile: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(code(soliddns::not_found))]
    NotFound {
        resource_type: String,
        identifier: String,
    },

    #[error("{resource_type} '{identifier}' matches {matches} objects")]
    #[diagnostic(
        code(soliddns::ambiguous),
        help("Use a more specific value so exactly one object matches.")
    )]
    Ambiguous {
        resource_type: String,
        identifier: String,
        matches: usize,
    },

    #[error("Unknown resource type '{name}'")]
    #[diagnostic(
        code(soliddns::unknown_resource),
        help("Run: soliddns resources to see supported types ({available})")
    )]
    UnknownResource { name: String, available: String },

    #[error("{entity}: changing {fields} requires replacing the object")]
    #[diagnostic(
        code(soliddns::requires_replacement),
        help("Delete the object and create it again with the new values.")
    )]
    RequiresReplacement { entity: String, fields: String },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{entity}: rejected by appliance (HTTP {status}): {message}")]
    #[diagnostic(code(soliddns::rejected))]
    Rejected {
        entity: String,
        status: u16,
        message: String,
    },

    #[error("{entity}: appliance refused the delete: {message}")]
    #[diagnostic(
        code(soliddns::delete_refused),
        help("The object may still exist. Check it with: soliddns read")
    )]
    DeleteRefused { entity: String, message: String },

    #[error("{entity}: unexpected response from appliance: {message}")]
    #[diagnostic(code(soliddns::decode))]
    Decode { entity: String, message: String },

    #[error("{entity}: appliance unavailable (HTTP {status})")]
    #[diagnostic(code(soliddns::unavailable), help("Try again later."))]
    Unavailable { entity: String, status: u16 },

    // ── Unsupported ──────────────────────────────────────────────────
    #[error("{entity}: {operation} is not supported")]
    #[diagnostic(
        code(soliddns::unsupported),
        help("Delete the object and create it again instead.")
    )]
    Unsupported { entity: String, operation: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(soliddns::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(soliddns::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: soliddns config set-profile"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No appliance configured")]
    #[diagnostic(
        code(soliddns::no_config),
        help(
            "Create a profile with: soliddns --appliance <URL> config set-profile <NAME>\n\
             Or pass --appliance. Config file expected at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(soliddns::config))]
    Config(Box<ConfigError>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(soliddns::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── Timeout ──────────────────────────────────────────────────────
    #[error("Request timed out after {seconds}s")]
    #[diagnostic(
        code(soliddns::timeout),
        help("Increase timeout with --timeout or check appliance responsiveness.")
    )]
    Timeout { seconds: u64 },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON payload: {0}")]
    #[diagnostic(code(soliddns::json), help("Check the JSON file contents and try again."))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } | Self::TlsError { .. } | Self::Unavailable { .. } => {
                exit_code::CONNECTION
            }
            Self::AuthFailed { .. } | Self::NoCredentials { .. } => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Ambiguous { .. } | Self::RequiresReplacement { .. } => exit_code::CONFLICT,
            Self::Timeout { .. } => exit_code::TIMEOUT,
            Self::Validation { .. }
            | Self::UnknownResource { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::Unsupported { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the active profile name to credential errors.
    pub fn with_profile(self, profile: &str) -> Self {
        match self {
            Self::AuthFailed { .. } => Self::AuthFailed {
                profile: profile.into(),
            },
            other => other,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Transport { entity, source } => match source {
                soliddns_api::Error::Authentication { .. } => CliError::AuthFailed {
                    profile: "current".into(),
                },
                soliddns_api::Error::Timeout { timeout_secs } => CliError::Timeout {
                    seconds: timeout_secs,
                },
                soliddns_api::Error::Tls(message) => CliError::TlsError { message },
                other => CliError::ConnectionFailed {
                    entity,
                    source: Box::new(other),
                },
            },

            CoreError::Decode { entity, message } => CliError::Decode { entity, message },

            CoreError::RemoteRejected {
                entity,
                status,
                message,
            } => CliError::Rejected {
                entity,
                status,
                message,
            },

            CoreError::Unavailable { entity, status } => CliError::Unavailable { entity, status },

            CoreError::NotFound { kind, key } => CliError::NotFound {
                resource_type: kind,
                identifier: key,
            },

            CoreError::Ambiguous { kind, key, matches } => CliError::Ambiguous {
                resource_type: kind,
                identifier: key,
                matches,
            },

            CoreError::Validation { field, reason } => CliError::Validation { field, reason },

            CoreError::RequiresReplacement { entity, fields } => CliError::RequiresReplacement {
                entity,
                fields: fields.join(", "),
            },

            CoreError::Unsupported { entity, operation } => {
                CliError::Unsupported { entity, operation }
            }

            CoreError::InvalidState {
                entity,
                operation,
                state,
            } => CliError::Validation {
                field: "id".into(),
                reason: format!("{entity}: cannot {operation} while {state}"),
            },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoCredentials { profile } => CliError::NoCredentials { profile },
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: String::new(),
            },
            other => CliError::Config(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failure_maps_to_auth_exit_code() {
        let err = CliError::from(CoreError::Transport {
            entity: "DNS RR 'www'".into(),
            source: soliddns_api::Error::Authentication {
                message: "invalid credentials (HTTP 401)".into(),
            },
        });
        assert_eq!(err.exit_code(), exit_code::AUTH);
        assert!(matches!(
            err.with_profile("lab"),
            CliError::AuthFailed { ref profile } if profile == "lab"
        ));
    }

    #[test]
    fn resolution_not_found_keeps_kind_and_key() {
        let err = CliError::from(CoreError::NotFound {
            kind: "IP space".into(),
            key: "prod".into(),
        });
        assert_eq!(err.to_string(), "IP space 'prod' not found");
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }

    #[test]
    fn replacement_is_a_conflict() {
        let err = CliError::from(CoreError::RequiresReplacement {
            entity: "DNS RR 'www'".into(),
            fields: vec!["type".into()],
        });
        assert_eq!(err.exit_code(), exit_code::CONFLICT);
    }

    #[test]
    fn timeout_keeps_seconds() {
        let err = CliError::from(CoreError::Transport {
            entity: "DNS RR 'www'".into(),
            source: soliddns_api::Error::Timeout { timeout_secs: 5 },
        });
        assert!(matches!(err, CliError::Timeout { seconds: 5 }));
        assert_eq!(err.exit_code(), exit_code::TIMEOUT);
    }
}
