// ── Core error types ──
//
// Every variant names the entity it concerns (type label plus display
// name) so a failure surfaced to the host is never just a status code.
// The taxonomy drives state mutation: see `is_transport_like`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Remote call failures ─────────────────────────────────────────
    /// The transport produced no usable response.
    #[error("{entity}: {source}")]
    Transport {
        entity: String,
        #[source]
        source: soliddns_api::Error,
    },

    /// The response body did not have the expected shape.
    #[error("{entity}: unexpected response from appliance: {message}")]
    Decode { entity: String, message: String },

    /// The appliance answered with a failure.
    #[error("{entity}: rejected by appliance (HTTP {status}): {message}")]
    RemoteRejected {
        entity: String,
        status: u16,
        message: String,
    },

    /// The appliance answered with a status configured as retryable.
    #[error("{entity}: appliance unavailable (HTTP {status})")]
    Unavailable { entity: String, status: u16 },

    // ── Resolution failures ──────────────────────────────────────────
    #[error("{kind} '{key}' not found")]
    NotFound { kind: String, key: String },

    #[error("{kind} '{key}' is ambiguous: {matches} objects match")]
    Ambiguous {
        kind: String,
        key: String,
        matches: usize,
    },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("{entity}: changing {fields} requires replacing the object", fields = .fields.join(", "))]
    RequiresReplacement { entity: String, fields: Vec<String> },

    #[error("{entity}: {operation} is not supported")]
    Unsupported { entity: String, operation: String },

    #[error("{entity}: cannot {operation} while {state}")]
    InvalidState {
        entity: String,
        operation: String,
        state: String,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub(crate) fn transport(entity: impl Into<String>, source: soliddns_api::Error) -> Self {
        Self::Transport {
            entity: entity.into(),
            source,
        }
    }

    /// Transport and decode failures say nothing about whether the remote
    /// object exists, so they must never mutate local state.
    pub fn is_transport_like(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Decode { .. } | Self::Unavailable { .. }
        )
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if the appliance refused the configured credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Transport { source, .. } if source.is_auth_failure())
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<soliddns_api::Error> for CoreError {
    fn from(err: soliddns_api::Error) -> Self {
        match err {
            soliddns_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            soliddns_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS setup failed: {msg}"),
            },
            other => CoreError::transport("appliance", other),
        }
    }
}
