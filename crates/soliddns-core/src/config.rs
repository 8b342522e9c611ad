// ── Runtime connection configuration ──
//
// These types describe *how* to reach a SOLIDserver appliance. They carry
// credential data and connection tuning, but never touch disk. The CLI
// builds an `ApplianceConfig` from its profile and hands it in.

use std::time::Duration;

use secrecy::SecretString;
use soliddns_api::{Credentials, RestClient, TlsMode, TransportConfig};
use url::Url;

use crate::engine::{ReconcileOptions, Reconciler};
use crate::error::CoreError;

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed appliance certificates).
    DangerAcceptInvalid,
}

impl From<&TlsVerification> for TlsMode {
    fn from(tls: &TlsVerification) -> Self {
        match tls {
            TlsVerification::SystemDefaults => TlsMode::System,
            TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
        }
    }
}

/// Configuration for connecting to a single appliance.
#[derive(Debug, Clone)]
pub struct ApplianceConfig {
    /// Appliance URL (e.g., `https://ipam.example.com`).
    pub url: Url,
    /// Basic-auth username.
    pub username: String,
    pub password: SecretString,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
    pub options: ReconcileOptions,
}

impl ApplianceConfig {
    pub fn new(url: Url, username: impl Into<String>, password: SecretString) -> Self {
        Self {
            url,
            username: username.into(),
            password,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            options: ReconcileOptions::default(),
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            tls: TlsMode::from(&self.tls),
            timeout: self.timeout,
            ..TransportConfig::default()
        }
    }

    /// Build the REST client this configuration describes.
    pub fn build_transport(&self) -> Result<RestClient, CoreError> {
        let credentials = Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        };
        Ok(RestClient::new(
            self.url.clone(),
            Some(credentials),
            &self.transport_config(),
        )?)
    }
}

impl Reconciler<RestClient> {
    /// A reconciler talking to the appliance over HTTPS.
    pub fn connect(config: &ApplianceConfig) -> Result<Self, CoreError> {
        Ok(Self::with_options(
            config.build_transport()?,
            config.options.clone(),
        ))
    }
}
