// SOLIDserver REST client
//
// Wraps `reqwest::Client` with SOLIDserver URL construction, basic auth and
// query-string parameter encoding. Response bodies are not judged here:
// status and body are returned verbatim and the reconciliation layer
// applies its per-operation rules.

use std::future::Future;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use strum::{Display, EnumString};
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::params::FormParams;
use crate::transport::TransportConfig;

/// HTTP verbs accepted by the appliance's REST services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn method(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Status code and raw body of one appliance response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The one capability the reconciliation engine needs from the network.
///
/// `endpoint` is a service path relative to the appliance root, e.g.
/// `rest/dns_rr_add`. Implementations must return every HTTP response the
/// appliance produced as `Ok`, reserving `Err` for failures where no usable
/// response exists (plus authentication refusals).
pub trait Transport: Send + Sync {
    fn request(
        &self,
        verb: Verb,
        endpoint: &str,
        params: &FormParams,
    ) -> impl Future<Output = Result<RawResponse, Error>> + Send;
}

impl<T: Transport> Transport for Arc<T> {
    fn request(
        &self,
        verb: Verb,
        endpoint: &str,
        params: &FormParams,
    ) -> impl Future<Output = Result<RawResponse, Error>> + Send {
        (**self).request(verb, endpoint, params)
    }
}

/// Username and password presented on every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

/// HTTP client for the SOLIDserver REST API.
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
    timeout_secs: u64,
}

impl RestClient {
    /// Create a client from a `TransportConfig`.
    ///
    /// `base_url` is the appliance root (e.g. `https://ipam.example.com`);
    /// service paths are appended to it.
    pub fn new(
        base_url: Url,
        credentials: Option<Credentials>,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: Option<Credentials>,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            timeout_secs: 0,
        }
    }

    /// The appliance base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL of a service: `{base}/{endpoint}`.
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let endpoint = endpoint.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{endpoint}"))?)
    }

    async fn send(
        &self,
        verb: Verb,
        endpoint: &str,
        params: &FormParams,
    ) -> Result<RawResponse, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%verb, %url, params = params.len(), "sending request");
        trace!(query = %params, "request parameters");

        let mut builder = self.http.request(verb.method(), url).query(params);
        if let Some(ref creds) = self.credentials {
            builder = builder.basic_auth(&creds.username, Some(creds.password.expose_secret()));
        }

        let resp = builder.send().await.map_err(|e| {
            if e.is_timeout() && self.timeout_secs > 0 {
                Error::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                Error::Transport(e)
            }
        })?;

        let status = resp.status();
        match status {
            reqwest::StatusCode::UNAUTHORIZED => {
                return Err(Error::Authentication {
                    message: "invalid credentials (HTTP 401)".into(),
                });
            }
            reqwest::StatusCode::FORBIDDEN => {
                return Err(Error::Authentication {
                    message: format!("insufficient permissions for {endpoint} (HTTP 403)"),
                });
            }
            _ => {}
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        debug!(status = status.as_u16(), bytes = body.len(), "received response");
        trace!(body = %body.chars().take(512).collect::<String>(), "response body");

        Ok(RawResponse {
            status: status.as_u16(),
            body,
        })
    }
}

impl Transport for RestClient {
    fn request(
        &self,
        verb: Verb,
        endpoint: &str,
        params: &FormParams,
    ) -> impl Future<Output = Result<RawResponse, Error>> + Send {
        self.send(verb, endpoint, params)
    }
}
