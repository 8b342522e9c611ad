// soliddns-api: Async Rust client for the SOLIDserver REST API

pub mod client;
pub mod error;
pub mod params;
pub mod transport;

pub use client::{Credentials, RawResponse, RestClient, Transport, Verb};
pub use error::Error;
pub use params::FormParams;
pub use transport::{TlsMode, TransportConfig, rest_headers};
