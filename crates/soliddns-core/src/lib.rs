// soliddns-core: Reconciliation engine between a host's desired state and a
// SOLIDserver appliance (DNS resource records, IPv6 address aliases).

pub mod config;
pub mod descriptor;
pub mod engine;
pub mod error;
pub mod instance;
pub mod interpret;
pub mod model;
pub mod params;
pub mod resolve;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ApplianceConfig, TlsVerification};
pub use descriptor::EntityDescriptor;
pub use engine::{ReadResult, ReconcileOptions, Reconciler};
pub use error::CoreError;
pub use instance::{EntityInstance, EntityState};
pub use interpret::{DecodeError, interpret, parse_records};
pub use resolve::{ResolvedChain, Resolver};

pub use model::{ClearPolicy, EntityConfig, LocalId, Operation, Outcome, RemoteRecord};

// The transport seam, for hosts and tests that supply their own.
pub use soliddns_api::{FormParams, RawResponse, RestClient, Transport, Verb};
