// ── Domain model ──
//
// Types shared by the resolver, builder, interpreter and engine. They are
// entity-type agnostic: per-type knowledge lives in `descriptor`.

pub mod entity_config;
pub mod local_id;
pub mod outcome;
pub mod record;

pub use entity_config::EntityConfig;
pub use local_id::LocalId;
pub use outcome::{ClearPolicy, Operation, Outcome};
pub use record::RemoteRecord;
