// ── Lifecycle operations and their outcomes ──

use strum::{Display, EnumString};

use super::record::RemoteRecord;

/// The four lifecycle operations the host can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
}

impl Operation {
    /// Which identifier-clearing policy this operation applies, if any.
    pub fn clear_policy(self) -> Option<ClearPolicy> {
        match self {
            Self::Read => Some(ClearPolicy::ClearOnNotFound),
            Self::Delete => Some(ClearPolicy::ClearAlways),
            Self::Create | Self::Update => None,
        }
    }
}

/// Interpreted result of one primary REST call.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Created(String),
    Updated(String),
    Deleted,
    Found(RemoteRecord),
    NotFound,
    Failed(String),
}

/// When an interpreted outcome wipes the local identifier.
///
/// Transport and decode errors never reach a policy: they are returned
/// before an outcome exists, so they can never clear anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearPolicy {
    /// Clear only when the appliance says the object does not exist.
    ClearOnNotFound,
    /// Clear on every interpreted outcome, success or rejection.
    ClearAlways,
}

impl ClearPolicy {
    pub fn clears(self, outcome: &Outcome) -> bool {
        match self {
            Self::ClearOnNotFound => matches!(outcome, Outcome::NotFound),
            Self::ClearAlways => true,
        }
    }
}
