// ── Remote records ──
//
// One flat JSON object from an appliance response. Values are loosely
// typed on the wire; every read goes through `field()`, which is the only
// place that decides what counts as a usable value.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Response field carrying the identifier assigned by a write.
pub const RET_OID: &str = "ret_oid";

/// Response field carrying the appliance's own failure message.
pub const ERRMSG: &str = "errmsg";

/// One record returned by the appliance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteRecord(Map<String, Value>);

impl RemoteRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// String value of `name`.
    ///
    /// Absent, `null`, empty, and non-string values all decode to `None`.
    pub fn field(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
            _ => None,
        }
    }

    /// Identifier assigned by a create or update.
    pub fn ret_oid(&self) -> Option<&str> {
        self.field(RET_OID)
    }

    /// Appliance failure message.
    pub fn errmsg(&self) -> Option<&str> {
        self.field(ERRMSG)
    }

    /// All usable string fields, in key order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .keys()
            .filter_map(|k| self.field(k).map(|v| (k.as_str(), v)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for RemoteRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}
