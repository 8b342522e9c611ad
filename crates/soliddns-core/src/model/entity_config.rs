// ── Entity configuration ──
//
// The user-declared description of one managed object: field name to
// string value. Ordered so parameter sets and rendered output are stable.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared configuration of one entity instance.
///
/// Empty values count as unset: the host frequently hands over `""` for
/// optional fields the user never wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityConfig(BTreeMap<String, String>);

impl EntityConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Value of `field`, `None` when absent or empty.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.0.remove(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for EntityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (k, v) in &self.0 {
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EntityConfig {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for EntityConfig {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.set(k, v);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_values_read_as_unset() {
        let cfg = EntityConfig::new().with("ttl", "").with("name", "www");
        assert_eq!(cfg.get("ttl"), None);
        assert!(!cfg.contains("ttl"));
        assert_eq!(cfg.get("name"), Some("www"));
    }

    #[test]
    fn display_is_sorted() {
        let cfg: EntityConfig = [("type", "A"), ("name", "www")].into_iter().collect();
        assert_eq!(cfg.to_string(), "name=www, type=A");
    }

    #[test]
    fn deserializes_from_flat_json_object() {
        let cfg: EntityConfig =
            serde_json::from_str(r#"{"name":"www.example.com","type":"a"}"#).expect("valid");
        assert_eq!(cfg.get("type"), Some("a"));
        assert_eq!(cfg.len(), 2);
    }
}
