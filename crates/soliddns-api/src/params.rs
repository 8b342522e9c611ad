// Form parameter sets
//
// SOLIDserver services take flat key/value parameters, form-encoded into
// the query string. Order is preserved so requests are reproducible.

use std::fmt;

use serde::Serialize;

/// Ordered, form-encodable key/value parameters for one REST call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter. Later duplicates are kept; the appliance reads
    /// the first occurrence.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// Builder-style [`add`](Self::add).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add(key, value);
        self
    }

    /// First value recorded for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
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

    /// `application/x-www-form-urlencoded` rendering, as sent on the wire.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl fmt::Display for FormParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_insertion_order() {
        let params = FormParams::new()
            .with("rr_name", "www.example.com")
            .with("rr_type", "A");
        let keys: Vec<&str> = params.keys().collect();
        assert_eq!(keys, ["rr_name", "rr_type"]);
    }

    #[test]
    fn encodes_where_clause() {
        let params = FormParams::new().with("WHERE", "site_name='prod space'");
        assert_eq!(params.encode(), "WHERE=site_name%3D%27prod+space%27");
    }

    #[test]
    fn get_returns_first_occurrence() {
        let params: FormParams = [("a", "1"), ("a", "2")].into_iter().collect();
        assert_eq!(params.get("a"), Some("1"));
        assert!(!params.contains("b"));
        assert_eq!(params.len(), 2);
    }
}
