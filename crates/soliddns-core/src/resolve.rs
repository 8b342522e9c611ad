// ── Identifier resolution ──
//
// Human-readable configuration values (space names, addresses) become the
// numeric ids the REST services need. Each `LookupStep` is one list call
// filtered with a `WHERE` clause; a chain runs its steps in order and
// stops at the first failure.

use std::fmt::Write as _;
use std::net::Ipv6Addr;

use soliddns_api::{FormParams, Transport, Verb};
use tracing::debug;

use crate::descriptor::{EntityDescriptor, KeySource, LookupStep};
use crate::error::CoreError;
use crate::interpret::{lenient_reason, parse_records};
use crate::model::EntityConfig;

/// Identifiers produced by a resolution chain, in step order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedChain(Vec<(&'static str, String)>);

impl ResolvedChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, binding: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(b, _)| *b == binding)
            .map(|(_, id)| id.as_str())
    }

    pub fn push(&mut self, binding: &'static str, id: impl Into<String>) {
        self.0.push((binding, id.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(b, id)| (*b, id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An IPv6 address as the appliance stores it: 32 lowercase hex digits.
///
/// `2001:db8::1` becomes `20010db8000000000000000000000001`.
pub fn ipv6_hex(address: &str) -> Result<String, CoreError> {
    let addr: Ipv6Addr = address.trim().parse().map_err(|_| CoreError::Validation {
        field: "address".into(),
        reason: format!("'{address}' is not a valid IPv6 address"),
    })?;

    let mut hex = String::with_capacity(32);
    for segment in addr.segments() {
        let _ = write!(hex, "{segment:04x}");
    }
    Ok(hex)
}

/// Single-quote a value for a `WHERE` clause, doubling embedded quotes.
pub fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `col1='v1' AND col2='v2'`
pub fn where_clause<'a>(terms: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    terms
        .into_iter()
        .map(|(column, value)| format!("{column}={}", quote(value)))
        .collect::<Vec<_>>()
        .join(" AND ")
}

/// Runs lookup steps against a transport.
pub struct Resolver<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> Resolver<'a, T> {
    pub fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Resolve every step of the descriptor's chain, in order.
    ///
    /// The first failing step aborts the chain: later steps are never sent.
    pub async fn resolve_chain(
        &self,
        desc: &EntityDescriptor,
        config: &EntityConfig,
    ) -> Result<ResolvedChain, CoreError> {
        let mut chain = ResolvedChain::new();
        for step in desc.chain {
            let id = self.resolve(step, config, &chain).await?;
            chain.push(step.binding, id);
        }
        Ok(chain)
    }

    /// Resolve one step to exactly one identifier.
    pub async fn resolve(
        &self,
        step: &LookupStep,
        config: &EntityConfig,
        chain: &ResolvedChain,
    ) -> Result<String, CoreError> {
        let (clause, key) = filter_terms(step, config, chain)?;
        let entity = format!("{} '{key}'", step.kind);

        debug!(kind = step.kind, key = %key, endpoint = step.endpoint, "resolving");

        let params = FormParams::new().with("WHERE", clause);
        let resp = self
            .transport
            .request(Verb::Get, step.endpoint, &params)
            .await
            .map_err(|e| CoreError::transport(entity.clone(), e))?;

        if !(200..300).contains(&resp.status) {
            let message = lenient_reason(&resp.body);
            return Err(CoreError::RemoteRejected {
                entity,
                status: resp.status,
                message,
            });
        }

        let records = parse_records(&resp.body).map_err(|e| CoreError::Decode {
            entity: entity.clone(),
            message: e.to_string(),
        })?;

        match records.as_slice() {
            [] => Err(CoreError::NotFound {
                kind: step.kind.to_owned(),
                key,
            }),
            [record] => {
                let id = record.field(step.id_field).ok_or_else(|| CoreError::Decode {
                    entity: entity.clone(),
                    message: format!("match has no '{}'", step.id_field),
                })?;
                debug!(kind = step.kind, key = %key, id, "resolved");
                Ok(id.to_owned())
            }
            many => Err(CoreError::Ambiguous {
                kind: step.kind.to_owned(),
                key,
                matches: many.len(),
            }),
        }
    }
}

/// Build the `WHERE` clause for a step and the human-readable key naming
/// what is looked up.
fn filter_terms(
    step: &LookupStep,
    config: &EntityConfig,
    chain: &ResolvedChain,
) -> Result<(String, String), CoreError> {
    let mut terms = Vec::with_capacity(step.filters.len());
    let mut key_parts = Vec::new();

    for filter in step.filters {
        let value = match filter.source {
            KeySource::Field(name) => {
                let value = required(config, name)?;
                key_parts.push(value.to_owned());
                value.to_owned()
            }
            KeySource::Ipv6Hex(name) => {
                let value = required(config, name)?;
                key_parts.push(value.to_owned());
                ipv6_hex(value)?
            }
            KeySource::Chain(binding) => chain
                .get(binding)
                .ok_or_else(|| CoreError::Config {
                    message: format!("{} lookup needs '{binding}' resolved first", step.kind),
                })?
                .to_owned(),
        };
        terms.push((filter.column, value));
    }

    let clause = where_clause(terms.iter().map(|(c, v)| (*c, v.as_str())));
    Ok((clause, key_parts.join(", ")))
}

fn required<'a>(config: &'a EntityConfig, name: &str) -> Result<&'a str, CoreError> {
    config.get(name).ok_or_else(|| CoreError::Validation {
        field: name.to_owned(),
        reason: "required".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::IP6_ALIAS;

    #[test]
    fn ipv6_hex_expands_compressed_form() {
        assert_eq!(
            ipv6_hex("2001:db8::1").expect("valid"),
            "20010db8000000000000000000000001"
        );
        assert_eq!(
            ipv6_hex("2001:DB8:0:0:0:0:0:ABCD").expect("valid"),
            "20010db800000000000000000000abcd"
        );
        assert_eq!(ipv6_hex("::").expect("valid"), "0".repeat(32));
    }

    #[test]
    fn ipv6_hex_rejects_other_input() {
        assert!(matches!(
            ipv6_hex("10.0.0.1"),
            Err(CoreError::Validation { .. })
        ));
    }

    #[test]
    fn quote_doubles_single_quotes() {
        assert_eq!(quote("o'brien"), "'o''brien'");
    }

    #[test]
    fn where_clause_joins_with_and() {
        assert_eq!(
            where_clause([("site_id", "2"), ("ip6_addr", "abcd")]),
            "site_id='2' AND ip6_addr='abcd'"
        );
    }

    #[test]
    fn address_step_uses_chain_and_hex() {
        let config = EntityConfig::new()
            .with("space", "prod")
            .with("address", "2001:db8::1");
        let mut chain = ResolvedChain::new();
        chain.push("site_id", "4");

        let (clause, key) = filter_terms(&IP6_ALIAS.chain[1], &config, &chain).expect("terms");
        assert_eq!(
            clause,
            "site_id='4' AND ip6_addr='20010db8000000000000000000000001'"
        );
        assert_eq!(key, "2001:db8::1");
    }

    #[test]
    fn missing_chain_link_is_config_error() {
        let config = EntityConfig::new().with("address", "2001:db8::1");
        let err = filter_terms(&IP6_ALIAS.chain[1], &config, &ResolvedChain::new())
            .expect_err("site_id missing");
        assert!(matches!(err, CoreError::Config { .. }));
    }
}
