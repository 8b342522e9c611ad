// ── Request parameter building ──
//
// Pure functions from (operation, descriptor, configuration, chain, id) to
// the form parameters of the primary call. No I/O happens here.

use soliddns_api::FormParams;

use crate::descriptor::{EntityDescriptor, Selector};
use crate::error::CoreError;
use crate::model::{EntityConfig, LocalId, Operation};
use crate::resolve::{ResolvedChain, where_clause};

/// Check a configuration against the descriptor's field rules.
///
/// Reports the first offending field.
pub fn validate(desc: &EntityDescriptor, config: &EntityConfig) -> Result<(), CoreError> {
    for field in desc.fields {
        match config.get(field.name) {
            Some(value) => field.rule.check(value).map_err(|reason| CoreError::Validation {
                field: field.name.to_owned(),
                reason,
            })?,
            None if field.required => {
                return Err(CoreError::Validation {
                    field: field.name.to_owned(),
                    reason: "required".into(),
                });
            }
            None => {}
        }
    }
    Ok(())
}

/// Parameters for the primary call of `op`.
pub fn build(
    op: Operation,
    desc: &EntityDescriptor,
    config: &EntityConfig,
    chain: &ResolvedChain,
    id: &LocalId,
) -> Result<FormParams, CoreError> {
    let mut params = FormParams::new();

    match op {
        Operation::Create => {
            add_chain(&mut params, desc, chain)?;
            add_fields(&mut params, desc, config, false)?;
        }
        Operation::Update => {
            params.add(desc.id_param, require_id(op, desc, config, id)?);
            add_chain(&mut params, desc, chain)?;
            add_fields(&mut params, desc, config, true)?;
        }
        Operation::Read => {
            let id = require_id(op, desc, config, id)?;
            add_chain(&mut params, desc, chain)?;
            match desc.read.selector {
                Selector::Param(name) => params.add(name, id),
                Selector::Where(column) => params.add("WHERE", where_clause([(column, id)])),
            }
        }
        Operation::Delete => {
            params.add(desc.id_param, require_id(op, desc, config, id)?);
        }
    }

    Ok(params)
}

fn add_chain(
    params: &mut FormParams,
    desc: &EntityDescriptor,
    chain: &ResolvedChain,
) -> Result<(), CoreError> {
    for (binding, param) in desc.chain_params {
        let id = chain.get(binding).ok_or_else(|| CoreError::Config {
            message: format!("{}: '{binding}' was not resolved", desc.label),
        })?;
        params.add(*param, id);
    }
    Ok(())
}

/// Write-mapped fields, defaults applied. `skip_immutable` leaves out the
/// force-replace fields, which an update must never send.
fn add_fields(
    params: &mut FormParams,
    desc: &EntityDescriptor,
    config: &EntityConfig,
    skip_immutable: bool,
) -> Result<(), CoreError> {
    for field in desc.fields {
        let Some(param) = field.param else { continue };
        if skip_immutable && field.force_new {
            continue;
        }
        match field.effective(config) {
            Some(value) => params.add(param, value),
            None if field.required => {
                return Err(CoreError::Validation {
                    field: field.name.to_owned(),
                    reason: "required".into(),
                });
            }
            None => {}
        }
    }
    Ok(())
}

fn require_id<'a>(
    op: Operation,
    desc: &EntityDescriptor,
    config: &EntityConfig,
    id: &'a LocalId,
) -> Result<&'a str, CoreError> {
    id.get().ok_or_else(|| CoreError::InvalidState {
        entity: desc.display_name(config),
        operation: op.to_string(),
        state: "absent".into(),
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::descriptor::{DNS_RR, IP6_ALIAS};

    fn www() -> EntityConfig {
        EntityConfig::new()
            .with("server", "ns1.example.com")
            .with("name", "www.example.com")
            .with("type", "a")
            .with("value", "10.0.0.1")
    }

    fn pairs(params: &FormParams) -> Vec<(&str, &str)> {
        params.iter().collect()
    }

    #[test]
    fn create_maps_fields_and_applies_defaults() {
        let params = build(
            Operation::Create,
            &DNS_RR,
            &www(),
            &ResolvedChain::new(),
            &LocalId::empty(),
        )
        .expect("create params");

        assert_eq!(
            pairs(&params),
            [
                ("dns_name", "ns1.example.com"),
                ("rr_name", "www.example.com"),
                ("rr_type", "A"),
                ("value1", "10.0.0.1"),
                ("rr_ttl", "3600"),
            ]
        );
    }

    #[test]
    fn create_missing_required_field() {
        let mut config = www();
        config.remove("value");
        let err = build(
            Operation::Create,
            &DNS_RR,
            &config,
            &ResolvedChain::new(),
            &LocalId::empty(),
        )
        .expect_err("value is required");
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "value"));
    }

    #[test]
    fn update_never_sends_immutable_fields() {
        let params = build(
            Operation::Update,
            &DNS_RR,
            &www().with("ttl", "600"),
            &ResolvedChain::new(),
            &LocalId::new("123"),
        )
        .expect("update params");

        assert_eq!(
            pairs(&params),
            [("rr_id", "123"), ("value1", "10.0.0.1"), ("rr_ttl", "600")]
        );
    }

    #[test]
    fn read_by_param() {
        let params = build(
            Operation::Read,
            &DNS_RR,
            &www(),
            &ResolvedChain::new(),
            &LocalId::new("999"),
        )
        .expect("read params");
        assert_eq!(pairs(&params), [("rr_id", "999")]);
    }

    #[test]
    fn read_by_where_with_chain() {
        let mut chain = ResolvedChain::new();
        chain.push("site_id", "2");
        chain.push("ip6_id", "41");

        let params = build(
            Operation::Read,
            &IP6_ALIAS,
            &EntityConfig::new().with("name", "v6.example.com"),
            &chain,
            &LocalId::new("7"),
        )
        .expect("read params");
        assert_eq!(
            pairs(&params),
            [("ip6_id", "41"), ("WHERE", "ip6_name_id='7'")]
        );
    }

    #[test]
    fn alias_create_sends_address_id_and_default_type() {
        let mut chain = ResolvedChain::new();
        chain.push("site_id", "2");
        chain.push("ip6_id", "41");

        let config = EntityConfig::new()
            .with("space", "prod")
            .with("address", "2001:db8::1")
            .with("name", "v6.example.com");
        let params = build(Operation::Create, &IP6_ALIAS, &config, &chain, &LocalId::empty())
            .expect("create params");
        assert_eq!(
            pairs(&params),
            [
                ("ip6_id", "41"),
                ("ip6_name", "v6.example.com"),
                ("ip6_name_type", "CNAME"),
            ]
        );
    }

    #[test]
    fn delete_sends_only_the_identifier() {
        let params = build(
            Operation::Delete,
            &IP6_ALIAS,
            &EntityConfig::new(),
            &ResolvedChain::new(),
            &LocalId::new("7"),
        )
        .expect("delete params");
        assert_eq!(pairs(&params), [("ip6_name_id", "7")]);
    }

    #[test]
    fn delete_without_identifier_is_invalid_state() {
        let err = build(
            Operation::Delete,
            &DNS_RR,
            &www(),
            &ResolvedChain::new(),
            &LocalId::empty(),
        )
        .expect_err("no id");
        assert!(matches!(err, CoreError::InvalidState { .. }));
    }

    #[test]
    fn validate_rules() {
        assert!(validate(&DNS_RR, &www()).is_ok());
        assert!(validate(&DNS_RR, &www().with("type", "MX")).is_err());

        let alias = EntityConfig::new()
            .with("space", "prod")
            .with("address", "10.0.0.1")
            .with("name", "v6");
        let err = validate(&IP6_ALIAS, &alias).expect_err("ipv4 address");
        assert!(matches!(err, CoreError::Validation { ref field, .. } if field == "address"));
    }
}
