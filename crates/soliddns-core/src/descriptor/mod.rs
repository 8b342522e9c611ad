// ── Entity-type descriptors ──
//
// Everything that differs between entity types is data in this module:
// REST services, field mappings, validation rules and resolution chains.
// The engine, builder and resolver are generic over an `EntityDescriptor`
// and never branch on the entity type.

pub mod dns_rr;
pub mod ip6_alias;

use std::borrow::Cow;
use std::net::{IpAddr, Ipv6Addr};

use soliddns_api::Verb;

use crate::model::{EntityConfig, RemoteRecord};

pub use dns_rr::DNS_RR;
pub use ip6_alias::IP6_ALIAS;

// ── Field rules ─────────────────────────────────────────────────────

/// Case normalization applied before a value is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalize {
    Verbatim,
    Uppercase,
}

impl Normalize {
    pub fn apply(self, value: &str) -> Cow<'_, str> {
        match self {
            Self::Verbatim => Cow::Borrowed(value),
            Self::Uppercase => Cow::Owned(value.to_uppercase()),
        }
    }
}

/// Validation rule for a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Any,
    /// One of the listed values, compared case-insensitively.
    OneOf(&'static [&'static str]),
    IpAddr,
    Ipv6Addr,
}

impl Rule {
    pub fn check(self, value: &str) -> Result<(), String> {
        match self {
            Self::Any => Ok(()),
            Self::OneOf(allowed) => {
                if allowed.iter().any(|a| a.eq_ignore_ascii_case(value)) {
                    Ok(())
                } else {
                    Err(format!(
                        "unsupported value '{value}', expected one of {}",
                        allowed.join(", ")
                    ))
                }
            }
            Self::IpAddr => value
                .parse::<IpAddr>()
                .map(|_| ())
                .map_err(|_| format!("'{value}' is not a valid IP address")),
            Self::Ipv6Addr => value
                .parse::<Ipv6Addr>()
                .map(|_| ())
                .map_err(|_| format!("'{value}' is not a valid IPv6 address")),
        }
    }
}

/// One configuration field and how it maps onto the REST API.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub description: &'static str,
    /// Parameter name on create/update. `None` for fields that only feed
    /// the resolution chain.
    pub param: Option<&'static str>,
    /// Field name in read responses. `None` if the appliance does not
    /// echo it back.
    pub remote: Option<&'static str>,
    pub default: Option<&'static str>,
    pub required: bool,
    /// Immutable after create: never sent on update, changes force
    /// destroy-then-recreate.
    pub force_new: bool,
    pub normalize: Normalize,
    pub rule: Rule,
}

impl FieldSpec {
    pub const fn new(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            param: None,
            remote: None,
            default: None,
            required: false,
            force_new: false,
            normalize: Normalize::Verbatim,
            rule: Rule::Any,
        }
    }

    pub const fn param(mut self, param: &'static str) -> Self {
        self.param = Some(param);
        self
    }

    pub const fn remote(mut self, remote: &'static str) -> Self {
        self.remote = Some(remote);
        self
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn uppercase(mut self) -> Self {
        self.normalize = Normalize::Uppercase;
        self
    }

    pub const fn rule(mut self, rule: Rule) -> Self {
        self.rule = rule;
        self
    }

    /// Configured value, else the default, normalized for the wire.
    pub fn effective<'a>(&self, config: &'a EntityConfig) -> Option<Cow<'a, str>> {
        config
            .get(self.name)
            .or(self.default)
            .map(|v| self.normalize.apply(v))
    }
}

// ── Resolution chain ────────────────────────────────────────────────

/// Where the value of a lookup filter comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// A configuration field, verbatim.
    Field(&'static str),
    /// An IPv6 configuration field, in the appliance's 32-hex-digit form.
    Ipv6Hex(&'static str),
    /// An identifier resolved by an earlier step of the chain.
    Chain(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Filter {
    pub column: &'static str,
    pub source: KeySource,
}

impl Filter {
    pub const fn new(column: &'static str, source: KeySource) -> Self {
        Self { column, source }
    }
}

/// One lookup turning human-readable values into an appliance id.
#[derive(Debug, Clone, Copy)]
pub struct LookupStep {
    /// Human-readable name of what is looked up, for errors.
    pub kind: &'static str,
    pub endpoint: &'static str,
    pub filters: &'static [Filter],
    /// Response field carrying the identifier.
    pub id_field: &'static str,
    /// Name under which the identifier is recorded in the chain.
    pub binding: &'static str,
}

// ── Endpoints ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct WriteEndpoint {
    pub verb: Verb,
    pub path: &'static str,
    pub success: &'static [u16],
}

/// How a read addresses the object by its local identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector {
    /// `<param>=<id>`
    Param(&'static str),
    /// `WHERE=<column>='<id>'`
    Where(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct ReadEndpoint {
    pub path: &'static str,
    pub selector: Selector,
    pub success: &'static [u16],
}

// ── Descriptor ──────────────────────────────────────────────────────

/// Static description of one entity type.
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Resource type name as the host knows it.
    pub resource: &'static str,
    /// Short name accepted by the CLI.
    pub alias: &'static str,
    /// Human-readable type label used in messages.
    pub label: &'static str,
    /// Field whose value names an instance in messages.
    pub display_field: &'static str,
    pub fields: &'static [FieldSpec],
    pub chain: &'static [LookupStep],
    /// Chain bindings sent as parameters on create and read:
    /// `(binding, param)`.
    pub chain_params: &'static [(&'static str, &'static str)],
    /// Parameter carrying the local identifier on update and delete.
    pub id_param: &'static str,
    pub create: WriteEndpoint,
    pub update: Option<WriteEndpoint>,
    pub read: ReadEndpoint,
    pub delete: WriteEndpoint,
}

impl EntityDescriptor {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn supports_update(&self) -> bool {
        self.update.is_some()
    }

    /// `"<label> '<name>'"`, the way instances are named in messages.
    pub fn display_name(&self, config: &EntityConfig) -> String {
        match config.get(self.display_field) {
            Some(name) => format!("{} '{name}'", self.label),
            None => self.label.to_owned(),
        }
    }

    /// Force-replace fields whose effective value differs between two
    /// configurations.
    pub fn replacement_fields(&self, prior: &EntityConfig, next: &EntityConfig) -> Vec<&'static str> {
        self.fields
            .iter()
            .filter(|f| f.force_new && f.effective(prior) != f.effective(next))
            .map(|f| f.name)
            .collect()
    }

    /// Fill in defaults and normalize values, the way the appliance will
    /// report them back.
    pub fn normalized(&self, config: &EntityConfig) -> EntityConfig {
        let mut out = config.clone();
        for field in self.fields {
            if let Some(value) = field.effective(config) {
                out.set(field.name, value.into_owned());
            }
        }
        out
    }

    /// Copy read-mapped fields from a record over `config`. Fields the
    /// record does not carry keep their configured value.
    pub fn refresh(&self, config: &EntityConfig, record: &RemoteRecord) -> EntityConfig {
        let mut out = config.clone();
        for field in self.fields {
            if let Some(value) = field.remote.and_then(|r| record.field(r)) {
                out.set(field.name, value);
            }
        }
        out
    }
}

// ── Registry ────────────────────────────────────────────────────────

static REGISTRY: [&EntityDescriptor; 2] = [&DNS_RR, &IP6_ALIAS];

/// Every registered entity type.
pub fn all() -> &'static [&'static EntityDescriptor] {
    &REGISTRY
}

/// Find a descriptor by resource name or CLI alias.
pub fn lookup(name: &str) -> Option<&'static EntityDescriptor> {
    REGISTRY
        .iter()
        .copied()
        .find(|d| d.resource == name || d.alias == name)
}
