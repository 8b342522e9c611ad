// IPv6 address aliases (`solidserver_ip6_alias`).
//
// Aliases hang off an IPv6 address, which the appliance only knows by id.
// The space name and address are turned into that id by a two-step
// lookup before every call.

use soliddns_api::Verb;

use super::{
    EntityDescriptor, FieldSpec, Filter, KeySource, LookupStep, ReadEndpoint, Rule, Selector,
    WriteEndpoint,
};

const ALIAS_TYPES: &[&str] = &["A", "CNAME"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("space", "IP space holding the address")
        .required()
        .force_new(),
    FieldSpec::new("address", "IPv6 address the alias points at")
        .required()
        .force_new()
        .rule(Rule::Ipv6Addr),
    FieldSpec::new("name", "Alias name")
        .param("ip6_name")
        .remote("alias_name")
        .required()
        .force_new(),
    FieldSpec::new("type", "Alias type (A, CNAME)")
        .param("ip6_name_type")
        .remote("ip6_name_type")
        .default_value("CNAME")
        .force_new()
        .uppercase()
        .rule(Rule::OneOf(ALIAS_TYPES)),
];

const CHAIN: &[LookupStep] = &[
    LookupStep {
        kind: "IP space",
        endpoint: "rest/ip_site_list",
        filters: &[Filter::new("site_name", KeySource::Field("space"))],
        id_field: "site_id",
        binding: "site_id",
    },
    LookupStep {
        kind: "IPv6 address",
        endpoint: "rest/ip6_address6_list",
        filters: &[
            Filter::new("site_id", KeySource::Chain("site_id")),
            Filter::new("ip6_addr", KeySource::Ipv6Hex("address")),
        ],
        id_field: "ip6_id",
        binding: "ip6_id",
    },
];

pub static IP6_ALIAS: EntityDescriptor = EntityDescriptor {
    resource: "solidserver_ip6_alias",
    alias: "ip6-alias",
    label: "IPv6 alias",
    display_field: "name",
    fields: FIELDS,
    chain: CHAIN,
    chain_params: &[("ip6_id", "ip6_id")],
    id_param: "ip6_name_id",
    create: WriteEndpoint {
        verb: Verb::Post,
        path: "rest/ip6_alias_add",
        success: &[200, 201],
    },
    update: None,
    read: ReadEndpoint {
        path: "rest/ip6_alias_list",
        selector: Selector::Where("ip6_name_id"),
        success: &[200],
    },
    delete: WriteEndpoint {
        verb: Verb::Delete,
        path: "rest/ip6_alias_delete",
        success: &[200, 204],
    },
};
