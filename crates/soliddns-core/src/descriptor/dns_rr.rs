// DNS resource records (`solidserver_dns_rr`).

use soliddns_api::Verb;

use super::{EntityDescriptor, FieldSpec, ReadEndpoint, Rule, Selector, WriteEndpoint};

const RECORD_TYPES: &[&str] = &["A", "AAAA", "CNAME"];

const FIELDS: &[FieldSpec] = &[
    FieldSpec::new("server", "DNS server hosting the zone")
        .param("dns_name")
        .remote("dns_name")
        .required()
        .force_new(),
    FieldSpec::new("name", "Fully qualified record name")
        .param("rr_name")
        .remote("rr_full_name")
        .required()
        .force_new(),
    FieldSpec::new("type", "Record type (A, AAAA, CNAME)")
        .param("rr_type")
        .remote("rr_type")
        .required()
        .force_new()
        .uppercase()
        .rule(Rule::OneOf(RECORD_TYPES)),
    FieldSpec::new("value", "Record value")
        .param("value1")
        .remote("value1")
        .required(),
    FieldSpec::new("ttl", "Time to live in seconds")
        .param("rr_ttl")
        .remote("ttl")
        .default_value("3600"),
];

pub static DNS_RR: EntityDescriptor = EntityDescriptor {
    resource: "solidserver_dns_rr",
    alias: "dns-rr",
    label: "DNS RR",
    display_field: "name",
    fields: FIELDS,
    chain: &[],
    chain_params: &[],
    id_param: "rr_id",
    create: WriteEndpoint {
        verb: Verb::Post,
        path: "rest/dns_rr_add",
        success: &[201],
    },
    update: Some(WriteEndpoint {
        verb: Verb::Put,
        path: "rest/dns_rr_add",
        success: &[200],
    }),
    read: ReadEndpoint {
        path: "rest/dns_rr_info",
        selector: Selector::Param("rr_id"),
        success: &[200],
    },
    delete: WriteEndpoint {
        verb: Verb::Delete,
        path: "rest/dns_rr_delete",
        success: &[200, 204],
    },
};
