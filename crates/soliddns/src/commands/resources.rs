//! `resources`: the registered entity types and their fields.

use serde::Serialize;
use tabled::Tabled;

use soliddns_core::descriptor::{self, EntityDescriptor};

use crate::cli::GlobalOpts;
use crate::output;

#[derive(Serialize)]
struct FieldView {
    name: &'static str,
    description: &'static str,
    required: bool,
    force_new: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    default: Option<&'static str>,
}

#[derive(Serialize)]
struct ResourceView {
    resource: &'static str,
    alias: &'static str,
    label: &'static str,
    updatable: bool,
    fields: Vec<FieldView>,
}

impl From<&EntityDescriptor> for ResourceView {
    fn from(d: &EntityDescriptor) -> Self {
        Self {
            resource: d.resource,
            alias: d.alias,
            label: d.label,
            updatable: d.supports_update(),
            fields: d
                .fields
                .iter()
                .map(|f| FieldView {
                    name: f.name,
                    description: f.description,
                    required: f.required,
                    force_new: f.force_new,
                    default: f.default,
                })
                .collect(),
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ResourceRow {
    #[tabled(rename = "Resource")]
    resource: &'static str,
    #[tabled(rename = "Alias")]
    alias: &'static str,
    #[tabled(rename = "Update")]
    update: &'static str,
    #[tabled(rename = "Fields")]
    fields: String,
}

/// `name` for optional fields, `name*` for required ones, `!` marks
/// fields that force replacement.
fn field_summary(view: &ResourceView) -> String {
    view.fields
        .iter()
        .map(|f| {
            let mut s = f.name.to_owned();
            if f.required {
                s.push('*');
            }
            if f.force_new {
                s.push('!');
            }
            s
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(global: &GlobalOpts) {
    let views: Vec<ResourceView> = descriptor::all().iter().map(|d| ResourceView::from(*d)).collect();

    let out = output::render_list(
        &global.output,
        &views,
        |v| ResourceRow {
            resource: v.resource,
            alias: v.alias,
            update: if v.updatable { "yes" } else { "replace" },
            fields: field_summary(v),
        },
        |v| v.resource.to_owned(),
    );
    output::print_output(&out, global.quiet);
}
