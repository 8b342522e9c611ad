//! Lifecycle command handlers: create, read, update, delete.

use serde::Serialize;

use soliddns_core::{EntityInstance, Outcome, Reconciler, Transport};

use crate::cli::{GlobalOpts, ResourceArgs};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Rendering ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct ObjectView<'a> {
    resource: &'static str,
    id: &'a str,
    fields: &'a soliddns_core::EntityConfig,
}

impl<'a> ObjectView<'a> {
    fn of(instance: &'a EntityInstance) -> Self {
        Self {
            resource: instance.descriptor().resource,
            id: instance.id().as_str(),
            fields: instance.config(),
        }
    }
}

fn detail(view: &ObjectView<'_>) -> String {
    let width = view
        .fields
        .iter()
        .map(|(k, _)| k.len())
        .chain(["resource".len(), "id".len()])
        .max()
        .unwrap_or_default();

    let mut lines = vec![
        format!("{:<width$}  {}", "resource", view.resource),
        format!("{:<width$}  {}", "id", view.id),
    ];
    lines.extend(
        view.fields
            .iter()
            .map(|(k, v)| format!("{k:<width$}  {v}")),
    );
    lines.join("\n")
}

fn print_instance(instance: &EntityInstance, global: &GlobalOpts) {
    let out = output::render_single(
        &global.output,
        &ObjectView::of(instance),
        detail,
        |v| v.id.to_owned(),
    );
    output::print_output(&out, global.quiet);
}

// ── Handlers ────────────────────────────────────────────────────────

pub async fn create<T: Transport>(
    reconciler: &Reconciler<T>,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let desc = util::descriptor(&args.resource)?;
    if args.id.is_some() {
        return Err(CliError::Validation {
            field: "id".into(),
            reason: "the appliance assigns identifiers; drop --id on create".into(),
        });
    }
    let config = util::collect_fields(desc, &args)?;

    let mut instance = EntityInstance::new(desc, desc.normalized(&config));
    instance.create(reconciler).await?;

    output::status(
        &format!("Created {} (id {})", instance.display_name(), instance.id()),
        &global.color,
        global.quiet,
    );
    print_instance(&instance, global);
    Ok(())
}

pub async fn read<T: Transport>(
    reconciler: &Reconciler<T>,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let desc = util::descriptor(&args.resource)?;
    let id = util::require_id(&args, "read")?;
    let config = util::collect_fields(desc, &args)?;

    let mut instance = EntityInstance::existing(desc, id.clone(), config);
    if !instance.read(reconciler).await? {
        return Err(CliError::NotFound {
            resource_type: desc.label.into(),
            identifier: id.to_string(),
        });
    }

    print_instance(&instance, global);
    Ok(())
}

/// Read the current object, overlay the given fields, then update.
///
/// Changing an immutable field fails before anything is sent.
pub async fn update<T: Transport>(
    reconciler: &Reconciler<T>,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let desc = util::descriptor(&args.resource)?;
    if !desc.supports_update() {
        return Err(CliError::Unsupported {
            entity: desc.label.into(),
            operation: "update".into(),
        });
    }
    let id = util::require_id(&args, "update")?;
    let changes = util::collect_fields(desc, &args)?;

    let mut instance = EntityInstance::existing(desc, id.clone(), changes.clone());
    if !instance.read(reconciler).await? {
        return Err(CliError::NotFound {
            resource_type: desc.label.into(),
            identifier: id.to_string(),
        });
    }

    let mut next = instance.config().clone();
    next.extend(changes.iter());
    instance.update(reconciler, next).await?;

    output::status(
        &format!("Updated {} (id {})", instance.display_name(), instance.id()),
        &global.color,
        global.quiet,
    );
    print_instance(&instance, global);
    Ok(())
}

pub async fn delete<T: Transport>(
    reconciler: &Reconciler<T>,
    args: ResourceArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let desc = util::descriptor(&args.resource)?;
    let id = util::require_id(&args, "delete")?;
    let config = util::collect_fields(desc, &args)?;

    let mut instance = EntityInstance::existing(desc, id, config);
    let prompt = format!("Delete {} (id {})?", instance.display_name(), instance.id());
    if !util::confirm(&prompt, "delete", global.yes)? {
        output::warning("aborted", &global.color);
        return Ok(());
    }

    let entity = instance.display_name();
    match instance.delete(reconciler).await? {
        Outcome::Failed(message) => Err(CliError::DeleteRefused { entity, message }),
        _ => {
            output::status(&format!("Deleted {entity}"), &global.color, global.quiet);
            Ok(())
        }
    }
}
