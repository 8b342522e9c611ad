//! Command dispatch: bridges CLI args -> core lifecycle -> output formatting.

pub mod config_cmd;
pub mod resource;
pub mod resources;
pub mod util;

use soliddns_core::{Reconciler, Transport};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch an appliance-bound command to the appropriate handler.
pub async fn dispatch<T: Transport>(
    cmd: Command,
    reconciler: &Reconciler<T>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Create(args) => resource::create(reconciler, args, global).await,
        Command::Read(args) => resource::read(reconciler, args, global).await,
        Command::Update(args) => resource::update(reconciler, args, global).await,
        Command::Delete(args) => resource::delete(reconciler, args, global).await,
        // Local commands are handled before dispatch
        Command::Resources | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
