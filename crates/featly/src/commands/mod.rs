//! Command dispatch: bridges CLI args -> controller actions -> output.

pub mod config_cmd;
pub mod items;
pub mod util;

use featly_core::{CollectionController, Transport};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a server-bound command to its handler.
pub async fn dispatch<S: Transport>(
    cmd: Command,
    controller: &CollectionController<S>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Items(args) => items::handle(controller, args, global).await,
        // Handled in main before a controller exists.
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
