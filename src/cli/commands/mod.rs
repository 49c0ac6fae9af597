//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Loads configuration and applies flag overrides
//! 2. Calls into the library to do the work
//! 3. Formats and displays output

mod completion;
mod config_cmd;
mod run;

// Re-export command functions for testing and direct invocation
pub use completion::completion;
pub use config_cmd::show as config_show;
pub use run::{run, RunOverrides};

use crate::cli::args::Command;
use crate::cli::Context;
use anyhow::Result;

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Run {
            script,
            bufsize,
            error_limit,
            echo,
            json,
        } => run::run(
            ctx,
            script.as_deref(),
            RunOverrides {
                bufsize,
                error_limit,
                echo,
            },
            json,
        ),
        Command::Config => config_cmd::show(ctx),
        Command::Completion { shell } => completion::completion(shell),
    }
}
