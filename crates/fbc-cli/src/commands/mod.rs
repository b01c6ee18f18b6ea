//! Command dispatch and handler modules.

mod check_config;
mod filter;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Filter {
            config,
            output,
            output_file,
            catalog,
        } => filter::exec(config, catalog, output, output_file),
        Command::CheckConfig { config } => check_config::exec(&config),
    }
}
