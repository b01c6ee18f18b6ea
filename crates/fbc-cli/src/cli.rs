//! CLI argument definitions for fbc-filter.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fbc_core::declcfg::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "fbc-filter",
    version,
    about = "Filter a file-based operator catalog",
    long_about = "Prunes a file-based operator catalog down to the packages, channels and \
                  bundle version ranges named in a FilterConfiguration, keeping every \
                  channel's upgrade graph anchored at a single head."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Filter a catalog and print the result
    Filter {
        /// FilterConfiguration file (YAML or JSON)
        #[arg(short, long)]
        config: PathBuf,
        /// Output format: yaml or json
        #[arg(short, long, default_value = "yaml")]
        output: OutputFormat,
        /// Write the filtered catalog to this file instead of stdout
        #[arg(long)]
        output_file: Option<PathBuf>,
        /// Catalog directory or single catalog file
        catalog: PathBuf,
    },

    /// Validate a FilterConfiguration without loading a catalog
    CheckConfig {
        /// FilterConfiguration file (YAML or JSON)
        config: PathBuf,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
