//! Command-line interface for percolate
//!
//! # Commands
//!
//! - `build` - run the full pipeline for a profile and write the artifact
//! - `check` - run the pipeline without writing anything
//! - `print` - write the pipeline output to stdout
//! - `list` - show the configured output profiles
//!
//! # Global Options
//!
//! - `--verbose` / `-v` - debug logging
//! - `--quiet` / `-q` - errors only
//! - `--config` / `-c` - path to percolate.toml
//!
//! Without `-v` or `-q`, `RUST_LOG` selects the log filter and defaults to
//! `info`. Logs go to stderr so `print` output stays clean.
//!
//! # Examples
//!
//! ```bash
//! percolate list
//! percolate build app
//! percolate print app --depth 0 > stage0.coffee
//! percolate -c site/percolate.toml check admin --var version=2.1
//! ```

pub mod build;
pub mod check;
pub mod common;
pub mod list;
pub mod print;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Main CLI structure for percolate.
#[derive(Parser, Debug)]
#[command(
    name = "percolate",
    about = "Assemble CoffeeScript templates into compiled JavaScript bundles",
    version,
    long_about = "percolate expands {% directive %} includes in CoffeeScript templates, \
                  transpiles the result, runs it through the directive layer again and \
                  optionally minifies it with Closure Compiler or UglifyJS."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to percolate.toml (also read from PERCOLATE_CONFIG)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a profile and write its artifact
    Build(build::BuildCommand),

    /// Check that a profile compiles without writing anything
    Check(check::CheckCommand),

    /// Print a profile's output to stdout
    Print(print::PrintCommand),

    /// List configured output profiles
    List(list::ListCommand),
}

impl Cli {
    /// Execute the selected command.
    ///
    /// # Errors
    ///
    /// Returns the command's error; `main` turns it into a user-facing report.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        let config = self.config.as_deref();
        match self.command {
            Commands::Build(cmd) => cmd.execute(config).await,
            Commands::Check(cmd) => cmd.execute(config).await,
            Commands::Print(cmd) => cmd.execute(config).await,
            Commands::List(cmd) => cmd.execute(config).await,
        }
    }

    /// Log filter implied by the global flags.
    #[must_use]
    pub fn log_filter(&self) -> EnvFilter {
        if self.verbose {
            EnvFilter::new("debug")
        } else if self.quiet {
            EnvFilter::new("error")
        } else {
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
        }
    }

    fn init_logging(&self) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(self.log_filter())
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}
