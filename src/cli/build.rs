//! Build an output profile and write the artifact.
//!
//! ```bash
//! # Build with the profile's own settings
//! percolate build app
//!
//! # Unminified build into a scratch directory
//! percolate build app --no-compiled --output-dir /tmp/js
//! ```

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use super::common::{CommandContext, ProfileArgs};
use crate::compile::SaveAction;

/// Command to run the full pipeline for a profile and save the result.
#[derive(Args, Debug)]
pub struct BuildCommand {
    #[command(flatten)]
    pub profile: ProfileArgs,

    /// Write into this directory instead of the profile's output_dir
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Write to this file name instead of the profile's output_file
    #[arg(long, value_name = "NAME")]
    pub output_file: Option<String>,
}

impl BuildCommand {
    /// Execute the build using the configuration found from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded, the pipeline
    /// fails or the artifact cannot be written.
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let context = CommandContext::load(config).await?;

        let mut overrides = self.profile.overrides();
        overrides.output_dir = self.output_dir;
        overrides.output_file = self.output_file;

        let status = context
            .run_profile(&self.profile.profile, &overrides, |session, ctx| {
                session.save(ctx, None, None)
            })
            .await?;

        let action = match status.action {
            SaveAction::Create => "Created".green(),
            SaveAction::Update => "Updated".yellow(),
        };
        println!(
            "{} {} {} ({} bytes)",
            "✓".green(),
            action,
            status.destination.display(),
            status.bytes
        );
        Ok(())
    }
}
