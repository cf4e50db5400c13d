//! Run a profile's pipeline without writing anything.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::common::{CommandContext, ProfileArgs};

/// Command to verify that a profile compiles.
#[derive(Args, Debug)]
pub struct CheckCommand {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

impl CheckCommand {
    /// Execute the check.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline failure.
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let context = CommandContext::load(config).await?;
        let output = context
            .run_profile(&self.profile.profile, &self.profile.overrides(), |session, ctx| {
                session.render(ctx)
            })
            .await?;

        println!(
            "{} Profile '{}' compiles ({} bytes)",
            "✓".green(),
            self.profile.profile.as_str().bold(),
            output.len()
        );
        Ok(())
    }
}
