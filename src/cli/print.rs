//! Write a profile's output to stdout, typically at a reduced depth.

use anyhow::{Context, Result};
use clap::Args;
use std::io::Write;
use std::path::Path;

use super::common::{CommandContext, ProfileArgs};

/// Command to print the pipeline output instead of saving it.
#[derive(Args, Debug)]
pub struct PrintCommand {
    #[command(flatten)]
    pub profile: ProfileArgs,
}

impl PrintCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline failure or an error writing to stdout.
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let context = CommandContext::load(config).await?;
        let output = context
            .run_profile(&self.profile.profile, &self.profile.overrides(), |session, ctx| {
                session.render(ctx)
            })
            .await?;

        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes()).context("Failed to write to stdout")?;
        if !output.ends_with('\n') {
            writeln!(stdout).context("Failed to write to stdout")?;
        }
        Ok(())
    }
}
