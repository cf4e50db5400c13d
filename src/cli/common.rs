//! Common utilities for CLI commands

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};

use crate::compile::{CompilationContext, Depth, Session};
use crate::config::{Config, ProfileOverrides};

/// Configuration shared by the commands of one invocation.
#[derive(Debug)]
pub struct CommandContext {
    /// Parsed percolate.toml
    pub config: Config,
    /// Path the configuration was loaded from
    pub config_path: PathBuf,
}

impl CommandContext {
    /// Locate and load the configuration.
    ///
    /// # Errors
    /// Returns an error if no configuration is found or it cannot be parsed
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = Config::locate(explicit)?;
        let config = Config::load_from(&config_path).await?;
        Ok(Self {
            config,
            config_path,
        })
    }

    /// Forge the context for `profile` and run `job` with a fresh session on
    /// the blocking pool. The pipeline shells out to external tools, so it
    /// stays off the async workers.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be forged or `job` fails
    pub async fn run_profile<T, F>(
        &self,
        profile: &str,
        overrides: &ProfileOverrides,
        job: F,
    ) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Session, &mut CompilationContext) -> Result<T> + Send + 'static,
    {
        let mut ctx = self.config.forge(profile, overrides)?;
        let mut session = self.config.session()?;

        tokio::task::spawn_blocking(move || job(&mut session, &mut ctx))
            .await
            .context("Compilation task failed to complete")?
    }
}

/// Profile selection plus per-invocation overrides.
#[derive(Args, Debug, Clone)]
pub struct ProfileArgs {
    /// Output profile from percolate.toml
    pub profile: String,

    /// Stop after stage N (0 raw, 1 transpiled, 2 re-templated, 3 full)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=3))]
    pub depth: Option<u8>,

    /// Minify the output regardless of the profile setting
    #[arg(long, overrides_with = "no_compiled")]
    pub compiled: bool,

    /// Skip minification regardless of the profile setting
    #[arg(long, overrides_with = "compiled")]
    pub no_compiled: bool,

    /// Set a template variable, available as {% var("KEY") %}
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,
}

impl ProfileArgs {
    /// Overrides implied by the flags.
    #[must_use]
    pub fn overrides(&self) -> ProfileOverrides {
        let compiled = if self.compiled {
            Some(true)
        } else if self.no_compiled {
            Some(false)
        } else {
            None
        };

        ProfileOverrides {
            depth: self.depth.map(Depth::from),
            compiled,
            output_dir: None,
            output_file: None,
            vars: self.vars.clone(),
        }
    }
}

/// Parse a `KEY=VALUE` pair.
///
/// # Errors
/// Returns a message when there is no `=` or the key is empty
pub fn parse_var(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{raw}'")),
    }
}
