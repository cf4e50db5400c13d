//! List the output profiles defined in percolate.toml.

use anyhow::Result;
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::Path;

use super::common::CommandContext;
use crate::compile::{Compression, Depth};
use crate::config::Config;

/// Output format for the list command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Command to show configured profiles.
#[derive(Args, Debug)]
pub struct ListCommand {
    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// One row of the listing, with paths resolved against the config file.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ProfileSummary {
    pub name: String,
    pub template: String,
    pub base_dir: String,
    pub destination: Option<String>,
    pub compiled: bool,
    pub compression: Compression,
    pub depth: Depth,
}

/// Summaries of every profile in `config`, ordered by name.
///
/// # Errors
///
/// Returns an error if a configured path cannot be expanded.
pub fn summarize(config: &Config) -> Result<Vec<ProfileSummary>> {
    let mut rows = Vec::with_capacity(config.output.len());
    for (name, profile) in &config.output {
        let base_dir = match &profile.base_dir {
            Some(dir) => config.resolve_path(dir)?,
            None => config.global_base_dir()?,
        };
        let destination = match (&profile.output_dir, &profile.output_file) {
            (Some(dir), Some(file)) => Some(config.resolve_path(dir)?.join(file).display().to_string()),
            _ => None,
        };

        rows.push(ProfileSummary {
            name: name.clone(),
            template: profile.template.clone(),
            base_dir: base_dir.display().to_string(),
            destination,
            compiled: profile.compiled,
            compression: profile.compression,
            depth: profile.depth,
        });
    }
    Ok(rows)
}

impl ListCommand {
    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub async fn execute(self, config: Option<&Path>) -> Result<()> {
        let context = CommandContext::load(config).await?;
        let rows = summarize(&context.config)?;

        if self.format == OutputFormat::Json {
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if rows.is_empty() {
            println!("No output profiles in {}", context.config_path.display());
            return Ok(());
        }

        println!("{}", format!("Profiles in {}", context.config_path.display()).bold());
        for row in rows {
            let minify = if row.compiled {
                format!("minified with {}", row.compression)
            } else {
                "not minified".to_string()
            };
            println!("  {} {} -> {}", row.name.as_str().cyan(), row.template, row.destination.as_deref().unwrap_or("(no destination)"));
            println!("      base_dir {}, depth {}, {}", row.base_dir, row.depth, minify);
        }
        Ok(())
    }
}
