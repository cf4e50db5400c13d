//! Writing the final artifact.

use anyhow::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use super::Session;
use super::context::CompilationContext;
use crate::core::PercolateError;
use crate::utils::{atomic_write, checksum};

/// Whether a save created a new artifact or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    /// The destination did not exist
    Create,
    /// The destination was overwritten
    Update,
}

impl fmt::Display for SaveAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
        }
    }
}

/// Outcome of [`Session::save`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStatus {
    pub action: SaveAction,
    pub destination: PathBuf,
    pub bytes: usize,
    /// `sha256:<hex>` of the written artifact
    pub checksum: String,
}

/// Destination for `ctx`, preferring explicit arguments over context fields.
///
/// # Errors
///
/// Returns [`PercolateError::MissingOutputDestination`] naming the first
/// part that is set neither explicitly nor on the context.
pub fn destination(
    ctx: &CompilationContext,
    output_dir: Option<&Path>,
    output_file: Option<&str>,
) -> Result<PathBuf, PercolateError> {
    let dir = output_dir
        .or(ctx.output_dir.as_deref())
        .ok_or(PercolateError::MissingOutputDestination {
            field: "output_dir",
        })?;
    let file = output_file
        .or(ctx.output_file.as_deref())
        .ok_or(PercolateError::MissingOutputDestination {
            field: "output_file",
        })?;
    Ok(dir.join(file))
}

impl Session {
    /// Render `ctx` in full and write the result to its destination.
    ///
    /// The action is decided from whether the destination exists before the
    /// pipeline runs. Nothing is written when any stage fails.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::MissingOutputDestination`] when the
    /// destination cannot be resolved, any pipeline error, or an IO error
    /// from the write.
    pub fn save(
        &mut self,
        ctx: &mut CompilationContext,
        output_dir: Option<&Path>,
        output_file: Option<&str>,
    ) -> Result<SaveStatus> {
        let destination = destination(ctx, output_dir, output_file)?;
        let action = if destination.exists() {
            SaveAction::Update
        } else {
            SaveAction::Create
        };

        let artifact = self.render(ctx)?;
        atomic_write(&destination, artifact.as_bytes())?;
        info!(target: "pipeline", "Saved {} ({} bytes, {})", destination.display(), artifact.len(), action);

        Ok(SaveStatus {
            action,
            destination,
            bytes: artifact.len(),
            checksum: checksum(artifact.as_bytes()),
        })
    }
}
