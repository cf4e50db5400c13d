//! Name resolution across the ordered search roots.
//!
//! A name in a category is looked up under the current context's base
//! directory, then under the global base directory, and finally as a literal
//! path. The first existing file wins.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

use super::Session;
use crate::core::PercolateError;
use crate::utils::read_text_file;

/// Append `ext` unless `name` already contains a literal `.`.
#[must_use]
pub fn with_default_extension(name: &str, ext: &str) -> String {
    if name.contains('.') {
        name.to_string()
    } else {
        format!("{name}{ext}")
    }
}

/// Replace tabs with two spaces so output is byte-reproducible.
#[must_use]
pub fn normalize(source: &str) -> String {
    source.replace('\t', "  ")
}

impl Session {
    /// Resolve `name` and return its processed content.
    ///
    /// The file's own directives are expanded against the current context
    /// before the content is normalized.
    ///
    /// # Errors
    ///
    /// - [`PercolateError::ResolutionFailed`] when no search root has the file
    /// - [`PercolateError::StackEmpty`] when no context is active
    /// - any error raised while expanding the file's directives
    pub fn resolve(&mut self, name: &str, category: Option<&str>, default_ext: &str) -> Result<String> {
        let path = self.locate(name, category, default_ext)?;
        self.process_file(&path)
    }

    /// Find the file `name` refers to without reading it.
    ///
    /// # Errors
    ///
    /// Same resolution failures as [`Session::resolve`].
    pub fn locate(
        &self,
        name: &str,
        category: Option<&str>,
        default_ext: &str,
    ) -> Result<PathBuf, PercolateError> {
        let ctx = self.stack.current()?;
        let file = with_default_extension(name, default_ext);

        if let Some(category) = category {
            for root in [ctx.base_dir.as_path(), self.global_base_dir.as_path()] {
                let candidate = root.join(category).join(&file);
                trace!(target: "resolver", "Trying {}", candidate.display());
                if candidate.is_file() {
                    debug!(target: "resolver", "Resolved '{}' to {}", name, candidate.display());
                    return Ok(candidate);
                }
            }
        }

        let literal = Path::new(name);
        if literal.is_file() {
            debug!(target: "resolver", "Resolved '{}' as a literal path", name);
            return Ok(literal.to_path_buf());
        }

        Err(PercolateError::ResolutionFailed {
            name: name.to_string(),
            category: category.map(str::to_string),
        })
    }

    /// Read `path`, expand its directives and normalize the result.
    pub(crate) fn process_file(&mut self, path: &Path) -> Result<String> {
        let source = read_text_file(path)?;
        let expanded = self
            .expand_directives(&source)
            .with_context(|| format!("Failed to process {}", path.display()))?;
        Ok(normalize(&expanded))
    }
}
