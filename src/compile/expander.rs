//! Expansion of `*` directory patterns into concrete names.
//!
//! A pattern such as `helpers/*` lists `<base>/<category>/helpers/`
//! recursively. The listing is turned into a [`KeyNode`] tree and flattened
//! with [`collapse`], so `helpers/dom/events.coffee` comes out as
//! `helpers/dom/events.coffee`. Names keep their file extension and therefore
//! resolve as-is.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use super::Session;
use super::collapse::{Key, KeyNode, collapse};
use crate::constants::WILDCARD_MARKER;

/// Whether `name` is a directory pattern rather than a single name.
#[must_use]
pub fn is_wildcard(name: &str) -> bool {
    name.ends_with(WILDCARD_MARKER)
}

pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// Build the key tree for everything below `dir`.
///
/// Directories become named groups keyed `name/`; files become indexed
/// leaves whose value is the file name. Symlinks are followed, so a linked
/// directory is listed like a real one. Hidden entries and files without an
/// extension are skipped, and siblings are ordered by name.
///
/// # Errors
///
/// Returns an error if any directory below `dir` cannot be read or a
/// symlink loop is found.
pub fn scan_directory(dir: &Path) -> Result<Vec<KeyNode>> {
    // Partially built groups, innermost last. Index 0 is the root listing.
    let mut open: Vec<(Option<String>, Vec<KeyNode>)> = vec![(None, Vec::new())];

    let walker = WalkDir::new(dir)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_hidden(entry));

    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;

        // Close groups the walk has left.
        while open.len() > entry.depth() {
            close_group(&mut open);
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type().is_dir() {
            open.push((Some(format!("{name}/")), Vec::new()));
        } else if entry.path().extension().is_none() {
            // `LICENSE`, `Makefile` and the like never resolve as fragments
            debug!(target: "resolver", "Skipping {} without extension", entry.path().display());
        } else if let Some((_, siblings)) = open.last_mut() {
            let index = siblings.len();
            siblings.push(KeyNode::leaf(index, name));
        }
    }

    while open.len() > 1 {
        close_group(&mut open);
    }

    Ok(open.pop().map(|(_, nodes)| nodes).unwrap_or_default())
}

fn close_group(open: &mut Vec<(Option<String>, Vec<KeyNode>)>) {
    if let Some((Some(key), children)) = open.pop() {
        if let Some((_, parent)) = open.last_mut() {
            parent.push(KeyNode::group(Key::Named(key), children));
        }
    }
}

impl Session {
    /// Expand `pattern` within `category` of the current context.
    ///
    /// The prefix before `*` names a directory relative to the category
    /// directory; every file below it is returned, prefixed by that
    /// directory. A missing or empty directory yields no names.
    ///
    /// # Errors
    ///
    /// Fails when no context is active or the directory cannot be listed.
    pub fn expand_star(&self, pattern: &str, category: &str) -> Result<Vec<String>> {
        let ctx = self.stack.current()?;
        let prefix = pattern.strip_suffix(WILDCARD_MARKER).unwrap_or(pattern);
        let dir = ctx.base_dir.join(category).join(prefix);

        if !dir.is_dir() {
            debug!(target: "resolver", "Pattern '{}' matches no directory in '{}'", pattern, category);
            return Ok(Vec::new());
        }

        let names = collapse(&scan_directory(&dir)?);
        let lead = if prefix.is_empty() || prefix.ends_with('/') {
            prefix.to_string()
        } else {
            format!("{prefix}/")
        };

        debug!(target: "resolver", "Pattern '{}' expanded to {} names", pattern, names.len());
        Ok(names.into_iter().map(|name| format!("{lead}{name}")).collect())
    }

    /// Replace every pattern in `names` with its expansion, keeping order.
    pub(crate) fn flatten_names(&self, names: &[String], category: &str) -> Result<Vec<String>> {
        let mut flat = Vec::with_capacity(names.len());
        for name in names {
            if is_wildcard(name) {
                flat.extend(self.expand_star(name, category)?);
            } else {
                flat.push(name.clone());
            }
        }
        Ok(flat)
    }
}
