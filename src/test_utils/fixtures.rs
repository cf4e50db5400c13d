//! Test fixtures for base directory trees and configuration files.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::constants::CONFIG_FILE_NAME;

/// A temporary project directory that is removed when dropped.
///
/// Paths passed to the helpers are relative to the fixture root and use `/`
/// separators.
#[derive(Debug)]
pub struct ProjectFixture {
    root: TempDir,
}

impl ProjectFixture {
    /// Create an empty project directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        Self {
            root: TempDir::new().expect("failed to create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.root.path().join(relative)
    }

    /// Write `content` to `relative`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn write(&self, relative: &str, content: &str) -> PathBuf {
        let path = self.path(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("failed to create parent directories");
        }
        fs::write(&path, content).expect("failed to write fixture file");
        path
    }

    /// Create the directory `relative` and its parents.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    pub fn mkdir(&self, relative: &str) -> PathBuf {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("failed to create fixture directory");
        path
    }

    /// Read `relative` as text.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be read.
    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("failed to read fixture file")
    }
}

impl Default for ProjectFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample `percolate.toml` contents.
#[derive(Clone, Debug)]
pub struct ConfigFixture {
    pub content: String,
    pub name: String,
}

impl ConfigFixture {
    /// Two profiles over `app/` with a global `global/` base directory.
    ///
    /// `app` is compiled with uglify; `debug` stops after re-templating.
    pub fn basic() -> Self {
        Self {
            name: "basic".to_string(),
            content: r#"
base_dir = "global"
coffee_bin = "coffee"
uglify_bin = "uglifyjs"

[output.app]
template = "main"
base_dir = "app"
output_dir = "public/js"
output_file = "app.js"
compiled = true
compression = "uglify"

[output.app.vars]
version = "1.0.0"

[output.debug]
template = "main"
base_dir = "app"
output_dir = "public/js"
output_file = "app.debug.js"
depth = 2
"#
            .trim()
            .to_string(),
        }
    }

    /// A single profile relying on every default.
    pub fn minimal() -> Self {
        Self {
            name: "minimal".to_string(),
            content: r#"
[output.app]
template = "main"
"#
            .trim()
            .to_string(),
        }
    }

    /// Broken TOML.
    pub fn invalid_syntax() -> Self {
        Self {
            name: "invalid_syntax".to_string(),
            content: r#"
[output.app
template = "main"
"#
            .trim()
            .to_string(),
        }
    }

    /// Write the fixture as `percolate.toml` in `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        fs::write(&path, &self.content)
            .with_context(|| format!("Failed to write {} fixture", self.name))?;
        Ok(path)
    }
}
