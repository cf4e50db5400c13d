//! Output profiles and their command line overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::compile::{Compression, Depth};

const fn default_bare() -> bool {
    true
}

/// One `[output.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputProfile {
    /// Template name, resolved under the profile's base directory.
    pub template: String,

    /// Context base directory. Falls back to the global `base_dir`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,

    /// Whether stage 3 runs the minifier.
    #[serde(default)]
    pub compiled: bool,

    /// Passed through to the transpiler.
    #[serde(default = "default_bare")]
    pub bare: bool,

    #[serde(default)]
    pub compression: Compression,

    #[serde(default)]
    pub depth: Depth,

    /// Values for the `var` directive.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub vars: BTreeMap<String, String>,
}

/// Per-invocation adjustments applied on top of a profile.
///
/// Paths here are taken as given, relative to the working directory, unlike
/// the paths in the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileOverrides {
    pub depth: Option<Depth>,
    pub compiled: Option<bool>,
    pub output_dir: Option<PathBuf>,
    pub output_file: Option<String>,
    pub vars: Vec<(String, String)>,
}

impl ProfileOverrides {
    /// Whether any override is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
