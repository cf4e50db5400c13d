//! Compilation contexts: one in-flight compilation request and its flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Pipeline cutoff stage.
///
/// Depths are totally ordered; anything at or above 3 runs the full pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum Depth {
    /// Stage 0: the loaded and directive-expanded CoffeeScript
    Raw,
    /// Stage 1: transpiled JavaScript
    Transpiled,
    /// Stage 2: transpiled JavaScript re-run through the directive layer
    Retemplated,
    /// Stage 3+: minified when the context is compiled
    #[default]
    Full,
}

impl From<u8> for Depth {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Raw,
            1 => Self::Transpiled,
            2 => Self::Retemplated,
            _ => Self::Full,
        }
    }
}

impl From<Depth> for u8 {
    fn from(value: Depth) -> Self {
        match value {
            Depth::Raw => 0,
            Depth::Transpiled => 1,
            Depth::Retemplated => 2,
            Depth::Full => 3,
        }
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// Minifier backend used by stage 3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Google Closure Compiler
    #[default]
    Closure,
    /// UglifyJS
    Uglify,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closure => write!(f, "closure"),
            Self::Uglify => write!(f, "uglify"),
        }
    }
}

/// State and flags of one compilation request.
///
/// A context is forged by the caller, moved onto the session's stack while
/// its pipeline runs, and handed back afterwards with the rendered output
/// cached. Rendering a context that already carries output returns the cache.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationContext {
    /// Directory holding the template and the context-local categories
    pub base_dir: PathBuf,
    /// Template name, relative to `base_dir` or a literal path
    pub template: String,
    /// Pipeline cutoff
    pub depth: Depth,
    /// Passed through to the transpiler to suppress the top-level wrapper
    pub bare: bool,
    /// Whether stage 3 runs the minifier
    pub compiled: bool,
    /// Minifier backend used when `compiled` is set
    pub compression: Compression,
    /// Default output directory for [`Session::save`](super::Session::save)
    pub output_dir: Option<PathBuf>,
    /// Default output file name for [`Session::save`](super::Session::save)
    pub output_file: Option<String>,
    /// Values available to the `var` directive
    pub vars: BTreeMap<String, String>,
    rendered: Option<String>,
}

impl CompilationContext {
    /// Forge a context for `template` under `base_dir` with default flags:
    /// bare output, not compiled, full depth, Closure compression.
    pub fn forge(base_dir: impl Into<PathBuf>, template: impl Into<String>) -> Self {
        Self {
            base_dir: base_dir.into(),
            template: template.into(),
            bare: true,
            ..Self::default()
        }
    }

    /// Set whether the transpiler omits the top-level closure wrapper.
    #[must_use]
    pub fn bare(mut self, bare: bool) -> Self {
        self.bare = bare;
        self
    }

    /// Set whether stage 3 minifies the output.
    #[must_use]
    pub fn compiled(mut self, compiled: bool) -> Self {
        self.compiled = compiled;
        self
    }

    /// Set the pipeline cutoff.
    #[must_use]
    pub fn depth(mut self, depth: impl Into<Depth>) -> Self {
        self.depth = depth.into();
        self
    }

    /// Select the minifier backend.
    #[must_use]
    pub fn compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set the default output directory.
    #[must_use]
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Set the default output file name.
    #[must_use]
    pub fn output_file(mut self, file: impl Into<String>) -> Self {
        self.output_file = Some(file.into());
        self
    }

    /// Define a variable for the `var` directive.
    #[must_use]
    pub fn set_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Output cached by a previous render, if any.
    pub fn rendered(&self) -> Option<&str> {
        self.rendered.as_deref()
    }

    pub(crate) fn cache_rendered(&mut self, output: String) {
        self.rendered = Some(output);
    }

    /// Forge the nested context that re-templates stage-1 output stored at `path`.
    pub(crate) fn nested_at(&self, path: &Path) -> Self {
        Self {
            base_dir: self.base_dir.clone(),
            template: path.to_string_lossy().into_owned(),
            depth: Depth::Raw,
            bare: self.bare,
            compiled: false,
            compression: self.compression,
            output_dir: None,
            output_file: None,
            vars: self.vars.clone(),
            rendered: None,
        }
    }
}
