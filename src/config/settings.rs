//! Loading `percolate.toml` and turning profiles into compilation contexts.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use super::profile::{OutputProfile, ProfileOverrides};
use crate::compile::{CompilationContext, Compression, Session};
use crate::constants::{CONFIG_ENV_VAR, CONFIG_FILE_NAME};
use crate::core::PercolateError;
use crate::tools::{ClosureMinifier, CoffeeTranspiler, UglifyMinifier};
use crate::utils::{closest_match, find_upwards};

fn default_coffee_bin() -> String {
    "coffee".to_string()
}

fn default_java_bin() -> String {
    "java".to_string()
}

fn default_uglify_bin() -> String {
    "uglifyjs".to_string()
}

/// Parsed `percolate.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Global base directory consulted after each profile's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    #[serde(default = "default_coffee_bin")]
    pub coffee_bin: String,

    #[serde(default = "default_java_bin")]
    pub java_bin: String,

    /// Closure Compiler jar. Without it the `closure` backend is unavailable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub closure_jar: Option<PathBuf>,

    #[serde(default = "default_uglify_bin")]
    pub uglify_bin: String,

    /// Output profiles keyed by name.
    #[serde(default)]
    pub output: BTreeMap<String, OutputProfile>,

    /// Directory relative paths are resolved against.
    #[serde(skip)]
    root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: None,
            coffee_bin: default_coffee_bin(),
            java_bin: default_java_bin(),
            closure_jar: None,
            uglify_bin: default_uglify_bin(),
            output: BTreeMap::new(),
            root: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Locate and load the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::ConfigNotFound`] when no file is found, or
    /// an error if the file cannot be read or parsed.
    pub async fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::locate(explicit)?;
        Self::load_from(&path).await
    }

    /// Load the configuration at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.root = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        debug!("Loaded {} output profiles from {}", config.output.len(), path.display());

        Ok(config)
    }

    /// Find the configuration file using the flag, the environment and the
    /// working directory, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::ConfigNotFound`] when nothing is found.
    pub fn locate(explicit: Option<&Path>) -> Result<PathBuf> {
        let env = std::env::var_os(CONFIG_ENV_VAR);
        let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
        Ok(Self::locate_from(explicit, env.as_deref(), &cwd)?)
    }

    /// [`Config::locate`] with the environment and working directory passed in.
    ///
    /// An explicit path or environment value must name an existing file; the
    /// upward search is only used when neither is given.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::ConfigError`] for an explicit path that does
    /// not exist and [`PercolateError::ConfigNotFound`] when the search fails.
    pub fn locate_from(
        explicit: Option<&Path>,
        env: Option<&OsStr>,
        start: &Path,
    ) -> Result<PathBuf, PercolateError> {
        let given = explicit.map(Path::to_path_buf).or_else(|| {
            env.filter(|value| !value.is_empty()).map(PathBuf::from)
        });

        if let Some(path) = given {
            if path.is_file() {
                return Ok(path);
            }
            return Err(PercolateError::ConfigError {
                message: format!("{} does not exist", path.display()),
            });
        }

        find_upwards(start, CONFIG_FILE_NAME).ok_or(PercolateError::ConfigNotFound)
    }

    /// Directory holding the configuration file.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The profile called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::ProfileNotFound`], with the closest
    /// configured name as a suggestion, when there is no such profile.
    pub fn profile(&self, name: &str) -> Result<&OutputProfile, PercolateError> {
        self.output.get(name).ok_or_else(|| PercolateError::ProfileNotFound {
            name: name.to_string(),
            suggestion: closest_match(name, self.output.keys().map(String::as_str)),
        })
    }

    /// Expand `~` and `$VARS` in `path` and anchor it at the config directory.
    ///
    /// # Errors
    ///
    /// Returns [`PercolateError::ConfigError`] when a referenced variable is
    /// not set.
    pub fn resolve_path(&self, path: &Path) -> Result<PathBuf, PercolateError> {
        let raw = path.to_string_lossy();
        let expanded = shellexpand::full(&raw).map_err(|e| PercolateError::ConfigError {
            message: format!("Failed to expand '{raw}': {e}"),
        })?;

        let expanded = PathBuf::from(expanded.into_owned());
        if expanded.is_absolute() {
            Ok(expanded)
        } else {
            Ok(self.root.join(expanded))
        }
    }

    /// Executable setting: names are looked up on PATH, anything with a
    /// separator is a path relative to the config directory.
    fn resolve_program(&self, program: &str) -> Result<String, PercolateError> {
        if Path::new(program).components().count() > 1 {
            Ok(self.resolve_path(Path::new(program))?.to_string_lossy().into_owned())
        } else {
            Ok(program.to_string())
        }
    }

    /// The global base directory, defaulting to the config directory.
    ///
    /// # Errors
    ///
    /// Fails when the configured path cannot be expanded.
    pub fn global_base_dir(&self) -> Result<PathBuf, PercolateError> {
        match &self.base_dir {
            Some(dir) => self.resolve_path(dir),
            None => Ok(self.root.clone()),
        }
    }

    /// Forge the context for profile `name` with `overrides` applied.
    ///
    /// # Errors
    ///
    /// Fails when the profile does not exist or one of its paths cannot be
    /// expanded.
    pub fn forge(&self, name: &str, overrides: &ProfileOverrides) -> Result<CompilationContext> {
        let profile = self.profile(name)?;

        let base_dir = match &profile.base_dir {
            Some(dir) => self.resolve_path(dir)?,
            None => self.global_base_dir()?,
        };

        let mut ctx = CompilationContext::forge(base_dir, profile.template.clone())
            .bare(profile.bare)
            .compiled(overrides.compiled.unwrap_or(profile.compiled))
            .depth(overrides.depth.unwrap_or(profile.depth))
            .compression(profile.compression);

        if let Some(dir) = &overrides.output_dir {
            ctx = ctx.output_dir(dir.clone());
        } else if let Some(dir) = &profile.output_dir {
            ctx = ctx.output_dir(self.resolve_path(dir)?);
        }

        if let Some(file) = overrides.output_file.as_ref().or(profile.output_file.as_ref()) {
            ctx = ctx.output_file(file.clone());
        }

        for (key, value) in profile.vars.iter().chain(overrides.vars.iter().map(|(k, v)| (k, v))) {
            ctx = ctx.set_var(key.clone(), value.clone());
        }

        debug!(
            "Forged profile '{}': template {} in {} (depth {}, compiled {})",
            name,
            ctx.template,
            ctx.base_dir.display(),
            ctx.depth,
            ctx.compiled
        );
        Ok(ctx)
    }

    /// Start a session wired to the configured tools.
    ///
    /// The Closure backend is registered only when `closure_jar` is set.
    ///
    /// # Errors
    ///
    /// Fails when a configured path cannot be expanded or the global base
    /// directory cannot be listed.
    pub fn session(&self) -> Result<Session> {
        let transpiler = CoffeeTranspiler::new(self.resolve_program(&self.coffee_bin)?);
        let mut session = Session::new(self.global_base_dir()?, transpiler)?
            .with_minifier(Compression::Uglify, UglifyMinifier::new(self.resolve_program(&self.uglify_bin)?));

        if let Some(jar) = &self.closure_jar {
            let minifier = ClosureMinifier::new(self.resolve_program(&self.java_bin)?, self.resolve_path(jar)?);
            session = session.with_minifier(Compression::Closure, minifier);
        }

        Ok(session)
    }
}
