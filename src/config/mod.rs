//! Configuration for percolate
//!
//! Builds are described by a `percolate.toml` file holding the global base
//! directory, the locations of the external tools and any number of named
//! output profiles.
//!
//! # File Location
//!
//! The first match wins:
//!
//! 1. the `--config` command line flag
//! 2. the `PERCOLATE_CONFIG` environment variable
//! 3. `percolate.toml` in the working directory or the nearest parent
//!
//! # Format
//!
//! ```toml
//! # Global base directory for shared categories (mixins, templates, raw, ...)
//! base_dir = "assets/coffee"
//!
//! # External tools; bare names are looked up on PATH
//! coffee_bin = "coffee"
//! java_bin = "java"
//! closure_jar = "~/tools/closure-compiler.jar"
//! uglify_bin = "node_modules/.bin/uglifyjs"
//!
//! [output.app]
//! template = "app"                # resolved under base_dir, .coffee appended
//! base_dir = "assets/app"         # context base directory, defaults to the global one
//! output_dir = "public/js"
//! output_file = "app.js"
//! compiled = true                 # run the minifier (default false)
//! bare = true                     # default true
//! compression = "uglify"          # "closure" (default) or "uglify"
//! depth = 3                       # 0-3, default 3
//!
//! [output.app.vars]
//! version = "1.4.2"               # available as {% var("version") %}
//! ```
//!
//! Paths may use `~` and `$VARIABLES`. Relative paths are resolved against the
//! directory holding the configuration file, so builds do not depend on the
//! working directory.

pub mod profile;
pub mod settings;

pub use profile::{OutputProfile, ProfileOverrides};
pub use settings::Config;
