//! External collaborators of the pipeline.
//!
//! The transpiler and the minifiers are modelled as text-to-text filters
//! behind the [`Transpiler`] and [`Minifier`] traits. Production adapters run
//! the real executables through [`ToolCommand`]; tests substitute in-process
//! implementations.

pub mod coffee;
pub mod command;
pub mod minify;

use anyhow::Result;

pub use coffee::CoffeeTranspiler;
pub use command::{ToolCommand, ToolOutput, diagnostic, locate};
pub use minify::{ClosureMinifier, UglifyMinifier};

/// Turns CoffeeScript into JavaScript.
pub trait Transpiler: Send {
    /// Transpile `source`. `bare` asks the transpiler to omit the top-level
    /// function wrapper; its exact effect is up to the implementation.
    ///
    /// # Errors
    ///
    /// Returns the transpiler's diagnostic when the source is rejected.
    fn transpile(&self, source: &str, bare: bool) -> Result<String>;
}

/// Shrinks JavaScript.
pub trait Minifier: Send {
    /// Minify `source`.
    ///
    /// # Errors
    ///
    /// Returns the minifier's diagnostic when the script is rejected.
    fn minify(&self, source: &str) -> Result<String>;
}
