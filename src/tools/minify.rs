//! Minifier backends: Google Closure Compiler and UglifyJS.
//!
//! Both are interchangeable text filters; which one runs is decided by the
//! context's [`Compression`](crate::compile::Compression) setting.

use anyhow::Result;
use std::path::PathBuf;

use super::Minifier;
use super::command::ToolCommand;

/// Closure Compiler run as `java -jar <compiler.jar>`.
#[derive(Debug, Clone)]
pub struct ClosureMinifier {
    java: String,
    jar: PathBuf,
}

impl ClosureMinifier {
    /// Use `java` to run the compiler jar at `jar`.
    pub fn new(java: impl Into<String>, jar: impl Into<PathBuf>) -> Self {
        Self {
            java: java.into(),
            jar: jar.into(),
        }
    }
}

impl Minifier for ClosureMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let output = ToolCommand::new(&self.java)
            .arg("-jar")
            .arg(self.jar.to_string_lossy())
            .args(["--compilation_level", "SIMPLE_OPTIMIZATIONS", "--warning_level", "QUIET"])
            .stdin(source)
            .with_context("closure")
            .execute()?;
        Ok(output.stdout)
    }
}

/// UglifyJS reading the script from stdin.
#[derive(Debug, Clone)]
pub struct UglifyMinifier {
    program: String,
}

impl UglifyMinifier {
    /// Use the given `uglifyjs` executable name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for UglifyMinifier {
    fn default() -> Self {
        Self::new("uglifyjs")
    }
}

impl Minifier for UglifyMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        let output = ToolCommand::new(&self.program)
            .args(["--compress", "--mangle"])
            .stdin(source)
            .with_context("uglify")
            .execute()?;
        Ok(output.stdout)
    }
}
