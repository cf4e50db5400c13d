//! In-process stand-ins for the external transpiler and minifiers.

use anyhow::{Result, anyhow};

use crate::tools::{Minifier, Transpiler};

/// Strips embedded-JavaScript backticks and, unless bare, wraps the result in
/// the same top-level closure `coffee` produces.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeTranspiler;

impl Transpiler for FakeTranspiler {
    fn transpile(&self, source: &str, bare: bool) -> Result<String> {
        let body = source.replace('`', "");
        if bare {
            Ok(body)
        } else {
            Ok(format!("(function() {{\n{body}\n}}).call(this);\n"))
        }
    }
}

/// Collapses all whitespace runs into single spaces.
#[derive(Debug, Default, Clone, Copy)]
pub struct FakeMinifier;

impl Minifier for FakeMinifier {
    fn minify(&self, source: &str) -> Result<String> {
        Ok(source.split_whitespace().collect::<Vec<_>>().join(" "))
    }
}

/// Always fails with a fixed diagnostic.
#[derive(Debug, Clone)]
pub struct FailingTranspiler {
    message: String,
}

impl FailingTranspiler {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Transpiler for FailingTranspiler {
    fn transpile(&self, _source: &str, _bare: bool) -> Result<String> {
        Err(anyhow!("{}", self.message))
    }
}

/// Always fails with a fixed diagnostic.
#[derive(Debug, Clone)]
pub struct FailingMinifier {
    message: String,
}

impl FailingMinifier {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Minifier for FailingMinifier {
    fn minify(&self, _source: &str) -> Result<String> {
        Err(anyhow!("{}", self.message))
    }
}
