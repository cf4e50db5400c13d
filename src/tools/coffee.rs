//! CoffeeScript transpiler backed by the `coffee` executable.

use anyhow::Result;

use super::Transpiler;
use super::command::ToolCommand;

/// Runs `coffee --stdio --print`, adding `--bare` for bare contexts.
#[derive(Debug, Clone)]
pub struct CoffeeTranspiler {
    program: String,
}

impl CoffeeTranspiler {
    /// Use the given executable name or path.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub(crate) fn command(&self, source: &str, bare: bool) -> ToolCommand {
        let mut command = ToolCommand::new(&self.program).args(["--stdio", "--print"]);
        if bare {
            command = command.arg("--bare");
        }
        command.stdin(source).with_context("transpile")
    }
}

impl Default for CoffeeTranspiler {
    fn default() -> Self {
        Self::new("coffee")
    }
}

impl Transpiler for CoffeeTranspiler {
    fn transpile(&self, source: &str, bare: bool) -> Result<String> {
        Ok(self.command(source, bare).execute()?.stdout)
    }
}
