//! Builder for running external tools over text.
//!
//! The transpiler and both minifiers are separate executables that read a
//! script on stdin and print the result on stdout. [`ToolCommand`] runs one
//! to completion, logs the invocation under the `tool` tracing target and maps
//! a non-zero exit into [`PercolateError::ToolCommandFailed`].

use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::core::PercolateError;

/// A single external tool invocation.
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    stdin: Option<String>,
    context: Option<String>,
}

/// Captured output of a successful invocation.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Standard output
    pub stdout: String,
    /// Standard error, which some tools use for warnings
    pub stderr: String,
}

impl ToolCommand {
    /// Create a command for `program`, either a bare name looked up on `PATH`
    /// or a path to an executable.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
            context: None,
        }
    }

    /// Add a single argument.
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add several arguments.
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Text written to the tool's standard input.
    #[must_use]
    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    /// Label included in log lines, e.g. the profile being built.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Run the tool to completion.
    ///
    /// # Errors
    ///
    /// - [`PercolateError::ToolNotFound`] if the executable cannot be located
    /// - [`PercolateError::ToolCommandFailed`] if it exits unsuccessfully
    /// - IO errors while spawning or talking to the process
    pub fn execute(self) -> Result<ToolOutput> {
        let executable = locate(&self.program)?;
        let label = self.context.as_deref().unwrap_or("-");

        tracing::debug!(
            target: "tool",
            "({}) Executing command: {} {}",
            label,
            executable.display(),
            self.args.join(" ")
        );

        let mut child = Command::new(&executable)
            .args(&self.args)
            .stdin(if self.stdin.is_some() { Stdio::piped() } else { Stdio::null() })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to spawn {}", executable.display()))?;

        // Feed stdin from a helper thread so a tool that streams output while
        // still reading input cannot fill the stdout pipe and stall.
        let writer = match (self.stdin, child.stdin.take()) {
            (Some(input), Some(mut pipe)) => Some(std::thread::spawn(move || {
                pipe.write_all(input.as_bytes())
            })),
            _ => None,
        };

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {}", executable.display()))?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // A tool that exits early closes its stdin; its exit status says why.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => {
                    return Err(e).with_context(|| {
                        format!("Failed to write input to {}", executable.display())
                    });
                }
                Err(_) => anyhow::bail!("Input writer for {} panicked", executable.display()),
            }
        }

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!(
                target: "tool",
                "({}) Command failed with exit code: {:?}",
                label,
                output.status.code()
            );
            let diagnostic = if stderr.trim().is_empty() { stdout } else { stderr };
            return Err(PercolateError::ToolCommandFailed {
                tool: self.program,
                status: output.status.to_string(),
                stderr: diagnostic,
            }
            .into());
        }

        if !stderr.trim().is_empty() {
            tracing::debug!(target: "tool", "({}) {}", label, stderr.trim());
        }

        tracing::trace!(target: "tool", "({}) produced {} bytes", label, stdout.len());

        Ok(ToolOutput {
            stdout,
            stderr,
        })
    }
}

/// Resolve `program` to an executable path.
///
/// Names containing a path separator are taken literally; bare names are
/// searched on `PATH`.
///
/// # Errors
///
/// Returns [`PercolateError::ToolNotFound`] when nothing matches.
pub fn locate(program: &str) -> Result<PathBuf, PercolateError> {
    let path = Path::new(program);
    if path.components().count() > 1 {
        return if path.is_file() {
            Ok(path.to_path_buf())
        } else {
            Err(PercolateError::ToolNotFound {
                tool: program.to_string(),
            })
        };
    }

    which::which(program).map_err(|_| PercolateError::ToolNotFound {
        tool: program.to_string(),
    })
}

/// Extract the diagnostic text from a tool failure.
///
/// Prefers the tool's own stderr over the wrapper message so the caller sees
/// what the transpiler or minifier actually reported.
#[must_use]
pub fn diagnostic(error: &anyhow::Error) -> String {
    match error.downcast_ref::<PercolateError>() {
        Some(PercolateError::ToolCommandFailed { stderr, .. }) if !stderr.trim().is_empty() => {
            stderr.trim().to_string()
        }
        _ => format!("{error:#}"),
    }
}
