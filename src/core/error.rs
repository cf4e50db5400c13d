//! Error handling for percolate
//!
//! This module provides the error types and user-facing error reporting used by
//! the compiler and the CLI. The design has two layers:
//! 1. [`PercolateError`] - strongly-typed failure modes for precise handling in code
//! 2. [`ErrorContext`] - a display wrapper adding details and an actionable suggestion
//!
//! # Error Categories
//!
//! - **Resolution**: [`PercolateError::ResolutionFailed`], [`PercolateError::UnknownCategory`]
//! - **External tools**: [`PercolateError::TranspileFailed`], [`PercolateError::MinifyFailed`],
//!   [`PercolateError::ToolNotFound`], [`PercolateError::ToolCommandFailed`]
//! - **Configuration**: [`PercolateError::MissingOutputDestination`],
//!   [`PercolateError::ProfileNotFound`], [`PercolateError::ConfigNotFound`]
//! - **Directives**: [`PercolateError::DirectiveSyntax`], [`PercolateError::RawScriptNotRegistered`],
//!   [`PercolateError::UnknownVariable`]
//! - **Internal**: [`PercolateError::StackEmpty`]
//!
//! Every error is fatal to the pipeline invocation that raised it. Nothing is
//! retried and no partial artifact is written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use percolate::core::{PercolateError, user_friendly_error};
//!
//! let error = PercolateError::RawScriptNotRegistered {
//!     name: "analytics".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // colored error, details and suggestion on stderr
//! ```

use colored::Colorize;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

use crate::compile::Compression;

/// Number of source lines shown on each side of a reported error line.
const EXCERPT_RADIUS: usize = 3;

/// Maximum number of lines shown when the error line is unknown.
const EXCERPT_HEAD: usize = 20;

static LINE_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r":(\d+):(\d+)").expect("line reference pattern is valid")
});

/// The main error type for percolate operations.
///
/// Transpile and minify failures carry the source text that was handed to the
/// external tool so the caller can render the offending region next to the
/// diagnostic.
#[derive(Error, Debug)]
pub enum PercolateError {
    /// A fragment could not be found under any search root.
    #[error("Path not resolved: '{name}'{}", .category.as_deref().map(|c| format!(" in category '{c}'")).unwrap_or_default())]
    ResolutionFailed {
        /// Logical name that was looked up
        name: String,
        /// Category directory the lookup was scoped to, if any
        category: Option<String>,
    },

    /// The transpiler rejected the assembled source.
    #[error("CoffeeScript compilation failed: {message}")]
    TranspileFailed {
        /// Diagnostic reported by the transpiler
        message: String,
        /// Stage-0 source handed to the transpiler
        source_text: String,
    },

    /// The minifier backend rejected the re-templated script.
    #[error("Minification with {backend} failed: {message}")]
    MinifyFailed {
        /// Backend that was selected for the context
        backend: Compression,
        /// Diagnostic reported by the minifier
        message: String,
        /// Script handed to the minifier
        source_text: String,
    },

    /// The output directory or file name could not be resolved for a save.
    #[error("Output destination is not configured: missing {field}")]
    MissingOutputDestination {
        /// Either `output_dir` or `output_file`
        field: &'static str,
    },

    /// A raw script marker referenced a name that was never registered.
    #[error("Raw script '{name}' was never registered")]
    RawScriptNotRegistered {
        /// Name used in the marker
        name: String,
    },

    /// `current()` or `pop()` was called on an empty context stack.
    #[error("No compilation context is active")]
    StackEmpty,

    /// A directive named a category that has no directory under any base directory.
    #[error("Error finding directive/directory '{name}'")]
    UnknownCategory {
        /// Directive name as written in the template
        name: String,
        /// Closest known category, if one is similar enough
        suggestion: Option<String>,
    },

    /// A directive could not be parsed.
    #[error("Invalid directive '{directive}': {reason}")]
    DirectiveSyntax {
        /// Directive text as written in the template
        directive: String,
        /// What was wrong with it
        reason: String,
    },

    /// `var("name")` referenced a variable the context does not define.
    #[error("Template variable '{name}' is not defined")]
    UnknownVariable {
        /// Variable name
        name: String,
    },

    /// The requested output profile is not in the configuration.
    #[error("Output profile '{name}' is not configured")]
    ProfileNotFound {
        /// Requested profile name
        name: String,
        /// Closest configured profile, if one is similar enough
        suggestion: Option<String>,
    },

    /// No configuration file could be located.
    #[error("Configuration file percolate.toml not found in current directory or any parent directory")]
    ConfigNotFound,

    /// Generic configuration problem.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// An external executable could not be located.
    #[error("Tool '{tool}' was not found")]
    ToolNotFound {
        /// Executable name or path
        tool: String,
    },

    /// An external executable exited unsuccessfully.
    #[error("Tool '{tool}' exited with {status}")]
    ToolCommandFailed {
        /// Executable name or path
        tool: String,
        /// Exit status description
        status: String,
        /// Captured standard error (or standard output when stderr was empty)
        stderr: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Error message
        message: String,
    },
}

impl Clone for PercolateError {
    fn clone(&self) -> Self {
        match self {
            Self::ResolutionFailed {
                name,
                category,
            } => Self::ResolutionFailed {
                name: name.clone(),
                category: category.clone(),
            },
            Self::TranspileFailed {
                message,
                source_text,
            } => Self::TranspileFailed {
                message: message.clone(),
                source_text: source_text.clone(),
            },
            Self::MinifyFailed {
                backend,
                message,
                source_text,
            } => Self::MinifyFailed {
                backend: *backend,
                message: message.clone(),
                source_text: source_text.clone(),
            },
            Self::MissingOutputDestination {
                field,
            } => Self::MissingOutputDestination {
                field: *field,
            },
            Self::RawScriptNotRegistered {
                name,
            } => Self::RawScriptNotRegistered {
                name: name.clone(),
            },
            Self::StackEmpty => Self::StackEmpty,
            Self::UnknownCategory {
                name,
                suggestion,
            } => Self::UnknownCategory {
                name: name.clone(),
                suggestion: suggestion.clone(),
            },
            Self::DirectiveSyntax {
                directive,
                reason,
            } => Self::DirectiveSyntax {
                directive: directive.clone(),
                reason: reason.clone(),
            },
            Self::UnknownVariable {
                name,
            } => Self::UnknownVariable {
                name: name.clone(),
            },
            Self::ProfileNotFound {
                name,
                suggestion,
            } => Self::ProfileNotFound {
                name: name.clone(),
                suggestion: suggestion.clone(),
            },
            Self::ConfigNotFound => Self::ConfigNotFound,
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ToolNotFound {
                tool,
            } => Self::ToolNotFound {
                tool: tool.clone(),
            },
            Self::ToolCommandFailed {
                tool,
                status,
                stderr,
            } => Self::ToolCommandFailed {
                tool: tool.clone(),
                status: status.clone(),
                stderr: stderr.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// When displayed, errors show:
/// 1. **Error**: The main error message in red
/// 2. **Details**: Additional context in yellow (optional), such as the
///    offending source excerpt of a failed transpile
/// 3. **Suggestion**: Actionable steps in green (optional)
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: PercolateError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: PercolateError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`PercolateError`] variants anywhere in the error chain, IO
/// errors and TOML errors; anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(percolate_error) = error.chain().find_map(|e| e.downcast_ref::<PercolateError>())
    {
        return create_error_context(percolate_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(PercolateError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check the permissions of the base and output directories");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(PercolateError::Other {
                    message: error.to_string(),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(PercolateError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax in percolate.toml");
    }

    let mut message = error.to_string();
    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(PercolateError::Other {
        message,
    })
}

fn create_error_context(error: PercolateError) -> ErrorContext {
    match &error {
        PercolateError::ResolutionFailed { name, category } => {
            let suggestion = match category {
                Some(category) => format!(
                    "Create '{category}/{name}' under the profile base_dir or the global base_dir"
                ),
                None => format!("Check that '{name}' exists relative to the profile base_dir"),
            };
            ErrorContext::new(error.clone())
                .with_suggestion(suggestion)
                .with_details("Names are looked up under the profile base_dir, then the global base_dir, then as a literal path")
        }

        PercolateError::TranspileFailed { message, source_text } => {
            let details = source_excerpt(source_text, message);
            ErrorContext::new(error.clone())
                .with_details(details)
                .with_suggestion("Fix the CoffeeScript syntax in the template or in the fragment it includes")
        }

        PercolateError::MinifyFailed { message, source_text, .. } => {
            let details = source_excerpt(source_text, message);
            ErrorContext::new(error.clone())
                .with_details(details)
                .with_suggestion("Build with --depth 2 to inspect the script handed to the minifier")
        }

        PercolateError::MissingOutputDestination { field } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Set {field} on the output profile in percolate.toml or pass --{} on the command line",
                field.replace('_', "-")
            )),

        PercolateError::RawScriptNotRegistered { name } => ErrorContext::new(error.clone())
            .with_suggestion(format!("Include the script with {{% raw(\"{name}\") %}} before it is referenced")),

        PercolateError::UnknownCategory { suggestion, .. } => {
            let ctx = ErrorContext::new(error.clone()).with_details(
                "Directive names map to directories under the base directory, plus the built-ins raw_dump and var",
            );
            match suggestion {
                Some(s) => ctx.with_suggestion(format!("Did you mean '{s}'?")),
                None => ctx,
            }
        }

        PercolateError::ProfileNotFound { suggestion, .. } => {
            let ctx = ErrorContext::new(error.clone());
            match suggestion {
                Some(s) => ctx.with_suggestion(format!("Did you mean '{s}'? Run 'percolate list' to see all profiles")),
                None => ctx.with_suggestion("Run 'percolate list' to see configured profiles"),
            }
        }

        PercolateError::ConfigNotFound => ErrorContext::new(error.clone())
            .with_suggestion("Create percolate.toml in your project, pass --config, or set PERCOLATE_CONFIG"),

        PercolateError::ToolNotFound { tool } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Install '{tool}' or point the configuration at it (coffee_bin, java_bin, closure_jar, uglify_bin)"
            )),

        PercolateError::ToolCommandFailed { stderr, .. } if !stderr.is_empty() => {
            ErrorContext::new(error.clone()).with_details(stderr.trim().to_string())
        }

        _ => ErrorContext::new(error.clone()),
    }
}

/// Render the region of `source` that a diagnostic points at, with line numbers.
///
/// Diagnostics of the form `[stdin]:12:5: error: ...` select a window of lines
/// around line 12; otherwise the head of the source is shown.
#[must_use]
pub fn source_excerpt(source: &str, message: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    if lines.is_empty() {
        return message.to_string();
    }

    let error_line = LINE_REFERENCE
        .captures(message)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<usize>().ok())
        .filter(|line| *line >= 1 && *line <= lines.len());

    let (start, end) = match error_line {
        Some(line) => (
            line.saturating_sub(EXCERPT_RADIUS + 1),
            (line + EXCERPT_RADIUS).min(lines.len()),
        ),
        None => (0, EXCERPT_HEAD.min(lines.len())),
    };

    let width = end.to_string().len();
    let mut excerpt = format!("{message}\n");
    for (idx, line) in lines[start..end].iter().enumerate() {
        let number = start + idx + 1;
        let marker = if Some(number) == error_line { ">" } else { " " };
        excerpt.push_str(&format!("\n{marker} {number:>width$} | {line}"));
    }
    excerpt
}
