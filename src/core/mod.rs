//! Core types shared by the compiler, the tool adapters and the CLI.
//!
//! The error system follows a two-layer design:
//! - **Strongly-typed errors** ([`PercolateError`]) for precise handling in code
//! - **User-friendly contexts** ([`ErrorContext`]) with details and suggestions
//!   for CLI users, produced by [`user_friendly_error`]
//!
//! Transpile and minify failures keep the source that was handed to the
//! external tool, and [`source_excerpt`] renders the region a diagnostic
//! points at.

pub mod error;

pub use error::{ErrorContext, PercolateError, source_excerpt, user_friendly_error};
