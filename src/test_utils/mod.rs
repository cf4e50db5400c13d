//! Test utilities for percolate
//!
//! Helpers shared by unit tests and the integration suite (through the
//! `test-utils` feature):
//! - [`ProjectFixture`] for laying out base directories on disk
//! - in-process [`Transpiler`](crate::tools::Transpiler) and
//!   [`Minifier`](crate::tools::Minifier) stand-ins
//! - one-time tracing setup for tests
//!
//! # Example
//!
//! ```rust,no_run
//! use percolate::compile::{CompilationContext, Session};
//! use percolate::test_utils::{FakeTranspiler, ProjectFixture};
//!
//! let fixture = ProjectFixture::new();
//! fixture.write("app/main.coffee", "main = -> 1");
//!
//! let mut session = Session::new(fixture.path("global"), FakeTranspiler::default()).unwrap();
//! let mut ctx = CompilationContext::forge(fixture.path("app"), "main").depth(1u8);
//! assert_eq!(session.render(&mut ctx).unwrap(), "main = -> 1");
//! ```

pub mod fixtures;
pub mod tools;

pub use fixtures::{ConfigFixture, ProjectFixture};
pub use tools::{FailingMinifier, FailingTranspiler, FakeMinifier, FakeTranspiler};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use crate::core::PercolateError;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` unset, logging is enabled
/// only when `RUST_LOG` is set.
///
/// ```bash
/// RUST_LOG=pipeline=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}

/// The [`PercolateError`] anywhere in `error`'s cause chain.
pub fn percolate_error(error: &anyhow::Error) -> Option<&PercolateError> {
    error.chain().find_map(|cause| cause.downcast_ref::<PercolateError>())
}
