//! percolate: CoffeeScript template assembly and compilation
//!
//! Templates pull fragments out of category directories with
//! `{% category(...) %}` directives. The assembled CoffeeScript is transpiled,
//! the JavaScript is run through the directive layer a second time so raw
//! scripts can be spliced back in, and the result is optionally minified.
//!
//! # Modules
//!
//! - [`compile`] - sessions, contexts, name resolution, directives and the staged pipeline
//! - [`config`] - `percolate.toml` loading and output profiles
//! - [`tools`] - transpiler and minifier adapters around external executables
//! - [`cli`] - the `percolate` command line
//! - [`core`] - error types and user-facing error reports
//! - [`utils`] - file system helpers and name suggestions
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use percolate::compile::{CompilationContext, Session};
//! use percolate::tools::CoffeeTranspiler;
//!
//! # fn example() -> anyhow::Result<()> {
//! let mut session = Session::new("assets/coffee", CoffeeTranspiler::default())?;
//! let mut ctx = CompilationContext::forge("assets/app", "app").depth(2u8);
//! let javascript = session.render(&mut ctx)?;
//! println!("{javascript}");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod compile;
pub mod config;
pub mod constants;
pub mod core;
pub mod tools;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
