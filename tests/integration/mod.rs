//! Integration test suite for percolate
//!
//! End-to-end checks of the compilation pipeline through the library API and
//! the `percolate` binary. Library tests use the in-process fake tools from
//! `percolate::test_utils`; binary tests install shell-script stand-ins for
//! `coffee` and `uglifyjs` and therefore only run on Unix.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **resolution**: search order, extension inference and star expansion
//! - **pipeline**: stage cutoffs, raw script round trips and failure cleanup
//! - **save**: writing artifacts and reproducible output
//! - **cli**: the `build`, `check`, `print` and `list` commands

#[path = "../common/mod.rs"]
mod common;

mod cli;
mod pipeline;
mod resolution;
mod save;
