//! Utilities shared across modules.
//!
//! - [`fs`] - atomic writes, scoped temporary files and upward file lookup
//! - [`suggest`] - "did you mean" matching for misspelled names

pub mod fs;
pub mod suggest;

pub use fs::{atomic_write, checksum, create_temp_file, ensure_dir, find_upwards, read_text_file};
pub use suggest::closest_match;
