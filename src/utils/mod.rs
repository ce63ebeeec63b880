//! Cross-cutting utilities
//!
//! - [`fs`] - atomic file writes for generated data and configuration
//! - [`progress`] - spinners shown while layers load

pub mod fs;
pub mod progress;

pub use fs::{atomic_write, safe_write};
pub use progress::Spinner;
