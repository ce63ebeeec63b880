//! Core types for admap
//!
//! This module holds the vocabulary shared by every other module:
//!
//! - [`HierarchyLevel`] - the three administrative tiers (district, sub-unit, village)
//! - [`AdmapError`] - enumerated failure modes
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - conversion of arbitrary errors for CLI display
//!
//! # Error Handling Pattern
//!
//! Library code returns [`anyhow::Result`] and raises [`AdmapError`] variants
//! for conditions callers may want to match on. The binary converts whatever
//! reaches `main` with [`user_friendly_error`] and prints it in color.
//!
//! ```rust,no_run
//! use admap_cli::core::{AdmapError, user_friendly_error};
//!
//! fn choose() -> anyhow::Result<()> {
//!     Err(AdmapError::InvalidLevel {
//!         level: "block".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = choose() {
//!     user_friendly_error(e).display();
//! }
//! ```

pub mod error;
pub mod level;

pub use error::{AdmapError, ErrorContext, user_friendly_error};
pub use level::HierarchyLevel;
