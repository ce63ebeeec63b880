//! Configuration management for admap
//!
//! admap has a single, optional, user-wide configuration file handled by
//! [`global`]. Command-line flags (`--data`, `--match-mode`) override what it
//! says for one invocation.

pub mod global;

pub use global::AdmapConfig;
