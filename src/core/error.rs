//! Error handling for admap
//!
//! This module provides the error types and user-friendly error reporting for the
//! admap navigator. The error system follows two principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`AdmapError`] - Enumerated error types for all failure cases in admap
//! - [`ErrorContext`] - Wrapper that adds user-friendly details and suggestions
//! - [`user_friendly_error`] - Converts any [`anyhow::Error`] for CLI display
//!
//! # Recoverable vs fatal
//!
//! Most failures in admap are local and recovered automatically. A layer that
//! cannot be loaded is replaced by the embedded fallback dataset, a property key
//! that cannot be recognised is replaced by a heuristic guess, and a search with
//! no hits is an ordinary outcome rather than an error. The single fatal path is
//! [`AdmapError::FallbackUnavailable`].
//!
//! # Examples
//!
//! ```rust,no_run
//! use admap_cli::core::{AdmapError, ErrorContext, user_friendly_error};
//!
//! let context = ErrorContext::new(AdmapError::ConfigNotFound {
//!     path: "/etc/admap.toml".to_string(),
//! })
//! .with_suggestion("Run 'admap config init' to create one");
//! context.display();
//!
//! let friendly = user_friendly_error(anyhow::anyhow!("something went wrong"));
//! eprintln!("{friendly}");
//! ```

use colored::Colorize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

use crate::core::HierarchyLevel;

/// The main error type for admap operations
///
/// # Error Categories
///
/// ## Data loading
/// - [`DataLoadFailed`] - A layer document could not be read or fetched
/// - [`HttpStatus`] - The data server answered with a non-success status
/// - [`LoadTimeout`] - A layer document did not arrive in time
/// - [`InvalidFeatureCollection`] - The document is not a GeoJSON feature collection
/// - [`FallbackUnavailable`] - The embedded fallback dataset is broken (fatal)
///
/// ## Navigation
/// - [`InvalidLevel`] - Unknown hierarchy level name
/// - [`FeatureNotFound`] - A feature id outside its collection
/// - [`UnknownOption`] - A name that is not among the current choices
/// - [`InvalidMatchMode`] - Unknown sub-unit highlight mode
///
/// ## Configuration and I/O
/// - [`ConfigError`], [`ConfigNotFound`], [`InvalidArgument`]
/// - [`IoError`], [`JsonError`], [`TomlError`], [`TomlSerError`]
///
/// [`DataLoadFailed`]: AdmapError::DataLoadFailed
/// [`HttpStatus`]: AdmapError::HttpStatus
/// [`LoadTimeout`]: AdmapError::LoadTimeout
/// [`InvalidFeatureCollection`]: AdmapError::InvalidFeatureCollection
/// [`FallbackUnavailable`]: AdmapError::FallbackUnavailable
/// [`InvalidLevel`]: AdmapError::InvalidLevel
/// [`FeatureNotFound`]: AdmapError::FeatureNotFound
/// [`UnknownOption`]: AdmapError::UnknownOption
/// [`InvalidMatchMode`]: AdmapError::InvalidMatchMode
/// [`ConfigError`]: AdmapError::ConfigError
/// [`ConfigNotFound`]: AdmapError::ConfigNotFound
/// [`InvalidArgument`]: AdmapError::InvalidArgument
/// [`IoError`]: AdmapError::IoError
/// [`JsonError`]: AdmapError::JsonError
/// [`TomlError`]: AdmapError::TomlError
/// [`TomlSerError`]: AdmapError::TomlSerError
#[derive(Error, Debug)]
pub enum AdmapError {
    /// A layer document could not be read, fetched or decoded
    #[error("Failed to load {level} data from {location}: {reason}")]
    DataLoadFailed {
        /// Layer being loaded
        level: HierarchyLevel,
        /// File path or URL of the document
        location: String,
        /// Underlying failure
        reason: String,
    },

    /// The data server answered with a non-success status code
    #[error("HTTP {status} while fetching {url}")]
    HttpStatus {
        /// Requested URL
        url: String,
        /// Status code returned by the server
        status: u16,
    },

    /// A layer document did not arrive before the configured timeout
    #[error("Timed out after {elapsed:?} loading {location}")]
    LoadTimeout {
        /// File path or URL of the document
        location: String,
        /// Timeout that elapsed
        elapsed: Duration,
    },

    /// The document parsed as JSON but is not a GeoJSON feature collection
    #[error("Invalid GeoJSON feature collection in {location}: {reason}")]
    InvalidFeatureCollection {
        /// File path or URL of the document
        location: String,
        /// What is wrong with it
        reason: String,
    },

    /// The embedded fallback dataset could not be constructed
    #[error("Embedded fallback dataset could not be constructed: {reason}")]
    FallbackUnavailable {
        /// Underlying failure
        reason: String,
    },

    /// Unknown hierarchy level name
    #[error("Invalid hierarchy level: {level}")]
    InvalidLevel {
        /// The rejected input
        level: String,
    },

    /// A feature id that does not exist in its collection
    #[error("No {level} feature with id {id}")]
    FeatureNotFound {
        /// Layer that was searched
        level: HierarchyLevel,
        /// The missing id
        id: usize,
    },

    /// A name that is not among the current choices for a level
    #[error("'{name}' is not a valid {level} choice")]
    UnknownOption {
        /// Layer of the choice list
        level: HierarchyLevel,
        /// The rejected name
        name: String,
        /// Closest valid choice, if any is reasonably close
        closest: Option<String>,
    },

    /// Unknown sub-unit highlight mode
    #[error("Invalid match mode: {mode}")]
    InvalidMatchMode {
        /// The rejected input
        mode: String,
    },

    /// Configuration file content is unusable
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// An explicitly requested configuration file does not exist
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The missing path
        path: String,
    },

    /// A command-line argument combination that cannot be honoured
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description of the problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for AdmapError {
    fn clone(&self) -> Self {
        match self {
            Self::DataLoadFailed {
                level,
                location,
                reason,
            } => Self::DataLoadFailed {
                level: *level,
                location: location.clone(),
                reason: reason.clone(),
            },
            Self::HttpStatus {
                url,
                status,
            } => Self::HttpStatus {
                url: url.clone(),
                status: *status,
            },
            Self::LoadTimeout {
                location,
                elapsed,
            } => Self::LoadTimeout {
                location: location.clone(),
                elapsed: *elapsed,
            },
            Self::InvalidFeatureCollection {
                location,
                reason,
            } => Self::InvalidFeatureCollection {
                location: location.clone(),
                reason: reason.clone(),
            },
            Self::FallbackUnavailable {
                reason,
            } => Self::FallbackUnavailable {
                reason: reason.clone(),
            },
            Self::InvalidLevel {
                level,
            } => Self::InvalidLevel {
                level: level.clone(),
            },
            Self::FeatureNotFound {
                level,
                id,
            } => Self::FeatureNotFound {
                level: *level,
                id: *id,
            },
            Self::UnknownOption {
                level,
                name,
                closest,
            } => Self::UnknownOption {
                level: *level,
                name: name.clone(),
                closest: closest.clone(),
            },
            Self::InvalidMatchMode {
                mode,
            } => Self::InvalidMatchMode {
                mode: mode.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::ConfigNotFound {
                path,
            } => Self::ConfigNotFound {
                path: path.clone(),
            },
            Self::InvalidArgument {
                message,
            } => Self::InvalidArgument {
                message: message.clone(),
            },
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::JsonError(e) => Self::Other {
                message: format!("JSON error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::TomlSerError(e) => Self::Other {
                message: format!("TOML serialization error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying user-facing details and a suggestion
///
/// Details explain what happened; the suggestion tells the user what to do
/// about it. Both are optional.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying error
    pub error: AdmapError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Wrap an error without details or suggestion.
    #[must_use]
    pub const fn new(error: AdmapError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion, displayed in green.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add explanatory details, displayed in yellow.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error, details and suggestion to stderr with terminal colors.
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
/// Recognises [`AdmapError`] (directly or wrapped in an [`ErrorContext`]),
/// [`std::io::Error`] and TOML parse errors; everything else is reported with
/// its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(context) = error.downcast_ref::<ErrorContext>() {
        return ErrorContext {
            error: context.error.clone(),
            suggestion: context.suggestion.clone(),
            details: context.details.clone(),
        };
    }

    if let Some(admap_error) = error.downcast_ref::<AdmapError>() {
        return create_error_context(admap_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(AdmapError::Other {
                    message: format!("Permission denied: {error:#}"),
                })
                .with_suggestion("Check file ownership and permissions of the data directory");
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(AdmapError::Other {
                    message: format!("File not found: {error:#}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(AdmapError::ConfigError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax of your admap configuration file");
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

    ErrorContext::new(AdmapError::Other {
        message,
    })
}

/// Map each [`AdmapError`] variant to a context with tailored suggestions.
fn create_error_context(error: AdmapError) -> ErrorContext {
    match &error {
        AdmapError::FallbackUnavailable { .. } => ErrorContext::new(error)
            .with_details("Neither the data source nor the built-in sample data could be loaded")
            .with_suggestion("This is a bug; please report it with 'admap --verbose' output"),

        AdmapError::DataLoadFailed { location, .. } => {
            let suggestion = format!(
                "Check that {location} exists and is a GeoJSON FeatureCollection, \
                 or point --data at another location"
            );
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        AdmapError::HttpStatus { .. } | AdmapError::LoadTimeout { .. } => ErrorContext::new(error)
            .with_suggestion("Check your network connection and the configured data URL"),

        AdmapError::InvalidFeatureCollection { .. } => ErrorContext::new(error)
            .with_details(r#"Each layer must be a GeoJSON object with "type": "FeatureCollection""#)
            .with_suggestion("Re-export the layer as GeoJSON"),

        AdmapError::InvalidLevel { .. } => ErrorContext::new(error)
            .with_suggestion("Valid levels are: district, subunit (or ss), village"),

        AdmapError::InvalidMatchMode { .. } => ErrorContext::new(error)
            .with_suggestion("Valid modes are: district-scoped, unscoped"),

        AdmapError::UnknownOption { level, closest, .. } => {
            let suggestion = match closest {
                Some(name) => format!("Did you mean '{name}'?"),
                None => format!("Run 'admap options' to list the valid {level} choices"),
            };
            let details = match level.parent() {
                Some(parent) => format!("{level} choices depend on the selected {parent}"),
                None => "District choices come from the district layer".to_string(),
            };
            ErrorContext::new(error).with_suggestion(suggestion).with_details(details)
        }

        AdmapError::FeatureNotFound { level, .. } => {
            let suggestion = format!("Run 'admap layers {level}' to list feature ids");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        AdmapError::ConfigError { .. } | AdmapError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion(
                "Check the TOML syntax of the configuration file, \
                 or recreate it with 'admap config init --force'",
            ),

        AdmapError::ConfigNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Run 'admap config init' to create a configuration file"),

        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = AdmapError::DataLoadFailed {
            level: HierarchyLevel::Village,
            location: "data/villages.geojson".to_string(),
            reason: "not found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to load village data from data/villages.geojson: not found"
        );

        let error = AdmapError::FeatureNotFound {
            level: HierarchyLevel::SubUnit,
            id: 7,
        };
        assert_eq!(error.to_string(), "No subunit feature with id 7");
    }

    #[test]
    fn test_error_clone_converts_foreign_errors() {
        let io = AdmapError::IoError(std::io::Error::other("disk"));
        match io.clone() {
            AdmapError::Other {
                message,
            } => assert!(message.contains("disk")),
            other => panic!("unexpected clone: {other:?}"),
        }
    }

    #[test]
    fn test_error_context_display() {
        let context = ErrorContext::new(AdmapError::ConfigNotFound {
            path: "/tmp/x.toml".to_string(),
        })
        .with_details("details here")
        .with_suggestion("do this");

        let rendered = context.to_string();
        assert!(rendered.contains("Configuration file not found: /tmp/x.toml"));
        assert!(rendered.contains("Details: details here"));
        assert!(rendered.contains("Suggestion: do this"));
    }

    #[test]
    fn test_user_friendly_unknown_option_suggests_closest() {
        let error = anyhow::Error::from(AdmapError::UnknownOption {
            level: HierarchyLevel::SubUnit,
            name: "Basnti".to_string(),
            closest: Some("Basanti".to_string()),
        });
        let context = user_friendly_error(error);
        assert_eq!(context.suggestion.as_deref(), Some("Did you mean 'Basanti'?"));
        assert!(context.details.unwrap().contains("selected district"));
    }

    #[test]
    fn test_user_friendly_preserves_existing_context() {
        let error = anyhow::Error::new(
            ErrorContext::new(AdmapError::Other {
                message: "boom".to_string(),
            })
            .with_suggestion("try again"),
        );
        let context = user_friendly_error(error);
        assert_eq!(context.suggestion.as_deref(), Some("try again"));
    }

    #[test]
    fn test_user_friendly_generic_includes_chain() {
        let error = anyhow::anyhow!("root cause").context("outer failure");
        let context = user_friendly_error(error);
        let message = context.error.to_string();
        assert!(message.contains("outer failure"));
        assert!(message.contains("Caused by"));
        assert!(message.contains("root cause"));
    }
}
