//! Test utilities for admap
//!
//! Helpers shared by unit tests and the integration tests under `tests/`
//! (enabled there through the `test-utils` feature):
//! - Logging initialisation that plays well with the test harness
//! - Sample catalogs built in memory or written to a data directory
//!
//! # Example
//!
//! ```rust,no_run
//! use admap_cli::session::Session;
//! use admap_cli::test_utils::{init_test_logging, scenario_catalog};
//!
//! init_test_logging(None);
//! let mut session = Session::new(scenario_catalog());
//! let update = session.on_district_chosen(Some("Gosaba Block"));
//! assert_eq!(update.options.subunits.values(), vec!["Basanti"]);
//! ```

pub mod fixtures;

pub use fixtures::{CatalogBuilder, scenario_catalog, write_catalog_files};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. Uses `level` when given, otherwise
/// `RUST_LOG` when set, otherwise leaves logging off.
///
/// # Example
///
/// ```rust,no_run
/// use tracing::Level;
///
/// admap_cli::test_utils::init_test_logging(None);
/// admap_cli::test_utils::init_test_logging(Some(Level::DEBUG));
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
            .with_ansi(true)
            .try_init();
    });
}
