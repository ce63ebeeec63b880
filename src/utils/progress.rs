//! Progress indicators
//!
//! A thin wrapper over `indicatif` spinners with admap's styling. Spinners
//! draw on stderr and are replaced by a hidden bar when progress is disabled,
//! either by the `--no-progress` flag or the `ADMAP_NO_PROGRESS` environment
//! variable, so callers never need to branch.
//!
//! # Examples
//!
//! ```rust,no_run
//! use admap_cli::utils::progress::Spinner;
//!
//! let spinner = Spinner::new("Loading geographic data...", true);
//! // load_catalog(...).await?;
//! spinner.finish_and_clear();
//! ```

use indicatif::{ProgressBar as IndicatifBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

use crate::constants::NO_PROGRESS_ENV;

/// Whether progress output is turned off through the environment.
fn is_progress_disabled() -> bool {
    std::env::var(NO_PROGRESS_ENV).is_ok()
}

fn spinner_style() -> IndicatifStyle {
    IndicatifStyle::default_spinner()
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| IndicatifStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
}

/// Indeterminate progress spinner.
#[derive(Clone)]
pub struct Spinner {
    inner: IndicatifBar,
}

impl Spinner {
    /// Start a spinner showing `message`.
    ///
    /// `enabled = false` (or `ADMAP_NO_PROGRESS` being set) yields a hidden spinner.
    pub fn new(message: impl Into<String>, enabled: bool) -> Self {
        let bar = if !enabled || is_progress_disabled() {
            IndicatifBar::hidden()
        } else {
            let bar = IndicatifBar::new_spinner();
            bar.set_style(spinner_style());
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        };
        bar.set_message(message.into());
        Self {
            inner: bar,
        }
    }

    pub fn set_message(&self, msg: impl Into<String>) {
        self.inner.set_message(msg.into());
    }

    pub fn finish_and_clear(&self) {
        self.inner.finish_and_clear();
    }

    /// Whether nothing will be drawn.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        self.inner.is_hidden()
    }
}
