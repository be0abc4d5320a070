// src/monitor/detector.rs
use crate::domain::models::{Alert, Sample};
use chrono::{DateTime, Local};

pub const DEFAULT_MIN_ELAPSED_FRACTION: f64 = 0.9;

/// Detector parameters
#[derive(Debug, Clone)]
pub struct DetectorSettings {
    /// Window duration in seconds
    pub window_duration: f64,

    /// Share of the window that must separate reference and current sample
    pub min_elapsed_fraction: f64,

    /// Alert threshold in percent
    pub threshold: f64,

    pub quote_currency: String,
}

/// Decides whether a fresh sample has risen far enough above its window reference
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    settings: DetectorSettings,
}

impl ChangeDetector {
    pub fn new(settings: DetectorSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Minimum seconds between reference and current sample before a comparison counts
    pub fn min_elapsed(&self) -> f64 {
        self.settings.window_duration * self.settings.min_elapsed_fraction
    }

    pub fn evaluate(
        &self,
        symbol: &str,
        reference: Option<Sample>,
        current: Sample,
        fired_at: DateTime<Local>,
    ) -> Option<Alert> {
        let reference = reference?;

        let percent_change = percent_change(reference.price, current.price)?;

        let elapsed = current.timestamp - reference.timestamp;
        if elapsed < self.min_elapsed() {
            log::trace!(
                "{}: {:.0}s of history, need {:.0}s",
                symbol,
                elapsed,
                self.min_elapsed()
            );
            return None;
        }

        if percent_change <= self.settings.threshold {
            return None;
        }

        Some(Alert {
            symbol: symbol.to_string(),
            percent_change,
            elapsed_secs: elapsed,
            current_price: current.price,
            reference_price: reference.price,
            quote_currency: self.settings.quote_currency.clone(),
            fired_at,
        })
    }
}

/// Percent change from `reference` to `current`; `None` unless both prices are positive.
pub fn percent_change(reference: f64, current: f64) -> Option<f64> {
    if reference <= 0.0 || current <= 0.0 {
        return None;
    }
    Some((current - reference) / reference * 100.0)
}
