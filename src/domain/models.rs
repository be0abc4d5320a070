// src/domain/models.rs
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::fmt;

/// Latest price per symbol as returned by one exchange fetch
pub type PriceSnapshot = HashMap<String, f64>;

/// A single price observation. `timestamp` is monotonic seconds from the monitor clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub price: f64,
    pub timestamp: f64,
}

impl Sample {
    pub fn new(price: f64, timestamp: f64) -> Self {
        Self { price, timestamp }
    }

    /// Seconds between this sample and `now`. Negative if the clock stepped backwards.
    pub fn age(&self, now: f64) -> f64 {
        now - self.timestamp
    }
}

/// A price rise that crossed the configured threshold
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub symbol: String,
    pub percent_change: f64,
    pub elapsed_secs: f64,
    pub current_price: f64,
    pub reference_price: f64,
    pub quote_currency: String,
    pub fired_at: DateTime<Local>,
}

impl Alert {
    pub fn elapsed_minutes(&self) -> f64 {
        self.elapsed_secs / 60.0
    }

    /// Record appended to the alert log file
    pub fn log_record(&self) -> String {
        format!(
            "\n=== {} ===\n{}: {:.2}% (Price: {:.8} {})\n",
            self.fired_at.format("%Y-%m-%d %H:%M:%S"),
            self.symbol,
            self.percent_change,
            self.current_price,
            self.quote_currency
        )
    }
}

impl fmt::Display for Alert {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "🚀 {} increased by {:.2}% in {:.1} minutes ({:.8} -> {:.8} {})",
            self.symbol,
            self.percent_change,
            self.elapsed_minutes(),
            self.reference_price,
            self.current_price,
            self.quote_currency
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn alert() -> Alert {
        Alert {
            symbol: "BTCUSDT".to_string(),
            percent_change: 4.0512,
            elapsed_secs: 301.0,
            current_price: 104.05,
            reference_price: 100.0,
            quote_currency: "USDT".to_string(),
            fired_at: Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap(),
        }
    }

    #[test]
    fn log_record_matches_alert_file_format() {
        assert_eq!(
            alert().log_record(),
            "\n=== 2024-03-09 14:05:07 ===\nBTCUSDT: 4.05% (Price: 104.05000000 USDT)\n"
        );
    }

    #[test]
    fn display_renders_minutes_and_prices() {
        let text = alert().to_string();
        assert!(text.contains("BTCUSDT increased by 4.05% in 5.0 minutes"));
        assert!(text.contains("100.00000000 -> 104.05000000 USDT"));
    }

    #[test]
    fn sample_age_can_be_negative_under_clock_skew() {
        let sample = Sample::new(1.0, 100.0);
        assert_eq!(sample.age(160.0), 60.0);
        assert_eq!(sample.age(90.0), -10.0);
    }
}
