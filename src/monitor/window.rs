// src/monitor/window.rs
use crate::domain::models::Sample;
use std::collections::{HashMap, VecDeque};

/// Per-symbol price history bounded by time rather than count.
///
/// Each window is kept sorted ascending by timestamp. After `record` no
/// retained sample is older than `window_duration` relative to the `now`
/// passed in. Zero or negative prices are stored as-is; deciding whether a
/// sample is usable for a ratio is the detector's job.
#[derive(Debug, Clone)]
pub struct WindowStore {
    window_duration: f64,
    windows: HashMap<String, VecDeque<Sample>>,
}

impl WindowStore {
    pub fn new(window_duration: f64) -> Self {
        Self {
            window_duration,
            windows: HashMap::new(),
        }
    }

    pub fn window_duration(&self) -> f64 {
        self.window_duration
    }

    /// Store a new observation for `symbol` and drop everything older than the window.
    pub fn record(&mut self, symbol: &str, price: f64, now: f64) {
        let window = self.windows.entry(symbol.to_string()).or_default();

        // Normally an append; a clock that stepped backwards lands earlier in the sequence.
        let position = window.partition_point(|s| s.timestamp <= now);
        window.insert(position, Sample::new(price, now));

        let max_age = self.window_duration;
        window.retain(|s| s.age(now) <= max_age);

        log::trace!("{}: {} samples in window", symbol, window.len());
    }

    /// Oldest retained sample, or `None` until the window holds at least two samples.
    pub fn reference(&self, symbol: &str) -> Option<Sample> {
        self.windows
            .get(symbol)
            .filter(|window| window.len() >= 2)
            .and_then(|window| window.front().copied())
    }

    /// Comparison baseline for a sample at `now` that has not been recorded yet.
    ///
    /// One earlier sample is enough here, since the fresh sample will be the
    /// second. Samples older than `max_age` at `now` are skipped: they are
    /// still stored because eviction only runs inside `record`.
    pub fn baseline(&self, symbol: &str, now: f64, max_age: f64) -> Option<Sample> {
        self.windows
            .get(symbol)?
            .iter()
            .find(|s| s.age(now) <= max_age)
            .copied()
    }

    pub fn samples(&self, symbol: &str) -> Vec<Sample> {
        self.windows
            .get(symbol)
            .map(|window| window.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, symbol: &str) -> usize {
        self.windows.get(symbol).map_or(0, VecDeque::len)
    }

    pub fn symbol_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.values().all(VecDeque::is_empty)
    }
}
