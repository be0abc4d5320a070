// src/monitor/scheduler.rs
use crate::alert::AlertSink;
use crate::domain::models::{PriceSnapshot, Sample};
use crate::exchange::client::PriceSource;
use crate::monitor::clock::Clock;
use crate::monitor::detector::ChangeDetector;
use crate::monitor::window::WindowStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Loop cadence and symbol filter
#[derive(Debug, Clone)]
pub struct SchedulerSettings {
    /// Only symbols ending in this suffix are sampled
    pub quote_currency: String,

    /// Sleep after a processed tick
    pub refresh_interval: Duration,

    /// Sleep after a failed fetch
    pub retry_delay: Duration,

    /// How far past the window a baseline may lie, absorbing cadence jitter
    pub baseline_tolerance: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Fetching,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub symbols_checked: usize,
    pub alerts_fired: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Processed(TickSummary),
    FetchFailed,
}

/// Drives the fetch -> record -> evaluate -> alert cycle.
///
/// Owns the only `WindowStore`. Symbols are processed one at a time within a
/// tick and ticks never overlap, so the store needs no locking.
pub struct Scheduler {
    source: Arc<dyn PriceSource>,
    sink: Arc<dyn AlertSink>,
    clock: Arc<dyn Clock>,
    store: WindowStore,
    detector: ChangeDetector,
    settings: SchedulerSettings,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(
        source: Arc<dyn PriceSource>,
        sink: Arc<dyn AlertSink>,
        clock: Arc<dyn Clock>,
        detector: ChangeDetector,
        settings: SchedulerSettings,
    ) -> Self {
        let store = WindowStore::new(detector.settings().window_duration);

        Self {
            source,
            sink,
            clock,
            store,
            detector,
            settings,
            state: SchedulerState::Idle,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn store(&self) -> &WindowStore {
        &self.store
    }

    /// Run ticks until `shutdown` flips to true or its sender goes away.
    ///
    /// Shutdown is only observed between ticks, so a tick in progress always completes.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Monitoring *{} pairs: alert above {:.2}% within {:.0}s, refresh every {}s",
            self.settings.quote_currency,
            self.detector.settings().threshold,
            self.detector.settings().window_duration,
            self.settings.refresh_interval.as_secs()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let outcome = self.tick().await;
            let delay = self.next_delay(outcome);

            match outcome {
                TickOutcome::Processed(summary) => log::info!(
                    "Checked {} prices ({} alerts), waiting {:.1} minutes...",
                    summary.symbols_checked,
                    summary.alerts_fired,
                    delay.as_secs_f64() / 60.0
                ),
                TickOutcome::FetchFailed => {
                    log::warn!("Waiting {}s before retry...", delay.as_secs())
                }
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        log::warn!("Shutdown channel closed");
                        break;
                    }
                }
                _ = self.clock.sleep(delay) => {}
            }
        }

        log::info!("Shutting down...");
    }

    /// Fetch one snapshot and process every matching symbol in it.
    pub async fn tick(&mut self) -> TickOutcome {
        self.state = SchedulerState::Fetching;

        let outcome = match self.source.fetch_prices().await {
            Ok(prices) => TickOutcome::Processed(self.process_snapshot(&prices).await),
            Err(e) => {
                log::warn!("Failed to fetch prices: {}", e);
                TickOutcome::FetchFailed
            }
        };

        self.state = SchedulerState::Idle;
        outcome
    }

    /// Oldest age a stored sample may have and still serve as a baseline
    pub fn max_baseline_age(&self) -> f64 {
        self.store.window_duration() + self.settings.baseline_tolerance.as_secs_f64()
    }

    pub fn next_delay(&self, outcome: TickOutcome) -> Duration {
        match outcome {
            TickOutcome::Processed(_) => self.settings.refresh_interval,
            TickOutcome::FetchFailed => self.settings.retry_delay,
        }
    }

    async fn process_snapshot(&mut self, prices: &PriceSnapshot) -> TickSummary {
        let now = self.clock.now();
        let fired_at = self.clock.local_time();
        let quote = self.settings.quote_currency.clone();
        let max_age = self.max_baseline_age();
        let mut summary = TickSummary::default();

        for (symbol, &price) in prices.iter().filter(|(symbol, _)| symbol.ends_with(&quote)) {
            summary.symbols_checked += 1;

            // Read before recording: this sample's eviction pass may drop the baseline
            let reference = self.store.baseline(symbol, now, max_age);
            self.store.record(symbol, price, now);

            let current = Sample::new(price, now);
            if let Some(alert) = self.detector.evaluate(symbol, reference, current, fired_at) {
                self.sink.emit(&alert).await;
                summary.alerts_fired += 1;
            }
        }

        self.sink.tick_complete(summary.alerts_fired).await;
        log::debug!(
            "Tracking {} symbols after tick at {:.0}s",
            self.store.symbol_count(),
            now
        );

        summary
    }
}
