// src/config.rs
use crate::alert::log_file::DEFAULT_ALERT_LOG_FILE;
use crate::alert::notifier::TELEGRAM_API_URL;
use crate::domain::errors::{AppError, AppResult};
use crate::exchange::binance::BINANCE_API_URL;
use crate::monitor::detector::{DetectorSettings, DEFAULT_MIN_ELAPSED_FRACTION};
use crate::monitor::scheduler::SchedulerSettings;
use dotenv::dotenv;
use std::env;
use std::io::Write;
use std::str::FromStr;
use std::time::Duration;

/// Price monitor configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Exchange connection
    pub exchange: ExchangeConfig,

    /// Window and threshold policy
    pub monitor: MonitorConfig,

    /// Alert delivery
    pub alerts: AlertConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ExchangeConfig {
    /// REST base URL
    pub api_url: String,

    /// Network timeout per fetch, in seconds
    pub fetch_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Percent rise that triggers an alert
    pub alert_threshold: f64,

    /// Window duration in seconds
    pub window_secs: u64,

    /// Share of the window that must elapse before comparing
    pub min_elapsed_fraction: f64,

    /// Seconds between ticks
    pub refresh_interval_secs: u64,

    /// Seconds to wait after a failed fetch
    pub retry_delay_secs: u64,

    /// Seconds past the window a baseline may lie
    pub baseline_tolerance_secs: f64,

    /// Only symbols ending in this suffix are monitored (e.g. "USDT")
    pub quote_currency: String,
}

#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub log_file: String,

    /// Ring the terminal bell when a tick fires alerts
    pub bell: bool,

    pub notify_url: String,
    pub notify_token: Option<String>,
    pub notify_chat_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Log level (e.g., "info", "debug", "warn", "error")
    pub level: String,

    /// Forces debug verbosity
    pub debug: bool,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let exchange = ExchangeConfig {
            api_url: get("BINANCE_API_URL").unwrap_or_else(|| BINANCE_API_URL.to_string()),
            fetch_timeout_secs: parse_or(&get, "FETCH_TIMEOUT", 30)?,
        };

        let window_secs: u64 = parse_or(&get, "TIME_DIFFERENCE", 300)?;
        let min_elapsed_fraction =
            parse_or(&get, "MIN_ELAPSED_FRACTION", DEFAULT_MIN_ELAPSED_FRACTION)?;

        let monitor = MonitorConfig {
            alert_threshold: parse_or(&get, "ALERT_THRESHOLD", 3.0)?,
            window_secs,
            min_elapsed_fraction,
            refresh_interval_secs: parse_or(&get, "REFRESH_INTERVAL", 60)?,
            retry_delay_secs: parse_or(&get, "FETCH_RETRY_DELAY", 60)?,
            // Mirrors the elapsed guard: comparisons span [f * window, (2 - f) * window]
            baseline_tolerance_secs: parse_or(
                &get,
                "BASELINE_TOLERANCE",
                window_secs as f64 * (1.0 - min_elapsed_fraction),
            )?,
            quote_currency: get("QUOTE_CURRENCY")
                .map(|value| value.to_uppercase())
                .unwrap_or_else(|| "USDT".to_string()),
        };

        let alerts = AlertConfig {
            log_file: get("ALERT_LOG_FILE").unwrap_or_else(|| DEFAULT_ALERT_LOG_FILE.to_string()),
            bell: parse_bool_or(&get, "ALERT_BELL", true)?,
            notify_url: get("NOTIFY_URL").unwrap_or_else(|| TELEGRAM_API_URL.to_string()),
            notify_token: get("NOTIFY_TOKEN"),
            notify_chat_id: get("NOTIFY_CHAT_ID"),
        };

        let logging = LoggingConfig {
            level: get("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            debug: parse_bool_or(&get, "DEBUG", false)?,
        };

        let config = Config {
            exchange,
            monitor,
            alerts,
            logging,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> AppResult<()> {
        let monitor = &self.monitor;

        if !monitor.alert_threshold.is_finite() || monitor.alert_threshold < 0.0 {
            return Err(AppError::Config(format!(
                "ALERT_THRESHOLD must be a non-negative number, got {}",
                monitor.alert_threshold
            )));
        }
        if monitor.window_secs == 0 {
            return Err(AppError::Config("TIME_DIFFERENCE must be positive".to_string()));
        }
        if !(monitor.min_elapsed_fraction > 0.0 && monitor.min_elapsed_fraction <= 1.0) {
            return Err(AppError::Config(format!(
                "MIN_ELAPSED_FRACTION must be in (0, 1], got {}",
                monitor.min_elapsed_fraction
            )));
        }
        if !monitor.baseline_tolerance_secs.is_finite() || monitor.baseline_tolerance_secs < 0.0 {
            return Err(AppError::Config(format!(
                "BASELINE_TOLERANCE must be a non-negative number, got {}",
                monitor.baseline_tolerance_secs
            )));
        }
        if monitor.refresh_interval_secs == 0 {
            return Err(AppError::Config("REFRESH_INTERVAL must be positive".to_string()));
        }
        if monitor.retry_delay_secs == 0 {
            return Err(AppError::Config("FETCH_RETRY_DELAY must be positive".to_string()));
        }
        if self.exchange.fetch_timeout_secs == 0 {
            return Err(AppError::Config("FETCH_TIMEOUT must be positive".to_string()));
        }
        if monitor.quote_currency.is_empty() {
            return Err(AppError::Config("QUOTE_CURRENCY must not be empty".to_string()));
        }

        Ok(())
    }

    pub fn detector_settings(&self) -> DetectorSettings {
        DetectorSettings {
            window_duration: self.monitor.window_secs as f64,
            min_elapsed_fraction: self.monitor.min_elapsed_fraction,
            threshold: self.monitor.alert_threshold,
            quote_currency: self.monitor.quote_currency.clone(),
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            quote_currency: self.monitor.quote_currency.clone(),
            refresh_interval: Duration::from_secs(self.monitor.refresh_interval_secs),
            retry_delay: Duration::from_secs(self.monitor.retry_delay_secs),
            baseline_tolerance: Duration::from_secs_f64(self.monitor.baseline_tolerance_secs),
        }
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.exchange.fetch_timeout_secs)
    }

    /// Token and chat id, when both are configured
    pub fn notify_credentials(&self) -> Option<(&str, &str)> {
        match (&self.alerts.notify_token, &self.alerts.notify_chat_id) {
            (Some(token), Some(chat_id)) => Some((token.as_str(), chat_id.as_str())),
            _ => None,
        }
    }

    /// Initialize logging based on configuration
    pub fn init_logging(&self) -> AppResult<()> {
        let mut builder = env_logger::Builder::new();

        let log_level = if self.logging.debug {
            log::LevelFilter::Debug
        } else {
            match self.logging.level.to_lowercase().as_str() {
                "trace" => log::LevelFilter::Trace,
                "debug" => log::LevelFilter::Debug,
                "info" => log::LevelFilter::Info,
                "warn" => log::LevelFilter::Warn,
                "error" => log::LevelFilter::Error,
                _ => log::LevelFilter::Info,
            }
        };

        builder
            .filter_level(log_level)
            // Keep the HTTP stack quiet
            .filter_module("hyper", log::LevelFilter::Warn)
            .format(|buf, record| {
                writeln!(
                    buf,
                    "{} - {} - {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.args()
                )
            });

        builder
            .try_init()
            .map_err(|e| AppError::Config(format!("Failed to initialize logger: {}", e)))?;

        Ok(())
    }
}

fn parse_or<G, T>(get: &G, key: &str, default: T) -> AppResult<T>
where
    G: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid {} value {:?}: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> AppResult<bool>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(AppError::Config(format!("Invalid {} value {:?}", key, raw))),
        },
        None => Ok(default),
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exchange: ExchangeConfig {
                api_url: BINANCE_API_URL.to_string(),
                fetch_timeout_secs: 30,
            },
            monitor: MonitorConfig {
                alert_threshold: 3.0,
                window_secs: 300,
                min_elapsed_fraction: DEFAULT_MIN_ELAPSED_FRACTION,
                refresh_interval_secs: 60,
                retry_delay_secs: 60,
                baseline_tolerance_secs: 300.0 * (1.0 - DEFAULT_MIN_ELAPSED_FRACTION),
                quote_currency: "USDT".to_string(),
            },
            alerts: AlertConfig {
                log_file: DEFAULT_ALERT_LOG_FILE.to_string(),
                bell: true,
                notify_url: TELEGRAM_API_URL.to_string(),
                notify_token: None,
                notify_chat_id: None,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                debug: false,
            },
        }
    }
}
