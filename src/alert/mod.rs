// src/alert/mod.rs
pub mod log_file;
pub mod notifier;

use crate::domain::errors::AlertResult;
use crate::domain::models::Alert;
use async_trait::async_trait;
use std::io::Write;

pub use log_file::AlertLog;
pub use notifier::{Notifier, TelegramNotifier};

/// Receiver of triggered alerts. Implementations swallow their own failures.
#[async_trait]
pub trait AlertSink: Send + Sync {
    async fn emit(&self, alert: &Alert);

    /// Called once at the end of every processed tick
    async fn tick_complete(&self, _alerts_fired: usize) {}
}

/// Writes alerts to the alert log and forwards them to the notifier.
///
/// The two deliveries are independent: a failed log write does not stop the
/// notification and a failed notification does not undo the log write.
pub struct AlertDispatcher {
    log: AlertLog,
    notifier: Option<Box<dyn Notifier>>,
    bell: bool,
}

impl AlertDispatcher {
    pub fn new(log: AlertLog, notifier: Option<Box<dyn Notifier>>, bell: bool) -> Self {
        Self { log, notifier, bell }
    }

    async fn notify(&self, alert: &Alert) -> AlertResult<()> {
        if let Some(notifier) = &self.notifier {
            notifier.send(&alert.to_string()).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl AlertSink for AlertDispatcher {
    async fn emit(&self, alert: &Alert) {
        log::warn!(
            "🚀 ALERT: {} increased by {:.2}% in {:.1} minutes!",
            alert.symbol,
            alert.percent_change,
            alert.elapsed_minutes()
        );

        if let Err(e) = self.log.append(alert).await {
            log::error!("{} ({})", e, self.log.path().display());
        }

        if let Err(e) = self.notify(alert).await {
            log::error!("{} ({})", e, alert.symbol);
        }
    }

    async fn tick_complete(&self, alerts_fired: usize) {
        if self.bell && alerts_fired > 0 {
            let mut stdout = std::io::stdout();
            if let Err(e) = stdout.write_all(b"\x07").and_then(|_| stdout.flush()) {
                log::debug!("Failed to ring terminal bell: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::log_file::tests::{sample_alert, temp_log_path};
    use super::*;
    use crate::domain::errors::{NotifyError, NotifyResult};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingNotifier {
        sent: Arc<Mutex<Vec<String>>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, text: &str) -> NotifyResult<()> {
            self.sent.lock().unwrap().push(text.to_string());
            if self.fail {
                return Err(NotifyError::Status {
                    status: 502,
                    body: "Bad Gateway".to_string(),
                });
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn emit_writes_log_and_notifies() {
        let path = temp_log_path("dispatch");
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            sent: sent.clone(),
            fail: false,
        };
        let dispatcher = AlertDispatcher::new(AlertLog::new(&path), Some(Box::new(notifier)), false);

        dispatcher.emit(&sample_alert("BTCUSDT", 4.05, 104.05)).await;

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("BTCUSDT: 4.05% (Price: 104.05000000 USDT)"));
        let sent = sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].contains("BTCUSDT increased by 4.05%"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn failed_notification_still_logs() {
        let path = temp_log_path("notify_fail");
        let notifier = RecordingNotifier {
            sent: Arc::default(),
            fail: true,
        };
        let dispatcher = AlertDispatcher::new(AlertLog::new(&path), Some(Box::new(notifier)), false);

        dispatcher.emit(&sample_alert("ETHUSDT", 5.5, 3165.0)).await;
        dispatcher.emit(&sample_alert("SOLUSDT", 7.25, 150.0)).await;

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(contents.contains("ETHUSDT: 5.50%"));
        assert!(contents.contains("SOLUSDT: 7.25%"));

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn failed_log_write_still_notifies() {
        let path = temp_log_path("log_fail").join("missing").join("alerts.txt");
        let sent = Arc::new(Mutex::new(Vec::new()));
        let notifier = RecordingNotifier {
            sent: sent.clone(),
            fail: false,
        };
        let dispatcher = AlertDispatcher::new(AlertLog::new(&path), Some(Box::new(notifier)), false);

        dispatcher.emit(&sample_alert("BTCUSDT", 4.05, 104.05)).await;

        assert_eq!(sent.lock().unwrap().len(), 1);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn works_without_notifier() {
        let path = temp_log_path("no_notifier");
        let dispatcher = AlertDispatcher::new(AlertLog::new(&path), None, false);

        dispatcher.emit(&sample_alert("BTCUSDT", 3.5, 103.5)).await;
        dispatcher.tick_complete(1).await;

        assert!(tokio::fs::read_to_string(&path).await.unwrap().contains("BTCUSDT: 3.50%"));
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn bell_write_failures_do_not_escape_tick_complete() {
        let path = temp_log_path("bell");
        let dispatcher = AlertDispatcher::new(AlertLog::new(&path), None, true);

        // Whether or not stdout accepts the bell byte, the tick must complete
        dispatcher.tick_complete(2).await;
        dispatcher.tick_complete(0).await;

        assert!(!path.exists());
    }
}
