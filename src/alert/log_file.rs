// src/alert/log_file.rs
use crate::domain::errors::AlertResult;
use crate::domain::models::Alert;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

pub const DEFAULT_ALERT_LOG_FILE: &str = "price_alerts.txt";

/// Append-only alert log. Each record is written with a single call so records never interleave.
#[derive(Debug)]
pub struct AlertLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl AlertLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, alert: &Alert) -> AlertResult<()> {
        let record = alert.log_record();
        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(record.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub(crate) fn temp_log_path(name: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or_default();
        std::env::temp_dir().join(format!(
            "pump_alert_{}_{}_{}.txt",
            name,
            std::process::id(),
            nanos
        ))
    }

    pub(crate) fn sample_alert(symbol: &str, percent_change: f64, price: f64) -> Alert {
        Alert {
            symbol: symbol.to_string(),
            percent_change,
            elapsed_secs: 300.0,
            current_price: price,
            reference_price: price / (1.0 + percent_change / 100.0),
            quote_currency: "USDT".to_string(),
            fired_at: Local.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        }
    }

    #[tokio::test]
    async fn appends_records_in_order() {
        let path = temp_log_path("append");
        let log = AlertLog::new(&path);

        log.append(&sample_alert("BTCUSDT", 4.2, 104.2)).await.unwrap();
        log.append(&sample_alert("PEPEUSDT", 12.0, 0.00001234)).await.unwrap();

        let contents = tokio::fs::read_to_string(&path).await.unwrap();
        assert_eq!(
            contents,
            "\n=== 2024-01-02 03:04:05 ===\nBTCUSDT: 4.20% (Price: 104.20000000 USDT)\n\
             \n=== 2024-01-02 03:04:05 ===\nPEPEUSDT: 12.00% (Price: 0.00001234 USDT)\n"
        );

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missing_directory_is_reported() {
        let path = temp_log_path("missing").join("nested").join("alerts.txt");
        let log = AlertLog::new(&path);

        let result = log.append(&sample_alert("BTCUSDT", 4.2, 104.2)).await;
        assert!(result.is_err());
    }
}
