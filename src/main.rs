// src/main.rs
use pump_alert::alert::{AlertDispatcher, AlertLog, Notifier, TelegramNotifier};
use pump_alert::config::Config;
use pump_alert::domain::errors::AppResult;
use pump_alert::exchange::BinanceClient;
use pump_alert::monitor::{ChangeDetector, Scheduler, SystemClock};

use std::sync::Arc;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    config.init_logging()?;

    log::info!("Starting pump_alert v{}", env!("CARGO_PKG_VERSION"));
    log::debug!("Configuration: {:?}", config.monitor);

    let source = Arc::new(BinanceClient::new(
        &config.exchange.api_url,
        config.fetch_timeout(),
    ));

    let notifier: Option<Box<dyn Notifier>> = match config.notify_credentials() {
        Some((token, chat_id)) => {
            log::info!("Notifications enabled via {}", config.alerts.notify_url);
            Some(Box::new(TelegramNotifier::new(
                &config.alerts.notify_url,
                token,
                chat_id,
            )))
        }
        None => {
            if config.alerts.notify_token.is_some() || config.alerts.notify_chat_id.is_some() {
                log::warn!("NOTIFY_TOKEN and NOTIFY_CHAT_ID must both be set; notifications disabled");
            }
            None
        }
    };

    let sink = Arc::new(AlertDispatcher::new(
        AlertLog::new(&config.alerts.log_file),
        notifier,
        config.alerts.bell,
    ));
    log::info!("Writing alerts to {}", config.alerts.log_file);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_shutdown().await;
        let _ = shutdown_tx.send(true);
    });

    let mut scheduler = Scheduler::new(
        source,
        sink,
        Arc::new(SystemClock::new()),
        ChangeDetector::new(config.detector_settings()),
        config.scheduler_settings(),
    );

    log::info!("Monitor is running. Press Ctrl+C to stop.");
    scheduler.run(shutdown_rx).await;

    log::info!("Shutdown complete. Goodbye!");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Failed to listen for control-c event: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                log::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => log::info!("Received Ctrl+C"),
        _ = terminate => log::info!("Received SIGTERM"),
    }
}
