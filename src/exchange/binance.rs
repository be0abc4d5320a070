// src/exchange/binance.rs
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::models::PriceSnapshot;
use crate::exchange::client::PriceSource;
use async_trait::async_trait;
use binance_spot_connector_rust::{hyper::BinanceHttpClient, market};
use hyper::client::HttpConnector;
use hyper_tls::HttpsConnector;
use serde::Deserialize;
use std::time::Duration;

pub const BINANCE_API_URL: &str = "https://api.binance.com";

/// Entry of the `/api/v3/ticker/price` response
#[derive(Debug, Deserialize)]
struct TickerPrice {
    symbol: String,
    price: String,
}

/// Binance public ticker client
pub struct BinanceClient {
    client: BinanceHttpClient<HttpsConnector<HttpConnector>>,
    timeout: Duration,
}

impl BinanceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: BinanceHttpClient::with_url(base_url),
            timeout,
        }
    }

    async fn ticker_prices(&self) -> FetchResult<String> {
        let response = self
            .client
            .send(market::ticker_price())
            .await
            .map_err(|e| FetchError::Request(format!("{:?}", e)))?;

        response
            .into_body_str()
            .await
            .map_err(|e| FetchError::Http(format!("{:?}", e)))
    }
}

#[async_trait]
impl PriceSource for BinanceClient {
    async fn fetch_prices(&self) -> FetchResult<PriceSnapshot> {
        let body = tokio::time::timeout(self.timeout, self.ticker_prices())
            .await
            .map_err(|_| FetchError::Timeout(self.timeout))??;

        let snapshot = parse_ticker_prices(&body)?;
        log::debug!("Fetched {} ticker prices", snapshot.len());
        Ok(snapshot)
    }
}

/// Parse a ticker price array into a snapshot. Any malformed entry fails the whole batch.
pub fn parse_ticker_prices(body: &str) -> FetchResult<PriceSnapshot> {
    let tickers: Vec<TickerPrice> = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("Failed to parse ticker prices: {}", e)))?;

    tickers
        .into_iter()
        .map(|ticker| {
            let price = ticker.price.parse::<f64>().map_err(|e| {
                FetchError::Parse(format!(
                    "Invalid price {:?} for {}: {}",
                    ticker.price, ticker.symbol, e
                ))
            })?;
            Ok((ticker.symbol, price))
        })
        .collect()
}
