// src/exchange/client.rs
use crate::domain::errors::FetchResult;
use crate::domain::models::PriceSnapshot;
use async_trait::async_trait;

/// Source of full price snapshots
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch the current price of every listed symbol.
    ///
    /// Either the whole snapshot is returned or an error; never a partial map.
    async fn fetch_prices(&self) -> FetchResult<PriceSnapshot>;
}
