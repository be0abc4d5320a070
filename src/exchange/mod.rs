// src/exchange/mod.rs
pub mod binance;
pub mod client;

pub use binance::BinanceClient;
pub use client::PriceSource;
