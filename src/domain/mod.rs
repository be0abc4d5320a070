// src/domain/mod.rs
pub mod errors;
pub mod models;

// Re-export common types for convenience
pub use errors::{
    AlertError, AlertResult, AppError, AppResult, FetchError, FetchResult, NotifyError,
    NotifyResult,
};
pub use models::{Alert, PriceSnapshot, Sample};
