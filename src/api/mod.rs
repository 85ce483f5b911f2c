pub mod client;
pub mod error;

pub use client::{ApiClient, TradeAction};
pub use error::ApiError;
