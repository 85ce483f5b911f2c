use serde::{Deserialize, Serialize};

use crate::chart::TimePoint;

/// A tradable simulated stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub name: String,
    pub symbol: Option<String>,
    pub current_price: f64,
    /// Price history; present on the single-stock endpoint, usually omitted
    /// from the catalog listing.
    #[serde(default)]
    pub history: Vec<TimePoint>,
}

/// Confirmation returned by the buy/sell endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeReceipt {
    pub message: String,
}
