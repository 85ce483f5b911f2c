use serde::{Deserialize, Serialize};

use crate::chart::TimePoint;

/// A position in the student's portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Holding {
    pub name: String,
    pub symbol: Option<String>,
    pub quantity: f64,
    pub current_price: f64,
}

impl Holding {
    /// Market value of this position at the current price.
    pub fn market_value(&self) -> f64 {
        self.current_price * self.quantity
    }
}

/// Account figures shown on the student dashboard.
#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    /// Funds available for new purchases.
    pub usable_funds: f64,
}

/// A student's portfolio as seen by their teacher.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentPortfolio {
    #[serde(default)]
    pub portfolio: Vec<Holding>,
    #[serde(default)]
    pub portfolio_performance: Vec<TimePoint>,
}
