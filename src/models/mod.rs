//! JSON shapes of the Stocksim backend contract.
//!
//! Pricing, balances, and trade execution all live on the server; these
//! structs only mirror what it sends back.

use serde::Deserialize;

pub mod portfolio;
pub mod stock;
pub mod student;

pub use portfolio::{Dashboard, Holding, StudentPortfolio};
pub use stock::{Stock, TradeReceipt};
pub use student::StudentSummary;

/// Response from the login endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: String,
}
