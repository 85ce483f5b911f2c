use serde::{Deserialize, Serialize};

/// A student account as listed on the teacher's roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    pub id: i64,
    pub username: String,
    pub funds: Option<f64>,
}
