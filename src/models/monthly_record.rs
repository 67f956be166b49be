use serde::{Deserialize, Serialize};

use crate::models::category::UNKNOWN_LABEL;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecord {
    pub id: i64,
    pub category_id: i64,
    pub title: String,
    /// Target amount. `None` when unset or not a usable number.
    pub goal: Option<f64>,
    pub initial_balance: f64,
    pub month: u32,
    pub year: i32,
    pub status: Option<String>,
}

impl MonthlyRecord {
    pub fn status_or_default(&self) -> &str {
        self.status
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }

    /// The goal when it can be used as a divisor.
    pub fn positive_goal(&self) -> Option<f64> {
        self.goal.filter(|g| g.is_finite() && *g > 0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMonthlyRecord {
    pub category_id: i64,
    pub title: String,
    pub goal: Option<f64>,
    pub initial_balance: f64,
    pub month: u32,
    pub year: i32,
    pub status: Option<String>,
}
