use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub monthly_record_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub transaction_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewTransaction {
    pub monthly_record_id: i64,
    pub title: String,
    pub description: Option<String>,
    /// Raw amount as entered; stored verbatim and coerced when read.
    pub amount: String,
    pub transaction_date: NaiveDate,
}
