use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Free-form tag chosen by the user.
    #[serde(rename = "type")]
    pub category_type: Option<String>,
    pub record_type_id: Option<i64>,
    pub record_type_name: Option<String>,
}

impl Category {
    pub fn type_or_default(&self) -> &str {
        self.category_type
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }

    pub fn record_type_or_default(&self) -> &str {
        self.record_type_name
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(UNKNOWN_LABEL)
    }
}

/// Placeholder for absent free-form labels.
pub const UNKNOWN_LABEL: &str = "Unknown";

#[derive(Debug, Clone, Deserialize)]
pub struct NewCategory {
    pub user_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub category_type: Option<String>,
    pub record_type_id: Option<i64>,
}
