use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::date_utils::parse_iso_date;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomFieldType {
    Text,
    Number,
    Date,
    Monetary,
    Multiple,
    /// Value whose definition could not be resolved.
    Unknown,
}

impl FromStr for CustomFieldType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "number" => Ok(Self::Number),
            "date" => Ok(Self::Date),
            "monetary" => Ok(Self::Monetary),
            "multiple" | "multiselect" => Ok(Self::Multiple),
            _ => Err(()),
        }
    }
}

impl CustomFieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Monetary => "monetary",
            Self::Multiple => "multiple",
            Self::Unknown => "unknown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldDefinition {
    pub id: i64,
    pub user_id: i64,
    pub record_type_id: Option<i64>,
    pub category_id: Option<i64>,
    pub label: String,
    pub field_type: CustomFieldType,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomFieldDefinition {
    pub user_id: i64,
    pub record_type_id: Option<i64>,
    pub category_id: Option<i64>,
    pub label: String,
    pub field_type: CustomFieldType,
}

/// A value row exactly as stored: text, with multi-select values kept as a
/// JSON string array.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredFieldValue {
    pub id: i64,
    pub transaction_id: i64,
    pub field_id: i64,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CustomFieldValue {
    Text(String),
    Number(f64),
    Monetary(f64),
    Date(NaiveDate),
    Multiple(Vec<String>),
}

impl CustomFieldValue {
    /// Interpret stored text according to the declared field type.
    ///
    /// Numbers and dates that fail to parse are kept as text rather than
    /// dropped or zeroed.
    pub fn parse(raw: &str, field_type: CustomFieldType) -> Self {
        match field_type {
            CustomFieldType::Text => Self::Text(raw.to_string()),
            CustomFieldType::Number => parse_finite(raw)
                .map(Self::Number)
                .unwrap_or_else(|| Self::Text(raw.to_string())),
            CustomFieldType::Monetary => parse_finite(raw)
                .map(Self::Monetary)
                .unwrap_or_else(|| Self::Text(raw.to_string())),
            CustomFieldType::Date => parse_iso_date(raw)
                .map(Self::Date)
                .unwrap_or_else(|| Self::Text(raw.to_string())),
            CustomFieldType::Multiple => Self::Multiple(parse_options(raw)),
            CustomFieldType::Unknown => match serde_json::from_str::<Vec<String>>(raw) {
                Ok(options) => Self::Multiple(options),
                Err(_) => Self::Text(raw.to_string()),
            },
        }
    }

    /// Key used when grouping values. Multi-select options collapse into one
    /// comma-separated composite key.
    pub fn group_key(&self) -> String {
        self.to_string()
    }

    /// Numeric contribution to running sums, only for numeric kinds.
    pub fn numeric(&self) -> Option<f64> {
        match self {
            Self::Number(n) | Self::Monetary(n) => Some(*n),
            Self::Text(_) | Self::Date(_) | Self::Multiple(_) => None,
        }
    }
}

impl fmt::Display for CustomFieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) | Self::Monetary(n) => write!(f, "{}", n),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Multiple(options) => f.write_str(&options.join(", ")),
        }
    }
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_options(raw: &str) -> Vec<String> {
    serde_json::from_str::<Vec<String>>(raw).unwrap_or_else(|_| {
        raw.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedCustomField {
    pub label: String,
    pub value: CustomFieldValue,
    #[serde(rename = "type")]
    pub field_type: CustomFieldType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_by_declared_type() {
        assert_eq!(
            CustomFieldValue::parse("12.5", CustomFieldType::Number),
            CustomFieldValue::Number(12.5)
        );
        assert_eq!(
            CustomFieldValue::parse("30", CustomFieldType::Monetary),
            CustomFieldValue::Monetary(30.0)
        );
        assert_eq!(
            CustomFieldValue::parse("2024-02-01", CustomFieldType::Date),
            CustomFieldValue::Date(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap())
        );
        assert_eq!(
            CustomFieldValue::parse("12.5", CustomFieldType::Text),
            CustomFieldValue::Text("12.5".into())
        );
    }

    #[test]
    fn test_unparsable_numbers_stay_text() {
        let value = CustomFieldValue::parse("about ten", CustomFieldType::Number);
        assert_eq!(value, CustomFieldValue::Text("about ten".into()));
        assert_eq!(value.numeric(), None);
    }

    #[test]
    fn test_multiple_accepts_json_and_plain_lists() {
        assert_eq!(
            CustomFieldValue::parse(r#"["red","blue"]"#, CustomFieldType::Multiple),
            CustomFieldValue::Multiple(vec!["red".into(), "blue".into()])
        );
        assert_eq!(
            CustomFieldValue::parse("red, blue,", CustomFieldType::Multiple),
            CustomFieldValue::Multiple(vec!["red".into(), "blue".into()])
        );
    }

    #[test]
    fn test_group_key_joins_multiple_selection() {
        let value = CustomFieldValue::Multiple(vec!["a".into(), "b".into()]);
        assert_eq!(value.group_key(), "a, b");
        assert_eq!(CustomFieldValue::Number(12.0).group_key(), "12");
        assert_eq!(CustomFieldValue::Monetary(2.5).group_key(), "2.5");
    }

    #[test]
    fn test_serializes_untagged() {
        let field = EnrichedCustomField {
            label: "Tags".into(),
            value: CustomFieldValue::Multiple(vec!["x".into()]),
            field_type: CustomFieldType::Multiple,
        };
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["label"], "Tags");
        assert_eq!(json["value"], serde_json::json!(["x"]));
        assert_eq!(json["type"], "multiple");
    }

    #[test]
    fn test_field_type_from_str() {
        assert_eq!("Monetary".parse::<CustomFieldType>(), Ok(CustomFieldType::Monetary));
        assert_eq!("multiselect".parse::<CustomFieldType>(), Ok(CustomFieldType::Multiple));
        assert!("color".parse::<CustomFieldType>().is_err());
    }
}
