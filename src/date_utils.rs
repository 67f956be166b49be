use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Time-bucketing resolution for period based projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

impl FromStr for Granularity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(()),
        }
    }
}

impl Granularity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    pub fn all() -> &'static [Granularity] {
        &[Self::Day, Self::Week, Self::Month, Self::Year]
    }
}

/// Sortable bucket key. Lexicographic order equals calendar order.
///
/// Weeks follow ISO-8601: they start on Monday and belong to the year that
/// contains their Thursday, so early-January dates may land in the previous
/// year's last week (e.g. 2021-01-01 is `2020-W53`).
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%Y-%m-%d").to_string(),
        Granularity::Week => {
            let week = date.iso_week();
            format!("{:04}-W{:02}", week.year(), week.week())
        }
        Granularity::Month => date.format("%Y-%m").to_string(),
        Granularity::Year => format!("{:04}", date.year()),
    }
}

/// Human readable label matching [`period_key`].
pub fn period_label(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Day => date.format("%B %-d, %Y").to_string(),
        Granularity::Week => {
            let week = date.iso_week();
            format!("Week {}, {}", week.week(), week.year())
        }
        Granularity::Month => date.format("%B %Y").to_string(),
        Granularity::Year => date.year().to_string(),
    }
}

pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn month_index(year: i32, month: u32) -> i64 {
    year as i64 * 12 + month as i64 - 1
}

/// Inclusive calendar-month window derived from optional start/end dates.
///
/// Only the year and month of each bound matter: a record dated March passes a
/// window starting on March 31st. Missing bounds leave that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonthWindow {
    start: Option<i64>,
    end: Option<i64>,
}

impl MonthWindow {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start.map(|d| month_index(d.year(), d.month())),
            end: end.map(|d| month_index(d.year(), d.month())),
        }
    }

    pub fn contains(&self, year: i32, month: u32) -> bool {
        let idx = month_index(year, month);
        self.start.map_or(true, |s| idx >= s) && self.end.map_or(true, |e| idx <= e)
    }
}
