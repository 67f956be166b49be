use chrono::NaiveDate;
use serde::Serialize;

use crate::amount_utils::round2;
use crate::date_utils::{Granularity, MonthWindow};
use crate::models::{Category, EnrichedCustomField, MonthlyRecord, Transaction};

/// Validated request filter; echoed back in the dashboard response.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFilter {
    pub category_id: Option<i64>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub group_by: Granularity,
}

impl DashboardFilter {
    pub fn month_window(&self) -> MonthWindow {
        MonthWindow::new(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsSummary {
    pub count: usize,
    pub total_amount: f64,
    pub average_amount: f64,
    pub min_amount: f64,
    pub max_amount: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

impl TransactionsSummary {
    /// Amounts are rounded to cents. Raw sums live on [`MonthlyRecordDetail`].
    pub fn from_transactions(transactions: &[EnrichedTransaction]) -> Self {
        if transactions.is_empty() {
            return Self {
                count: 0,
                total_amount: 0.0,
                average_amount: 0.0,
                min_amount: 0.0,
                max_amount: 0.0,
                first_date: None,
                last_date: None,
            };
        }

        let amounts = transactions.iter().map(|t| t.transaction.amount);
        let count = transactions.len();
        let total_amount: f64 = amounts.clone().sum();
        let min_amount = amounts.clone().fold(f64::INFINITY, f64::min);
        let max_amount = amounts.fold(f64::NEG_INFINITY, f64::max);

        let mut dates: Vec<NaiveDate> = transactions
            .iter()
            .map(|t| t.transaction.transaction_date)
            .collect();
        dates.sort();

        Self {
            count,
            total_amount: round2(total_amount),
            average_amount: round2(total_amount / count as f64),
            min_amount: round2(min_amount),
            max_amount: round2(max_amount),
            first_date: dates.first().copied(),
            last_date: dates.last().copied(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedTransaction {
    #[serde(flatten)]
    pub transaction: Transaction,
    pub custom_fields: Vec<EnrichedCustomField>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRecordDetail {
    #[serde(flatten)]
    pub record: MonthlyRecord,
    pub transactions_summary: TransactionsSummary,
    pub transactions: Vec<EnrichedTransaction>,
}

impl MonthlyRecordDetail {
    /// Unrounded sum of the record's transaction amounts.
    pub fn transactions_total(&self) -> f64 {
        self.transactions.iter().map(|t| t.transaction.amount).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDetail {
    pub category: Category,
    pub monthly_records: Vec<MonthlyRecordDetail>,
}

impl CategoryDetail {
    pub fn transactions(&self) -> impl Iterator<Item = &EnrichedTransaction> {
        self.monthly_records.iter().flat_map(|r| r.transactions.iter())
    }

    pub fn transaction_count(&self) -> usize {
        self.monthly_records
            .iter()
            .map(|r| r.transactions_summary.count)
            .sum()
    }

    pub fn total_amount(&self) -> f64 {
        self.monthly_records
            .iter()
            .map(MonthlyRecordDetail::transactions_total)
            .sum()
    }
}

/// The normalized category → record → transaction tree every projection reads.
///
/// Built once per request by the assembler; there is no mutable access.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DetailedData(Vec<CategoryDetail>);

impl DetailedData {
    pub fn new(categories: Vec<CategoryDetail>) -> Self {
        Self(categories)
    }

    pub fn categories(&self) -> &[CategoryDetail] {
        &self.0
    }

    /// Every transaction with its owning category and record, in encounter order.
    pub fn transactions(
        &self,
    ) -> impl Iterator<Item = (&CategoryDetail, &MonthlyRecordDetail, &EnrichedTransaction)> {
        self.0.iter().flat_map(|category| {
            category.monthly_records.iter().flat_map(move |record| {
                record
                    .transactions
                    .iter()
                    .map(move |transaction| (category, record, transaction))
            })
        })
    }

    pub fn records(&self) -> impl Iterator<Item = (&CategoryDetail, &MonthlyRecordDetail)> {
        self.0
            .iter()
            .flat_map(|category| category.monthly_records.iter().map(move |r| (category, r)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: i64, amount: f64, day: u32) -> EnrichedTransaction {
        EnrichedTransaction {
            transaction: Transaction {
                id,
                monthly_record_id: 1,
                title: format!("t{}", id),
                description: None,
                amount,
                transaction_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            },
            custom_fields: Vec::new(),
        }
    }

    #[test]
    fn test_summary_of_empty_transactions_is_zeroed() {
        let summary = TransactionsSummary::from_transactions(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.average_amount, 0.0);
        assert_eq!(summary.min_amount, 0.0);
        assert_eq!(summary.max_amount, 0.0);
        assert_eq!(summary.first_date, None);
        assert_eq!(summary.last_date, None);
    }

    #[test]
    fn test_summary_statistics() {
        let summary =
            TransactionsSummary::from_transactions(&[tx(1, 75.5, 20), tx(2, 50.0, 15)]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_amount, 125.5);
        assert_eq!(summary.average_amount, 62.75);
        assert_eq!(summary.min_amount, 50.0);
        assert_eq!(summary.max_amount, 75.5);
        assert_eq!(summary.first_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(summary.last_date, NaiveDate::from_ymd_opt(2024, 1, 20));
    }

    #[test]
    fn test_summary_amounts_are_rounded_to_cents() {
        let summary = TransactionsSummary::from_transactions(&[
            tx(1, 0.1, 1),
            tx(2, 0.2, 2),
            tx(3, 0.05, 3),
        ]);
        assert_eq!(summary.total_amount, 0.35);
        assert_eq!(summary.average_amount, 0.12);
        assert_eq!(summary.min_amount, 0.05);
        assert_eq!(summary.max_amount, 0.2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["totalAmount"], 0.35);
        assert_eq!(json["averageAmount"], 0.12);
    }
}
