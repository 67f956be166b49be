//! Chart-ready projections over [`DetailedData`].
//!
//! Every generator is a pure function of the detailed data (and, for the
//! period based ones, a [`Granularity`]). Intermediate grouping uses local
//! `BTreeMap` accumulators so output order is deterministic; nothing keyed by
//! hash order ever reaches a response.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::amount_utils::{percent_shares, ratio_percent, round2};
use crate::date_utils::{period_key, period_label, Granularity};
use crate::models::{Category, CustomFieldType, DetailedData};

pub const TOP_TRANSACTIONS_LIMIT: usize = 5;

/// Amount bins as `(label, inclusive lower bound, exclusive upper bound)`.
pub const HISTOGRAM_BINS: [(&str, f64, Option<f64>); 5] = [
    ("0-10", 0.0, Some(10.0)),
    ("10-50", 10.0, Some(50.0)),
    ("50-100", 50.0, Some(100.0)),
    ("100-200", 100.0, Some(200.0)),
    ("200+", 200.0, None),
];

struct CategoryTotals<'a> {
    category: &'a Category,
    records: usize,
    transactions: usize,
    amount: f64,
}

fn category_totals(data: &DetailedData) -> Vec<CategoryTotals<'_>> {
    data.categories()
        .iter()
        .map(|detail| CategoryTotals {
            category: &detail.category,
            records: detail.monthly_records.len(),
            transactions: detail.transaction_count(),
            amount: detail.total_amount(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub category_id: i64,
    pub category_name: String,
    pub category_type: String,
    pub record_type_name: String,
    pub records_count: usize,
    pub transactions_count: usize,
    pub total_amount: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_categories: usize,
    pub total_records: usize,
    pub total_transactions: usize,
    pub total_amount: f64,
    pub categories_breakdown: Vec<CategoryBreakdown>,
}

pub fn summary(data: &DetailedData) -> Summary {
    let totals = category_totals(data);
    let amounts: Vec<f64> = totals.iter().map(|t| t.amount).collect();
    let shares = percent_shares(&amounts);

    let categories_breakdown = totals
        .iter()
        .zip(shares)
        .map(|(t, percentage)| CategoryBreakdown {
            category_id: t.category.id,
            category_name: t.category.name.clone(),
            category_type: t.category.type_or_default().to_string(),
            record_type_name: t.category.record_type_or_default().to_string(),
            records_count: t.records,
            transactions_count: t.transactions,
            total_amount: round2(t.amount),
            percentage,
        })
        .collect();

    Summary {
        total_categories: totals.len(),
        total_records: totals.iter().map(|t| t.records).sum(),
        total_transactions: totals.iter().map(|t| t.transactions).sum(),
        total_amount: round2(amounts.iter().sum()),
        categories_breakdown,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieSlice {
    pub category_id: i64,
    pub label: String,
    pub value: f64,
    pub percentage: f64,
}

pub fn pie_chart_data(data: &DetailedData) -> Vec<PieSlice> {
    let totals = category_totals(data);
    let amounts: Vec<f64> = totals.iter().map(|t| t.amount).collect();

    totals
        .iter()
        .zip(percent_shares(&amounts))
        .map(|(t, percentage)| PieSlice {
            category_id: t.category.id,
            label: t.category.name.clone(),
            value: round2(t.amount),
            percentage,
        })
        .collect()
}

/// Share of transactions per category. `value` is a count.
pub fn transaction_count_pie_chart(data: &DetailedData) -> Vec<PieSlice> {
    let totals = category_totals(data);
    let counts: Vec<f64> = totals.iter().map(|t| t.transactions as f64).collect();

    totals
        .iter()
        .zip(percent_shares(&counts))
        .map(|(t, percentage)| PieSlice {
            category_id: t.category.id,
            label: t.category.name.clone(),
            value: t.transactions as f64,
            percentage,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarEntry {
    pub category_id: i64,
    pub label: String,
    pub total_amount: f64,
    pub transactions_count: usize,
    pub records_count: usize,
}

pub fn bar_chart_data(data: &DetailedData) -> Vec<BarEntry> {
    category_totals(data)
        .into_iter()
        .map(|t| BarEntry {
            category_id: t.category.id,
            label: t.category.name.clone(),
            total_amount: round2(t.amount),
            transactions_count: t.transactions,
            records_count: t.records,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    pub category_id: i64,
    pub label: String,
    pub transactions_count: usize,
    pub total_amount: f64,
    pub average_amount: f64,
}

pub fn scatter_data(data: &DetailedData) -> Vec<ScatterPoint> {
    category_totals(data)
        .into_iter()
        .map(|t| ScatterPoint {
            category_id: t.category.id,
            label: t.category.name.clone(),
            transactions_count: t.transactions,
            total_amount: round2(t.amount),
            average_amount: if t.transactions > 0 {
                round2(t.amount / t.transactions as f64)
            } else {
                0.0
            },
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodCategoryAmount {
    pub category_id: i64,
    pub category_name: String,
    pub total_amount: f64,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSeriesPoint {
    pub period: String,
    pub label: String,
    pub total_amount: f64,
    pub transaction_count: usize,
    pub categories: Vec<PeriodCategoryAmount>,
}

pub fn time_series(data: &DetailedData, granularity: Granularity) -> Vec<TimeSeriesPoint> {
    struct PeriodAcc {
        label: String,
        amount: f64,
        count: usize,
        // (name, id) keeps the breakdown ordered by name
        categories: BTreeMap<(String, i64), (f64, usize)>,
    }

    let mut periods: BTreeMap<String, PeriodAcc> = BTreeMap::new();

    for (category, _, transaction) in data.transactions() {
        let date = transaction.transaction.transaction_date;
        let acc = periods
            .entry(period_key(date, granularity))
            .or_insert_with(|| PeriodAcc {
                label: period_label(date, granularity),
                amount: 0.0,
                count: 0,
                categories: BTreeMap::new(),
            });

        acc.amount += transaction.transaction.amount;
        acc.count += 1;

        let entry = acc
            .categories
            .entry((category.category.name.clone(), category.category.id))
            .or_insert((0.0, 0));
        entry.0 += transaction.transaction.amount;
        entry.1 += 1;
    }

    periods
        .into_iter()
        .map(|(period, acc)| TimeSeriesPoint {
            period,
            label: acc.label,
            total_amount: round2(acc.amount),
            transaction_count: acc.count,
            categories: acc
                .categories
                .into_iter()
                .map(|((category_name, category_id), (amount, count))| PeriodCategoryAmount {
                    category_id,
                    category_name,
                    total_amount: round2(amount),
                    transaction_count: count,
                })
                .collect(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateBucket {
    pub period: String,
    pub label: String,
    pub count: usize,
}

/// Transaction counts per period, without amounts.
pub fn transaction_date_histogram(data: &DetailedData, granularity: Granularity) -> Vec<DateBucket> {
    let mut buckets: BTreeMap<String, (String, usize)> = BTreeMap::new();

    for (_, _, transaction) in data.transactions() {
        let date = transaction.transaction.transaction_date;
        buckets
            .entry(period_key(date, granularity))
            .or_insert_with(|| (period_label(date, granularity), 0))
            .1 += 1;
    }

    buckets
        .into_iter()
        .map(|(period, (label, count))| DateBucket {
            period,
            label,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistogramBin {
    pub range: String,
    pub min: f64,
    pub max: Option<f64>,
    pub count: usize,
}

fn histogram_bin_index(amount: f64) -> usize {
    HISTOGRAM_BINS
        .iter()
        .position(|(_, _, max)| max.map_or(true, |m| amount < m))
        .unwrap_or(HISTOGRAM_BINS.len() - 1)
}

/// Count of transactions per fixed amount bin. Empty bins are kept.
pub fn transaction_histogram(data: &DetailedData) -> Vec<HistogramBin> {
    let mut counts = [0usize; HISTOGRAM_BINS.len()];
    for (_, _, transaction) in data.transactions() {
        counts[histogram_bin_index(transaction.transaction.amount)] += 1;
    }

    HISTOGRAM_BINS
        .iter()
        .zip(counts)
        .map(|((range, min, max), count)| HistogramBin {
            range: range.to_string(),
            min: *min,
            max: *max,
            count,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopTransaction {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub amount: f64,
    pub transaction_date: NaiveDate,
    pub category_id: i64,
    pub category_name: String,
    pub record_title: String,
}

/// The largest transactions, highest first. Equal amounts keep encounter order.
pub fn top_transactions(data: &DetailedData) -> Vec<TopTransaction> {
    let mut all: Vec<TopTransaction> = data
        .transactions()
        .map(|(category, record, transaction)| TopTransaction {
            id: transaction.transaction.id,
            title: transaction.transaction.title.clone(),
            description: transaction.transaction.description.clone(),
            amount: transaction.transaction.amount,
            transaction_date: transaction.transaction.transaction_date,
            category_id: category.category.id,
            category_name: category.category.name.clone(),
            record_title: record.record.title.clone(),
        })
        .collect();

    // sort_by is stable
    all.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    all.truncate(TOP_TRANSACTIONS_LIMIT);
    all
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub record_id: i64,
    pub title: String,
    pub category_id: i64,
    pub category_name: String,
    pub month: u32,
    pub year: i32,
    pub goal: Option<f64>,
    pub initial_balance: f64,
    pub transactions_total: f64,
    pub current_total: f64,
    pub progress: f64,
    pub status: String,
}

/// One entry per monthly record. Progress is 0 unless the goal is a positive number.
pub fn goal_progress(data: &DetailedData) -> Vec<GoalProgress> {
    data.records()
        .map(|(category, detail)| {
            let record = &detail.record;
            let transactions_total = detail.transactions_total();
            let current_total = record.initial_balance + transactions_total;
            let progress = record
                .positive_goal()
                .map(|goal| ratio_percent(current_total, goal))
                .unwrap_or(0.0);

            GoalProgress {
                record_id: record.id,
                title: record.title.clone(),
                category_id: category.category.id,
                category_name: category.category.name.clone(),
                month: record.month,
                year: record.year,
                goal: record.goal,
                initial_balance: round2(record.initial_balance),
                transactions_total: round2(transactions_total),
                current_total: round2(current_total),
                progress,
                status: record.status_or_default().to_string(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionEntry {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

fn distribution<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<DistributionEntry> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }

    let values: Vec<f64> = counts.values().map(|c| *c as f64).collect();
    counts
        .into_iter()
        .zip(percent_shares(&values))
        .map(|((label, count), percentage)| DistributionEntry {
            label: label.to_string(),
            count,
            percentage,
        })
        .collect()
}

/// Monthly records per status label.
pub fn status_distribution(data: &DetailedData) -> Vec<DistributionEntry> {
    distribution(data.records().map(|(_, r)| r.record.status_or_default()))
}

/// Categories per free-form category type.
pub fn category_type_distribution(data: &DetailedData) -> Vec<DistributionEntry> {
    distribution(data.categories().iter().map(|c| c.category.type_or_default()))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldSlice {
    pub value: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldPieChart {
    pub field_label: String,
    pub field_type: CustomFieldType,
    pub total_count: usize,
    pub total_sum: f64,
    pub data: Vec<CustomFieldSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldValueCount {
    pub value: String,
    pub count: usize,
    pub sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldAggregate {
    pub field_label: String,
    pub field_type: CustomFieldType,
    pub total_sum: f64,
    pub values: Vec<CustomFieldValueCount>,
}

struct FieldAcc {
    field_type: CustomFieldType,
    total_sum: f64,
    values: BTreeMap<String, (usize, f64)>,
}

/// Group every custom-field value by field label, then by value key.
fn accumulate_custom_fields(data: &DetailedData) -> BTreeMap<String, FieldAcc> {
    let mut fields: BTreeMap<String, FieldAcc> = BTreeMap::new();

    for (_, _, transaction) in data.transactions() {
        for field in &transaction.custom_fields {
            let acc = fields.entry(field.label.clone()).or_insert_with(|| FieldAcc {
                field_type: field.field_type,
                total_sum: 0.0,
                values: BTreeMap::new(),
            });

            let entry = acc.values.entry(field.value.group_key()).or_insert((0, 0.0));
            entry.0 += 1;
            if let Some(n) = field.value.numeric() {
                entry.1 += n;
                acc.total_sum += n;
            }
        }
    }

    fields
}

pub fn custom_field_pie_charts(data: &DetailedData) -> Vec<CustomFieldPieChart> {
    accumulate_custom_fields(data)
        .into_iter()
        .map(|(field_label, acc)| {
            let counts: Vec<f64> = acc.values.values().map(|(c, _)| *c as f64).collect();
            let total_count: usize = acc.values.values().map(|(c, _)| c).sum();
            let slices = acc
                .values
                .into_iter()
                .zip(percent_shares(&counts))
                .map(|((value, (count, _)), percentage)| CustomFieldSlice {
                    value,
                    count,
                    percentage,
                })
                .collect();

            CustomFieldPieChart {
                field_label,
                field_type: acc.field_type,
                total_count,
                total_sum: round2(acc.total_sum),
                data: slices,
            }
        })
        .collect()
}

pub fn custom_field_value_counts(data: &DetailedData) -> Vec<CustomFieldAggregate> {
    accumulate_custom_fields(data)
        .into_iter()
        .map(|(field_label, acc)| CustomFieldAggregate {
            field_label,
            field_type: acc.field_type,
            total_sum: round2(acc.total_sum),
            values: acc
                .values
                .into_iter()
                .map(|(value, (count, sum))| CustomFieldValueCount {
                    value,
                    count,
                    sum: round2(sum),
                })
                .collect(),
        })
        .collect()
}

/// Every projection of one dashboard request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Projections {
    pub summary: Summary,
    pub pie_chart_data: Vec<PieSlice>,
    pub bar_chart_data: Vec<BarEntry>,
    pub time_series_data: Vec<TimeSeriesPoint>,
    pub scatter_data: Vec<ScatterPoint>,
    pub custom_field_pie_charts: Vec<CustomFieldPieChart>,
    pub top_transactions: Vec<TopTransaction>,
    pub transaction_histogram: Vec<HistogramBin>,
    pub goal_progress_data: Vec<GoalProgress>,
    pub transaction_count_pie_chart: Vec<PieSlice>,
    pub status_distribution: Vec<DistributionEntry>,
    pub category_type_bar_chart: Vec<DistributionEntry>,
    pub custom_field_value_counts: Vec<CustomFieldAggregate>,
    pub transaction_date_histogram: Vec<DateBucket>,
}

impl Projections {
    pub fn generate(data: &DetailedData, granularity: Granularity) -> Self {
        Self {
            summary: summary(data),
            pie_chart_data: pie_chart_data(data),
            bar_chart_data: bar_chart_data(data),
            time_series_data: time_series(data, granularity),
            scatter_data: scatter_data(data),
            custom_field_pie_charts: custom_field_pie_charts(data),
            top_transactions: top_transactions(data),
            transaction_histogram: transaction_histogram(data),
            goal_progress_data: goal_progress(data),
            transaction_count_pie_chart: transaction_count_pie_chart(data),
            status_distribution: status_distribution(data),
            category_type_bar_chart: category_type_distribution(data),
            custom_field_value_counts: custom_field_value_counts(data),
            transaction_date_histogram: transaction_date_histogram(data, granularity),
        }
    }
}
