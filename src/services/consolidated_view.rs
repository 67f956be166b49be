//! Simplified chart groups re-keyed from already computed projections.
//!
//! Nothing here reads detailed data. Entries are only renamed, filtered or
//! regrouped, so the view must be rebuilt whenever its projections change.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::amount_utils::round2;
use crate::services::projections::Projections;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

impl ChartPoint {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordTypeGroup {
    pub record_type: String,
    pub total_amount: f64,
    pub transactions_count: usize,
    pub categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCharts {
    pub amount_distribution: Vec<ChartPoint>,
    pub transaction_count: Vec<ChartPoint>,
    pub by_record_type: Vec<RecordTypeGroup>,
    pub by_type: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomFieldChart {
    pub label: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCharts {
    pub top: Vec<ChartPoint>,
    pub amount_ranges: Vec<ChartPoint>,
    pub by_date: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySeries {
    pub category_id: i64,
    pub category_name: String,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvolutionCharts {
    pub totals: Vec<ChartPoint>,
    pub by_category: Vec<CategorySeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPoint {
    pub label: String,
    pub progress: f64,
    pub current_total: f64,
    pub goal: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressCharts {
    pub goals: Vec<GoalPoint>,
    pub by_status: Vec<ChartPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomChartsData {
    pub categories: CategoryCharts,
    pub custom_fields: Vec<CustomFieldChart>,
    pub transactions: TransactionCharts,
    pub evolution: EvolutionCharts,
    pub progress: ProgressCharts,
}

pub fn consolidate(projections: &Projections) -> CustomChartsData {
    CustomChartsData {
        categories: category_charts(projections),
        custom_fields: projections
            .custom_field_pie_charts
            .iter()
            .map(|chart| CustomFieldChart {
                label: chart.field_label.clone(),
                points: chart
                    .data
                    .iter()
                    .map(|slice| ChartPoint::new(slice.value.clone(), slice.count as f64))
                    .collect(),
            })
            .collect(),
        transactions: TransactionCharts {
            top: projections
                .top_transactions
                .iter()
                .map(|t| ChartPoint::new(t.title.clone(), t.amount))
                .collect(),
            amount_ranges: projections
                .transaction_histogram
                .iter()
                .filter(|bin| bin.count > 0)
                .map(|bin| ChartPoint::new(bin.range.clone(), bin.count as f64))
                .collect(),
            by_date: projections
                .transaction_date_histogram
                .iter()
                .map(|bucket| ChartPoint::new(bucket.label.clone(), bucket.count as f64))
                .collect(),
        },
        evolution: evolution_charts(projections),
        progress: ProgressCharts {
            goals: projections
                .goal_progress_data
                .iter()
                .filter_map(|g| {
                    g.goal.filter(|goal| *goal > 0.0).map(|goal| GoalPoint {
                        label: g.title.clone(),
                        progress: g.progress,
                        current_total: g.current_total,
                        goal,
                    })
                })
                .collect(),
            by_status: projections
                .status_distribution
                .iter()
                .map(|s| ChartPoint::new(s.label.clone(), s.count as f64))
                .collect(),
        },
    }
}

fn category_charts(projections: &Projections) -> CategoryCharts {
    let mut by_record_type: BTreeMap<&str, RecordTypeGroup> = BTreeMap::new();
    for breakdown in &projections.summary.categories_breakdown {
        let group = by_record_type
            .entry(breakdown.record_type_name.as_str())
            .or_insert_with(|| RecordTypeGroup {
                record_type: breakdown.record_type_name.clone(),
                total_amount: 0.0,
                transactions_count: 0,
                categories: Vec::new(),
            });
        group.total_amount = round2(group.total_amount + breakdown.total_amount);
        group.transactions_count += breakdown.transactions_count;
        group.categories.push(breakdown.category_name.clone());
    }

    CategoryCharts {
        amount_distribution: projections
            .pie_chart_data
            .iter()
            .filter(|slice| slice.value != 0.0)
            .map(|slice| ChartPoint::new(slice.label.clone(), slice.value))
            .collect(),
        transaction_count: projections
            .transaction_count_pie_chart
            .iter()
            .filter(|slice| slice.value > 0.0)
            .map(|slice| ChartPoint::new(slice.label.clone(), slice.value))
            .collect(),
        by_record_type: by_record_type.into_values().collect(),
        by_type: projections
            .category_type_bar_chart
            .iter()
            .map(|entry| ChartPoint::new(entry.label.clone(), entry.count as f64))
            .collect(),
    }
}

fn evolution_charts(projections: &Projections) -> EvolutionCharts {
    let mut by_category: BTreeMap<(&str, i64), Vec<ChartPoint>> = BTreeMap::new();
    for point in &projections.time_series_data {
        for category in &point.categories {
            by_category
                .entry((category.category_name.as_str(), category.category_id))
                .or_default()
                .push(ChartPoint::new(point.label.clone(), category.total_amount));
        }
    }

    EvolutionCharts {
        totals: projections
            .time_series_data
            .iter()
            .map(|point| ChartPoint::new(point.label.clone(), point.total_amount))
            .collect(),
        by_category: by_category
            .into_iter()
            .map(|((name, id), points)| CategorySeries {
                category_id: id,
                category_name: name.to_string(),
                points,
            })
            .collect(),
    }
}
