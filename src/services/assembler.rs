//! Joins categories, monthly records, transactions and custom-field values
//! into the [`DetailedData`] tree.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::date_utils::MonthWindow;
use crate::error::{AppError, AppResult};
use crate::models::category::UNKNOWN_LABEL;
use crate::models::{
    Category, CategoryDetail, CustomFieldDefinition, CustomFieldType, CustomFieldValue,
    DashboardFilter, DetailedData, EnrichedCustomField, EnrichedTransaction, MonthlyRecordDetail,
    StoredFieldValue, TransactionsSummary,
};
use crate::services::source::DashboardSource;

pub fn build_detailed_data<S: DashboardSource + ?Sized>(
    source: &S,
    user_id: i64,
    filter: &DashboardFilter,
) -> AppResult<DetailedData> {
    let categories = resolve_categories(source, user_id, filter.category_id)?;
    if categories.is_empty() {
        return Err(AppError::NotFound(match filter.category_id {
            Some(id) => format!("Category {} not found", id),
            None => "No categories found for this user".to_string(),
        }));
    }

    let window = filter.month_window();
    let mut details = Vec::with_capacity(categories.len());
    for category in categories {
        details.push(build_category(source, user_id, category, &window)?);
    }

    let data = DetailedData::new(details);
    debug!(
        user_id,
        categories = data.categories().len(),
        records = data.records().count(),
        transactions = data.transactions().count(),
        "Assembled detailed data"
    );
    Ok(data)
}

fn resolve_categories<S: DashboardSource + ?Sized>(
    source: &S,
    user_id: i64,
    category_id: Option<i64>,
) -> AppResult<Vec<Category>> {
    match category_id {
        Some(id) => Ok(source.find_category(user_id, id)?.into_iter().collect()),
        None => source.list_categories(user_id),
    }
}

fn build_category<S: DashboardSource + ?Sized>(
    source: &S,
    user_id: i64,
    category: Category,
    window: &MonthWindow,
) -> AppResult<CategoryDetail> {
    let records: Vec<_> = source
        .list_monthly_records(user_id, category.id)?
        .into_iter()
        .filter(|r| window.contains(r.year, r.month))
        .collect();

    let record_ids: Vec<i64> = records.iter().map(|r| r.id).collect();
    let mut transactions_by_record = source.transactions_for(&record_ids)?;

    let transaction_ids: HashSet<i64> = transactions_by_record
        .values()
        .flatten()
        .map(|t| t.id)
        .collect();
    let mut values_by_transaction = if transaction_ids.is_empty() {
        HashMap::new()
    } else {
        source.fetch_values_for(&transaction_ids)?
    };

    // Definitions are only needed once some transaction actually has values.
    let definitions: HashMap<i64, CustomFieldDefinition> = if values_by_transaction.is_empty() {
        HashMap::new()
    } else {
        source
            .field_definitions(category.record_type_id, category.id, user_id)?
            .into_iter()
            .map(|d| (d.id, d))
            .collect()
    };

    let monthly_records = records
        .into_iter()
        .map(|record| {
            let transactions: Vec<EnrichedTransaction> = transactions_by_record
                .remove(&record.id)
                .unwrap_or_default()
                .into_iter()
                .map(|transaction| {
                    let values = values_by_transaction
                        .remove(&transaction.id)
                        .unwrap_or_default();
                    EnrichedTransaction {
                        custom_fields: enrich_values(&values, &definitions),
                        transaction,
                    }
                })
                .collect();

            MonthlyRecordDetail {
                transactions_summary: TransactionsSummary::from_transactions(&transactions),
                record,
                transactions,
            }
        })
        .collect();

    Ok(CategoryDetail {
        category,
        monthly_records,
    })
}

/// Resolve stored values against definitions. A value whose definition is
/// missing is kept under the placeholder label with an unknown type.
fn enrich_values(
    values: &[StoredFieldValue],
    definitions: &HashMap<i64, CustomFieldDefinition>,
) -> Vec<EnrichedCustomField> {
    values
        .iter()
        .map(|stored| match definitions.get(&stored.field_id) {
            Some(definition) => EnrichedCustomField {
                label: definition.label.clone(),
                value: CustomFieldValue::parse(&stored.value, definition.field_type),
                field_type: definition.field_type,
            },
            None => EnrichedCustomField {
                label: UNKNOWN_LABEL.to_string(),
                value: CustomFieldValue::parse(&stored.value, CustomFieldType::Unknown),
                field_type: CustomFieldType::Unknown,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fixtures::{date, MemorySource};

    #[test]
    fn test_no_categories_is_not_found() {
        let source = MemorySource::with_user(1);
        let err = build_detailed_data(&source, 1, &DashboardFilter::default()).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_unknown_category_filter_is_not_found() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", None);

        let filter = DashboardFilter {
            category_id: Some(99),
            ..Default::default()
        };
        let err = build_detailed_data(&source, 1, &filter).unwrap_err();
        assert!(matches!(err, AppError::NotFound(ref m) if m.contains("99")));
    }

    #[test]
    fn test_category_filter_resolves_single_category() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", None);
        source.add_category(11, 1, "Travel", None);

        let filter = DashboardFilter {
            category_id: Some(11),
            ..Default::default()
        };
        let data = build_detailed_data(&source, 1, &filter).unwrap();
        assert_eq!(data.categories().len(), 1);
        assert_eq!(data.categories()[0].category.name, "Travel");
    }

    #[test]
    fn test_records_are_summarized() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", None);
        source.add_record(100, 10, 1, 2024, 100.0, Some(1000.0));
        source.add_transaction(1000, 100, 50.0, date(2024, 1, 15));
        source.add_transaction(1001, 100, 75.5, date(2024, 1, 20));

        let data = build_detailed_data(&source, 1, &DashboardFilter::default()).unwrap();
        let record = &data.categories()[0].monthly_records[0];
        assert_eq!(record.transactions.len(), 2);
        assert_eq!(record.transactions_summary.count, 2);
        assert_eq!(record.transactions_summary.total_amount, 125.5);
        assert_eq!(record.transactions_summary.first_date, Some(date(2024, 1, 15)));
    }

    #[test]
    fn test_month_window_filters_records_before_summaries() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", None);
        source.add_record(100, 10, 1, 2024, 0.0, None);
        source.add_record(101, 10, 3, 2024, 0.0, None);
        source.add_transaction(1000, 100, 10.0, date(2024, 1, 3));
        source.add_transaction(1001, 101, 20.0, date(2024, 3, 3));

        let filter = DashboardFilter {
            start_date: Some(date(2024, 3, 31)),
            end_date: Some(date(2024, 12, 1)),
            ..Default::default()
        };
        let data = build_detailed_data(&source, 1, &filter).unwrap();
        let records = &data.categories()[0].monthly_records;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].record.id, 101);
        assert_eq!(data.transactions().count(), 1);
    }

    #[test]
    fn test_no_date_filter_keeps_all_records() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", None);
        source.add_record(100, 10, 1, 2020, 0.0, None);
        source.add_record(101, 10, 12, 2030, 0.0, None);

        let data = build_detailed_data(&source, 1, &DashboardFilter::default()).unwrap();
        assert_eq!(data.categories()[0].monthly_records.len(), 2);
    }

    #[test]
    fn test_custom_fields_resolve_with_fallback() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", Some(5));
        source.add_record(100, 10, 1, 2024, 0.0, None);
        source.add_transaction(1000, 100, 10.0, date(2024, 1, 3));
        source.add_definition(7, Some(5), "Store", CustomFieldType::Text);
        source.add_value(1000, 7, "Corner shop");
        source.add_value(1000, 8, "orphan");

        let data = build_detailed_data(&source, 1, &DashboardFilter::default()).unwrap();
        let fields = &data.categories()[0].monthly_records[0].transactions[0].custom_fields;
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0].label, "Store");
        assert_eq!(fields[0].value, CustomFieldValue::Text("Corner shop".into()));
        assert_eq!(fields[1].label, "Unknown");
        assert_eq!(fields[1].field_type, CustomFieldType::Unknown);
    }

    #[test]
    fn test_definitions_not_fetched_without_values() {
        let mut source = MemorySource::with_user(1);
        source.add_category(10, 1, "Food", Some(5));
        source.add_record(100, 10, 1, 2024, 0.0, None);
        source.add_transaction(1000, 100, 10.0, date(2024, 1, 3));

        build_detailed_data(&source, 1, &DashboardFilter::default()).unwrap();
        assert_eq!(source.definition_lookups(), 0);
        assert_eq!(source.value_lookups(), 1);
    }
}
