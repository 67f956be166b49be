//! In-memory [`DashboardSource`] for unit tests.

use std::cell::Cell;
use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;

use crate::error::AppResult;
use crate::models::{
    Category, CustomFieldDefinition, CustomFieldType, DashboardFilter, DetailedData,
    MonthlyRecord, StoredFieldValue, Transaction, User,
};
use crate::services::assembler::build_detailed_data;
use crate::services::source::DashboardSource;

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[derive(Default)]
pub(crate) struct MemorySource {
    user_id: i64,
    users: Vec<User>,
    categories: Vec<Category>,
    records: Vec<MonthlyRecord>,
    transactions: Vec<Transaction>,
    definitions: Vec<CustomFieldDefinition>,
    values: Vec<StoredFieldValue>,
    definition_lookups: Cell<usize>,
    value_lookups: Cell<usize>,
}

impl MemorySource {
    pub(crate) fn with_user(user_id: i64) -> Self {
        Self {
            user_id,
            users: vec![User {
                id: user_id,
                name: "Test User".into(),
                email: "test@example.com".into(),
            }],
            ..Default::default()
        }
    }

    pub(crate) fn add_category(
        &mut self,
        id: i64,
        user_id: i64,
        name: &str,
        record_type_id: Option<i64>,
    ) -> &mut Category {
        self.categories.push(Category {
            id,
            user_id,
            name: name.into(),
            description: None,
            category_type: None,
            record_type_id,
            record_type_name: record_type_id.map(|id| format!("Type {}", id)),
        });
        self.categories.last_mut().unwrap()
    }

    pub(crate) fn add_record(
        &mut self,
        id: i64,
        category_id: i64,
        month: u32,
        year: i32,
        initial_balance: f64,
        goal: Option<f64>,
    ) -> &mut MonthlyRecord {
        self.records.push(MonthlyRecord {
            id,
            category_id,
            title: format!("Record {}", id),
            goal,
            initial_balance,
            month,
            year,
            status: None,
        });
        self.records.last_mut().unwrap()
    }

    pub(crate) fn add_transaction(
        &mut self,
        id: i64,
        record_id: i64,
        amount: f64,
        transaction_date: NaiveDate,
    ) {
        self.transactions.push(Transaction {
            id,
            monthly_record_id: record_id,
            title: format!("Transaction {}", id),
            description: None,
            amount,
            transaction_date,
        });
    }

    pub(crate) fn add_definition(
        &mut self,
        id: i64,
        record_type_id: Option<i64>,
        label: &str,
        field_type: CustomFieldType,
    ) {
        self.definitions.push(CustomFieldDefinition {
            id,
            user_id: self.user_id,
            record_type_id,
            category_id: None,
            label: label.into(),
            field_type,
        });
    }

    pub(crate) fn add_value(&mut self, transaction_id: i64, field_id: i64, value: &str) {
        let id = self.values.len() as i64 + 1;
        self.values.push(StoredFieldValue {
            id,
            transaction_id,
            field_id,
            value: value.into(),
        });
    }

    pub(crate) fn definition_lookups(&self) -> usize {
        self.definition_lookups.get()
    }

    pub(crate) fn value_lookups(&self) -> usize {
        self.value_lookups.get()
    }

    /// Assemble the whole source without filters.
    pub(crate) fn detailed(&self) -> DetailedData {
        build_detailed_data(self, self.user_id, &DashboardFilter::default()).unwrap()
    }
}

impl DashboardSource for MemorySource {
    fn find_user(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn find_category(&self, user_id: i64, category_id: i64) -> AppResult<Option<Category>> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.user_id == user_id && c.id == category_id)
            .cloned())
    }

    fn list_categories(&self, user_id: i64) -> AppResult<Vec<Category>> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    fn list_monthly_records(
        &self,
        _user_id: i64,
        category_id: i64,
    ) -> AppResult<Vec<MonthlyRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.category_id == category_id)
            .cloned()
            .collect())
    }

    fn transactions_for(&self, record_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Transaction>>> {
        let mut grouped: HashMap<i64, Vec<Transaction>> = HashMap::new();
        for t in &self.transactions {
            if record_ids.contains(&t.monthly_record_id) {
                grouped.entry(t.monthly_record_id).or_default().push(t.clone());
            }
        }
        Ok(grouped)
    }

    fn field_definitions(
        &self,
        record_type_id: Option<i64>,
        _category_id: i64,
        user_id: i64,
    ) -> AppResult<Vec<CustomFieldDefinition>> {
        self.definition_lookups.set(self.definition_lookups.get() + 1);
        Ok(self
            .definitions
            .iter()
            .filter(|d| d.user_id == user_id && d.record_type_id == record_type_id)
            .cloned()
            .collect())
    }

    fn fetch_values_for(
        &self,
        transaction_ids: &HashSet<i64>,
    ) -> AppResult<HashMap<i64, Vec<StoredFieldValue>>> {
        self.value_lookups.set(self.value_lookups.get() + 1);
        let mut grouped: HashMap<i64, Vec<StoredFieldValue>> = HashMap::new();
        for v in &self.values {
            if transaction_ids.contains(&v.transaction_id) {
                grouped.entry(v.transaction_id).or_default().push(v.clone());
            }
        }
        Ok(grouped)
    }
}
