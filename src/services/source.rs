use std::collections::{HashMap, HashSet};

use rusqlite::Connection;

use crate::db::queries::{categories, custom_fields, monthly_records, transactions, users};
use crate::error::AppResult;
use crate::models::{
    Category, CustomFieldDefinition, MonthlyRecord, StoredFieldValue, Transaction, User,
};

/// Everything the dashboard engine reads from persistence.
///
/// Lookups that fan out over many rows take id sets and return grouped maps,
/// so an implementation can answer each in a single round trip.
pub trait DashboardSource {
    fn find_user(&self, user_id: i64) -> AppResult<Option<User>>;

    fn find_category(&self, user_id: i64, category_id: i64) -> AppResult<Option<Category>>;

    fn list_categories(&self, user_id: i64) -> AppResult<Vec<Category>>;

    fn list_monthly_records(&self, user_id: i64, category_id: i64)
        -> AppResult<Vec<MonthlyRecord>>;

    fn transactions_for(&self, record_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Transaction>>>;

    fn field_definitions(
        &self,
        record_type_id: Option<i64>,
        category_id: i64,
        user_id: i64,
    ) -> AppResult<Vec<CustomFieldDefinition>>;

    fn fetch_values_for(
        &self,
        transaction_ids: &HashSet<i64>,
    ) -> AppResult<HashMap<i64, Vec<StoredFieldValue>>>;
}

/// [`DashboardSource`] backed by a borrowed SQLite connection.
pub struct SqliteSource<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSource<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl DashboardSource for SqliteSource<'_> {
    fn find_user(&self, user_id: i64) -> AppResult<Option<User>> {
        Ok(users::get_user(self.conn, user_id)?)
    }

    fn find_category(&self, user_id: i64, category_id: i64) -> AppResult<Option<Category>> {
        Ok(categories::get_category(self.conn, user_id, category_id)?)
    }

    fn list_categories(&self, user_id: i64) -> AppResult<Vec<Category>> {
        Ok(categories::list_categories(self.conn, user_id)?)
    }

    fn list_monthly_records(
        &self,
        user_id: i64,
        category_id: i64,
    ) -> AppResult<Vec<MonthlyRecord>> {
        Ok(monthly_records::list_monthly_records(
            self.conn,
            user_id,
            category_id,
        )?)
    }

    fn transactions_for(&self, record_ids: &[i64]) -> AppResult<HashMap<i64, Vec<Transaction>>> {
        Ok(transactions::list_transactions_for_records(
            self.conn, record_ids,
        )?)
    }

    fn field_definitions(
        &self,
        record_type_id: Option<i64>,
        category_id: i64,
        user_id: i64,
    ) -> AppResult<Vec<CustomFieldDefinition>> {
        Ok(custom_fields::list_definitions(
            self.conn,
            record_type_id,
            category_id,
            user_id,
        )?)
    }

    fn fetch_values_for(
        &self,
        transaction_ids: &HashSet<i64>,
    ) -> AppResult<HashMap<i64, Vec<StoredFieldValue>>> {
        Ok(custom_fields::list_values_for_transactions(
            self.conn,
            transaction_ids,
        )?)
    }
}
