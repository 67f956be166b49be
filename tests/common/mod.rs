//! Shared test utilities for integration tests.
//!
//! `TestClient` drives the router against a fresh in-memory database and
//! offers helpers to seed users, categories, records, transactions and custom
//! fields directly through the query layer.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use http_body_util::BodyExt;
use monthkeep::config::Config;
use monthkeep::db::queries::{
    categories, custom_fields, monthly_records, record_types, transactions, users,
};
use monthkeep::db::{create_in_memory_pool, migrations, DbPool};
use monthkeep::handlers;
use monthkeep::models::{
    CustomFieldType, NewCategory, NewCustomFieldDefinition, NewMonthlyRecord, NewTransaction,
    NewUser,
};
use monthkeep::state::AppState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

pub struct TestClient {
    state: AppState,
}

impl TestClient {
    /// Create a new test client with a fresh, migrated in-memory database.
    pub fn new() -> Self {
        let pool = create_in_memory_pool().expect("Failed to create in-memory pool");
        {
            let conn = pool.get().expect("Failed to get connection");
            migrations::run_migrations(&conn, Path::new("migrations"))
                .expect("Failed to run migrations");
        }

        let config = Config {
            host: "127.0.0.1".into(),
            port: 7171,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
        };

        let state = AppState {
            db: pool,
            config: Arc::new(config),
        };

        Self { state }
    }

    pub fn router(&self) -> Router {
        handlers::routes().with_state(self.state.clone())
    }

    pub fn pool(&self) -> &DbPool {
        &self.state.db
    }

    /// Make a GET request and return status and body.
    pub async fn get(&self, uri: &str) -> (StatusCode, String) {
        let response = self
            .router()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    /// GET and parse the body as JSON.
    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let (status, body) = self.get(uri).await;
        let parsed = serde_json::from_str(&body)
            .unwrap_or_else(|e| panic!("invalid JSON from {}: {} ({})", uri, e, body));
        (status, parsed)
    }

    // =========================================================================
    // Seeding helpers
    // =========================================================================

    pub fn create_user(&self, name: &str) -> i64 {
        let conn = self.pool().get().unwrap();
        users::create_user(
            &conn,
            &NewUser {
                name: name.into(),
                email: format!("{}@example.com", name.to_lowercase()),
            },
        )
        .unwrap()
    }

    pub fn create_record_type(&self, name: &str) -> i64 {
        let conn = self.pool().get().unwrap();
        record_types::create_record_type(&conn, name).unwrap()
    }

    pub fn create_category(
        &self,
        user_id: i64,
        name: &str,
        category_type: Option<&str>,
        record_type_id: Option<i64>,
    ) -> i64 {
        let conn = self.pool().get().unwrap();
        categories::create_category(
            &conn,
            &NewCategory {
                user_id,
                name: name.into(),
                description: None,
                category_type: category_type.map(String::from),
                record_type_id,
            },
        )
        .unwrap()
    }

    pub fn create_record(
        &self,
        category_id: i64,
        month: u32,
        year: i32,
        initial_balance: f64,
        goal: Option<f64>,
    ) -> i64 {
        let conn = self.pool().get().unwrap();
        monthly_records::create_monthly_record(
            &conn,
            &NewMonthlyRecord {
                category_id,
                title: format!("{}/{}", month, year),
                goal,
                initial_balance,
                month,
                year,
                status: Some("active".into()),
            },
        )
        .unwrap()
    }

    pub fn create_transaction(&self, record_id: i64, title: &str, amount: &str, date: &str) -> i64 {
        let conn = self.pool().get().unwrap();
        transactions::create_transaction(
            &conn,
            &NewTransaction {
                monthly_record_id: record_id,
                title: title.into(),
                description: None,
                amount: amount.into(),
                transaction_date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            },
        )
        .unwrap()
    }

    pub fn create_field(
        &self,
        user_id: i64,
        record_type_id: Option<i64>,
        label: &str,
        field_type: CustomFieldType,
    ) -> i64 {
        let conn = self.pool().get().unwrap();
        custom_fields::create_definition(
            &conn,
            &NewCustomFieldDefinition {
                user_id,
                record_type_id,
                category_id: None,
                label: label.into(),
                field_type,
            },
        )
        .unwrap()
    }

    pub fn set_field_value(&self, transaction_id: i64, field_id: i64, value: &str) {
        let conn = self.pool().get().unwrap();
        custom_fields::set_value(&conn, transaction_id, field_id, value).unwrap();
    }
}

impl Default for TestClient {
    fn default() -> Self {
        Self::new()
    }
}
