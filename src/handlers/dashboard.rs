use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use crate::date_utils::{parse_iso_date, Granularity};
use crate::error::{AppError, AppResult};
use crate::models::DashboardFilter;
use crate::services::dashboard::{generate_dashboard, DashboardData};
use crate::services::source::SqliteSource;
use crate::state::AppState;

/// Raw query parameters. Everything arrives as text so that bad input is
/// reported as a validation error rather than an extractor rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardParams {
    pub user_id: Option<String>,
    pub category_id: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub group_by: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn parse_date_param(name: &str, value: &Option<String>) -> AppResult<Option<NaiveDate>> {
    non_empty(value)
        .map(|raw| {
            parse_iso_date(raw).ok_or_else(|| {
                AppError::Validation(format!("{} must be a date in YYYY-MM-DD format", name))
            })
        })
        .transpose()
}

impl DashboardParams {
    /// Check the parameters and turn them into a user id and filter.
    pub fn validate(&self) -> AppResult<(i64, DashboardFilter)> {
        let user_id = non_empty(&self.user_id)
            .ok_or_else(|| AppError::Validation("userId is required".into()))?
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| AppError::Validation("userId must be a positive integer".into()))?;

        let category_id = non_empty(&self.category_id)
            .map(|raw| {
                raw.parse::<i64>()
                    .map_err(|_| AppError::Validation("categoryId must be an integer".into()))
            })
            .transpose()?;

        let start_date = parse_date_param("startDate", &self.start_date)?;
        let end_date = parse_date_param("endDate", &self.end_date)?;
        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(AppError::Validation(
                    "endDate must not be before startDate".into(),
                ));
            }
        }

        let group_by = match non_empty(&self.group_by) {
            Some(raw) => raw.parse::<Granularity>().map_err(|_| {
                AppError::Validation(format!(
                    "groupBy must be one of: {}",
                    Granularity::all()
                        .iter()
                        .map(|g| g.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })?,
            None => Granularity::default(),
        };

        Ok((
            user_id,
            DashboardFilter {
                category_id,
                start_date,
                end_date,
                group_by,
            },
        ))
    }
}

pub async fn dashboard_data(
    State(state): State<AppState>,
    params: Result<Query<DashboardParams>, QueryRejection>,
) -> AppResult<Json<DashboardData>> {
    let Query(params) = params.map_err(|rejection| {
        AppError::Validation(format!("Invalid query string: {}", rejection.body_text()))
    })?;
    let (user_id, filter) = params.validate()?;
    debug!(user_id, ?filter, "Loading dashboard data");

    let conn = state.db.get()?;
    let source = SqliteSource::new(&conn);
    let data = generate_dashboard(&source, user_id, &filter)?;

    Ok(Json(data))
}
