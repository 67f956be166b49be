use serde::Serialize;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{DashboardFilter, DetailedData};
use crate::services::assembler::build_detailed_data;
use crate::services::consolidated_view::{consolidate, CustomChartsData};
use crate::services::projections::Projections;
use crate::services::source::DashboardSource;

/// The full dashboard response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(flatten)]
    pub projections: Projections,
    pub detailed_data: DetailedData,
    pub filters: DashboardFilter,
    pub custom_charts_data: CustomChartsData,
}

/// Build every projection for one user in a single pass.
///
/// Validation and not-found errors reach the caller unchanged; any other
/// failure is reported as a server error and no partial result is returned.
pub fn generate_dashboard<S: DashboardSource + ?Sized>(
    source: &S,
    user_id: i64,
    filter: &DashboardFilter,
) -> AppResult<DashboardData> {
    build(source, user_id, filter).map_err(|e| e.into_server("Failed to generate dashboard data"))
}

fn build<S: DashboardSource + ?Sized>(
    source: &S,
    user_id: i64,
    filter: &DashboardFilter,
) -> AppResult<DashboardData> {
    if source.find_user(user_id)?.is_none() {
        return Err(AppError::NotFound(format!("User {} not found", user_id)));
    }

    let detailed_data = build_detailed_data(source, user_id, filter)?;
    let projections = Projections::generate(&detailed_data, filter.group_by);
    let custom_charts_data = consolidate(&projections);

    debug!(
        user_id,
        group_by = filter.group_by.as_str(),
        periods = projections.time_series_data.len(),
        "Generated dashboard"
    );

    Ok(DashboardData {
        projections,
        detailed_data,
        filters: filter.clone(),
        custom_charts_data,
    })
}
