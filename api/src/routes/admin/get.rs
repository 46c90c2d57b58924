use axum::extract::State;
use db::reports::{self, Overview};
use util::state::AppState;

use crate::response::{ApiResult, ok};

/// GET /api/admin/overview
///
/// Row counts of every table.
///
/// ```json
/// { "users": 12, "courses": 4, "class_sessions": 48, "attendance_records": 120, ... }
/// ```
pub async fn overview(State(state): State<AppState>) -> ApiResult<Overview> {
    let overview = reports::overview(state.db()).await?;
    ok(overview, "Overview retrieved successfully")
}
