//! Statistics API endpoint

use api_types::stats::Statistic;
use axum::{Extension, Json, extract::State};

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

/// GET /stats — income/expense totals over the user's whole history.
pub async fn get_stats(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<Statistic>, ServerError> {
    let engine = state.engine.read().await;
    let stats = engine.statistics(auth.id)?;

    Ok(Json(Statistic {
        total_income_minor: stats.total_income.minor(),
        total_expenses_minor: stats.total_expenses.minor(),
        net_balance_minor: stats.net_balance.minor(),
    }))
}
