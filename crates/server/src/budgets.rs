//! Budgets API endpoints

use api_types::budget::{
    BudgetCreated, BudgetListQuery, BudgetListResponse, BudgetUpsert, BudgetView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{Datelike, Utc};
use engine::{Budget, BudgetMonth, Money};
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

fn current_month() -> Result<BudgetMonth, ServerError> {
    let now = Utc::now();
    Ok(BudgetMonth::new(now.year(), now.month())?)
}

fn budget_view((budget, spent): (&Budget, Money)) -> BudgetView {
    BudgetView {
        id: budget.id,
        category: budget.category.clone(),
        month: budget.month.to_string(),
        limit_minor: budget.limit.minor(),
        spent_minor: spent.minor(),
    }
}

/// GET /budgets — budgets for one month (`?month=YYYY-MM`, default current).
pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Query(query): Query<BudgetListQuery>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let month = match query.month {
        Some(month) => BudgetMonth::try_from(month)?,
        None => current_month()?,
    };
    let engine = state.engine.read().await;
    let budgets = engine
        .budget_usage(auth.id, Some(month))?
        .into_iter()
        .map(budget_view)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

/// GET /budgets/all — every budget the user ever set, any month.
pub async fn list_all(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<BudgetListResponse>, ServerError> {
    let engine = state.engine.read().await;
    let budgets = engine
        .budget_usage(auth.id, None)?
        .into_iter()
        .map(budget_view)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

/// POST /budgets — creates or replaces the budget for `(category, month)`.
/// Defaults to the current month when the body omits one.
pub async fn upsert(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetUpsert>,
) -> Result<(StatusCode, Json<BudgetCreated>), ServerError> {
    let month = match payload.month {
        Some(month) => BudgetMonth::try_from(month)?,
        None => current_month()?,
    };
    let mut engine = state.engine.write().await;
    let id = engine.set_budget(
        auth.id,
        &payload.category,
        month,
        Money::new(payload.limit_minor),
    )?;
    Ok((StatusCode::CREATED, Json(BudgetCreated { id })))
}

pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine.delete_budget(auth.id, id)?;
    Ok(StatusCode::NO_CONTENT)
}
