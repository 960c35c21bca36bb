//! Trips API endpoints, including the split calculation.

use api_types::split::{BalanceView, SettlementView, SplitResponse};
use api_types::trip::{
    ExpenseCreated, ExpenseNew, ExpenseView, TripCreated, TripListResponse, TripNew, TripView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use engine::Money;
use uuid::Uuid;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

fn trip_view(trip: &engine::Trip) -> TripView {
    TripView {
        id: trip.id,
        name: trip.name.clone(),
        participants: trip.participants.clone(),
        emails: trip.emails.clone(),
        expenses: trip
            .expenses
            .iter()
            .map(|e| ExpenseView {
                id: e.id,
                description: e.description.clone(),
                amount_minor: e.amount.minor(),
                paid_by: e.paid_by.clone(),
                created_at: e.created_at,
            })
            .collect(),
        created_at: trip.created_at,
    }
}

pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<TripListResponse>, ServerError> {
    let engine = state.engine.read().await;
    let trips = engine
        .list_trips(auth.id)?
        .into_iter()
        .map(trip_view)
        .collect();
    Ok(Json(TripListResponse { trips }))
}

pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TripNew>,
) -> Result<(StatusCode, Json<TripCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let id = engine.new_trip(
        auth.id,
        &payload.name,
        payload.participants,
        payload.emails,
        Utc::now(),
    )?;
    Ok((StatusCode::CREATED, Json(TripCreated { id })))
}

pub async fn get(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TripView>, ServerError> {
    let engine = state.engine.read().await;
    let trip = engine.trip(auth.id, id)?;
    Ok(Json(trip_view(trip)))
}

pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine.delete_trip(auth.id, id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn expense_new(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let expense_id = engine.add_trip_expense(
        auth.id,
        id,
        &payload.description,
        Money::new(payload.amount_minor),
        &payload.paid_by,
        Utc::now(),
    )?;
    Ok((StatusCode::CREATED, Json(ExpenseCreated { id: expense_id })))
}

pub async fn expense_remove(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path((id, expense_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine.remove_trip_expense(auth.id, id, expense_id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /trips/{id}/split — recomputes balances and settlement transfers for
/// the current expense history.
pub async fn split(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SplitResponse>, ServerError> {
    let engine = state.engine.read().await;
    let summary = engine.split_trip(auth.id, id)?;

    Ok(Json(SplitResponse {
        total_minor: summary.total.minor(),
        per_head_minor: summary.per_head.minor(),
        balances: summary
            .balances
            .iter()
            .map(|b| BalanceView {
                participant: b.participant.clone(),
                amount_minor: b.amount.minor(),
            })
            .collect(),
        settlements: summary
            .transfers
            .iter()
            .map(|t| SettlementView {
                from: t.from.clone(),
                to: t.to.clone(),
                amount_minor: t.amount.minor(),
            })
            .collect(),
    }))
}
