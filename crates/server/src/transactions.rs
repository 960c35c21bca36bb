//! Transactions API endpoints

use api_types::transaction::{
    TransactionCreated, TransactionKind as ApiKind, TransactionListResponse, TransactionNew,
    TransactionView,
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

fn map_kind(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

fn unmap_kind(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

pub async fn list(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let engine = state.engine.read().await;
    let transactions = engine
        .list_transactions(auth.id)?
        .into_iter()
        .map(|tx| TransactionView {
            id: tx.id,
            kind: map_kind(tx.kind),
            amount_minor: tx.amount.minor(),
            category: tx.category.clone(),
            note: tx.note.clone(),
            occurred_at: tx.occurred_at,
        })
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn create(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let id = engine.add_transaction(
        auth.id,
        unmap_kind(payload.kind),
        Money::new(payload.amount_minor),
        &payload.category,
        payload.note.as_deref(),
        payload.occurred_at.unwrap_or_else(Utc::now),
    )?;
    Ok((StatusCode::CREATED, Json(TransactionCreated { id })))
}

pub async fn remove(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    let mut engine = state.engine.write().await;
    engine.delete_transaction(auth.id, id)?;
    Ok(StatusCode::NO_CONTENT)
}
