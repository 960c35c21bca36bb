//! Statement extraction API endpoint

use api_types::statement::{EntryKind, EntryView, StatementExtract, StatementResponse};
use axum::Json;

use crate::ServerError;
use ingest::parsers::extract_phonepe_text;

/// POST /statement — scans extracted statement text for transaction rows
/// inside the requested date window.
pub async fn extract(
    Json(payload): Json<StatementExtract>,
) -> Result<Json<StatementResponse>, ServerError> {
    if payload.from_date > payload.to_date {
        return Err(ServerError::Generic(
            "from_date must not be after to_date".to_string(),
        ));
    }

    let entries = extract_phonepe_text(&payload.text, payload.from_date, payload.to_date)
        .map_err(|err| {
            tracing::error!("statement extraction failed: {err}");
            ServerError::Generic("could not parse statement".to_string())
        })?
        .into_iter()
        .map(|entry| EntryView {
            occurred_at: entry.occurred_at,
            description: entry.description,
            kind: match entry.kind {
                ingest::EntryKind::Debit => EntryKind::Debit,
                ingest::EntryKind::Credit => EntryKind::Credit,
            },
            amount_minor: entry.amount.minor(),
        })
        .collect();

    Ok(Json(StatementResponse { entries }))
}
