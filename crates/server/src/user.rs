//! User API endpoints

use api_types::user::{Signup, UserCreated, UserView};
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
};
use chrono::Utc;

use crate::{
    ServerError,
    server::{AuthUser, ServerState},
};

/// POST /signup (unauthenticated).
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<Signup>,
) -> Result<(StatusCode, Json<UserCreated>), ServerError> {
    let mut engine = state.engine.write().await;
    let id = engine.signup(&payload.name, &payload.email, &payload.password, Utc::now())?;
    tracing::info!("new user registered: {id}");
    Ok((StatusCode::CREATED, Json(UserCreated { id })))
}

/// GET /user — the authenticated user's profile.
pub async fn get(
    Extension(auth): Extension<AuthUser>,
    State(state): State<ServerState>,
) -> Result<Json<UserView>, ServerError> {
    let engine = state.engine.read().await;
    let user = engine.user(auth.id)?;
    Ok(Json(UserView {
        id: user.id,
        name: user.name.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
    }))
}
