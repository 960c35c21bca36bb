use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};

use std::sync::Arc;
use tokio::sync::RwLock;

use crate::{budgets, statement, statistics, transactions, trips, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<RwLock<Engine>>,
}

/// The authenticated caller, resolved from Basic auth by the middleware and
/// carried as a request extension.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: uuid::Uuid,
    pub email: String,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let auth_user = {
        let engine = state.engine.read().await;
        let user = engine
            .authenticate(auth_header.username(), auth_header.password())
            .map_err(|_| StatusCode::UNAUTHORIZED)?;
        AuthUser {
            id: user.id,
            email: user.email.clone(),
        }
    };

    request.extensions_mut().insert(auth_user);
    Ok(next.run(request).await)
}

/// Builds the full application router around an engine instance.
///
/// Exposed so tests can drive the router without binding a socket.
pub fn app(engine: Engine) -> Router {
    router(ServerState {
        engine: Arc::new(RwLock::new(engine)),
    })
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/user", get(user::get))
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route("/transactions/{id}", delete(transactions::remove))
        .route("/budgets", get(budgets::list).post(budgets::upsert))
        .route("/budgets/all", get(budgets::list_all))
        .route("/budgets/{id}", delete(budgets::remove))
        .route("/trips", get(trips::list).post(trips::create))
        .route("/trips/{id}", get(trips::get).delete(trips::remove))
        .route("/trips/{id}/expenses", post(trips::expense_new))
        .route(
            "/trips/{id}/expenses/{expense_id}",
            delete(trips::expense_remove),
        )
        .route("/trips/{id}/split", get(trips::split))
        .route("/statement", post(statement::extract))
        .route("/stats", get(statistics::get_stats))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        // Signup stays outside the auth layer.
        .route("/signup", post(user::signup))
        .with_state(state)
}

pub async fn run(engine: Engine) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(RwLock::new(engine)),
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
