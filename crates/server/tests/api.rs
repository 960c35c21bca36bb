use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::Engine as _;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app() -> Router {
    server::app(engine::Engine::new())
}

fn basic_auth(email: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{email}:{password}"));
    format!("Basic {encoded}")
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    auth: Option<(&str, &str)>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((email, password)) = auth {
        builder = builder.header(header::AUTHORIZATION, basic_auth(email, password));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup(app: &Router, name: &str, email: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/signup",
        None,
        Some(json!({"name": name, "email": email, "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

const ASHA: (&str, &str) = ("asha@example.com", "password");
const BELA: (&str, &str) = ("bela@example.com", "password");

#[tokio::test]
async fn signup_and_profile_roundtrip() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    let (status, profile) = send(&app, "GET", "/user", Some(ASHA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["email"], "asha@example.com");
    assert_eq!(profile["name"], "Asha");
    assert!(profile.get("password").is_none());
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    let (status, _) = send(
        &app,
        "POST",
        "/signup",
        None,
        Some(json!({"name": "Other", "email": "asha@example.com", "password": "password"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn protected_routes_require_credentials() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    // Missing header is rejected by the extractor, wrong password by the
    // auth middleware.
    let (status, _) = send(&app, "GET", "/user", None, None).await;
    assert!(status.is_client_error());

    let (status, _) = send(&app, "GET", "/user", Some(("asha@example.com", "nope")), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn transaction_lifecycle() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    let (status, created) = send(
        &app,
        "POST",
        "/transactions",
        Some(ASHA),
        Some(json!({
            "kind": "income",
            "amount_minor": 50_000_00i64,
            "category": "salary",
            "note": null,
            "occurred_at": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let income_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(ASHA),
        Some(json!({
            "kind": "expense",
            "amount_minor": 1_200_00i64,
            "category": "food",
            "note": "lunch",
            "occurred_at": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, listed) = send(&app, "GET", "/transactions", Some(ASHA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["transactions"].as_array().unwrap().len(), 2);

    let (status, stats) = send(&app, "GET", "/stats", Some(ASHA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_income_minor"], 50_000_00i64);
    assert_eq!(stats["total_expenses_minor"], 1_200_00i64);
    assert_eq!(stats["net_balance_minor"], 48_800_00i64);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/transactions/{income_id}"),
        Some(ASHA),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/transactions/{income_id}"),
        Some(ASHA),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn budget_upsert_replaces_and_reports_spend() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    // No month in the body, so both writes land on the current month.
    for limit in [10_000_00i64, 12_000_00i64] {
        let (status, _) = send(
            &app,
            "POST",
            "/budgets",
            Some(ASHA),
            Some(json!({"category": "food", "limit_minor": limit})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/budgets",
        Some(ASHA),
        Some(json!({"category": "travel", "month": "2019-06", "limit_minor": 5_000_00i64})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        "POST",
        "/transactions",
        Some(ASHA),
        Some(json!({
            "kind": "expense",
            "amount_minor": 2_000_00i64,
            "category": "food",
            "note": null,
            "occurred_at": null,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Default listing covers the current month only.
    let (status, listed) = send(&app, "GET", "/budgets", Some(ASHA), None).await;
    assert_eq!(status, StatusCode::OK);
    let budgets = listed["budgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["limit_minor"], 12_000_00i64);
    assert_eq!(budgets[0]["spent_minor"], 2_000_00i64);

    let (status, listed) = send(&app, "GET", "/budgets?month=2019-06", Some(ASHA), None).await;
    assert_eq!(status, StatusCode::OK);
    let budgets = listed["budgets"].as_array().unwrap();
    assert_eq!(budgets.len(), 1);
    assert_eq!(budgets[0]["category"], "travel");
    assert_eq!(budgets[0]["spent_minor"], 0);

    let (status, listed) = send(&app, "GET", "/budgets/all", Some(ASHA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["budgets"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn trip_split_flow() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    let (status, created) = send(
        &app,
        "POST",
        "/trips",
        Some(ASHA),
        Some(json!({
            "name": "Goa",
            "participants": ["Asha", "Bela", "Chitra"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let trip_id = created["id"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        "POST",
        &format!("/trips/{trip_id}/expenses"),
        Some(ASHA),
        Some(json!({"description": "Hotel", "amount_minor": 90_00i64, "paid_by": "Asha"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // A payer outside the participant list is rejected.
    let (status, _) = send(
        &app,
        "POST",
        &format!("/trips/{trip_id}/expenses"),
        Some(ASHA),
        Some(json!({"description": "Taxi", "amount_minor": 10_00i64, "paid_by": "Dev"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, split) = send(
        &app,
        "GET",
        &format!("/trips/{trip_id}/split"),
        Some(ASHA),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(split["total_minor"], 90_00i64);
    assert_eq!(split["per_head_minor"], 30_00i64);
    let settlements = split["settlements"].as_array().unwrap();
    assert_eq!(settlements.len(), 2);
    for settlement in settlements {
        assert_eq!(settlement["to"], "Asha");
        assert_eq!(settlement["amount_minor"], 30_00i64);
    }
}

#[tokio::test]
async fn shared_trip_visible_to_member_but_owner_only_delete() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;
    signup(&app, "Bela", BELA.0).await;

    let (status, created) = send(
        &app,
        "POST",
        "/trips",
        Some(ASHA),
        Some(json!({
            "name": "Goa",
            "participants": ["Asha", "Bela"],
            "emails": ["bela@example.com"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let trip_id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, "GET", "/trips", Some(BELA), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["trips"].as_array().unwrap().len(), 1);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/trips/{trip_id}"),
        Some(BELA),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/trips/{trip_id}"),
        Some(ASHA),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn statement_extraction_filters_by_window() {
    let app = app();
    signup(&app, "Asha", ASHA.0).await;

    let text = "Jan 05, 2026   7:42 pm   DEBIT\u{20b9}1,250Paid to Sharma Tea Stall\n\
                Feb 02, 2026   9:10 am   CREDIT\u{20b9}500Received from Bela\n";

    let (status, extracted) = send(
        &app,
        "POST",
        "/statement",
        Some(ASHA),
        Some(json!({"text": text, "from_date": "2026-01-01", "to_date": "2026-01-31"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = extracted["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["kind"], "DEBIT");
    assert_eq!(entries[0]["amount_minor"], 1250_00i64);
    assert_eq!(entries[0]["description"], "Paid to Sharma Tea Stall");

    let (status, _) = send(
        &app,
        "POST",
        "/statement",
        Some(ASHA),
        Some(json!({"text": text, "from_date": "2026-02-01", "to_date": "2026-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
