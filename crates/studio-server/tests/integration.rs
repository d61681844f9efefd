use axum::http::StatusCode;
use http_body_util::BodyExt;
use serde_json::json;
use studio_core::config::{Config, Secrets};
use studio_server::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn app(dir: &TempDir) -> axum::Router {
    app_with(dir, Config::default(), Secrets::default())
}

fn app_with(dir: &TempDir, config: Config, secrets: Secrets) -> axum::Router {
    studio_core::Store::new(dir.path()).init("test").unwrap();
    studio_server::build_router_with(AppState::with_config(dir.path().to_path_buf(), config, secrets))
}

/// Config whose outbound clients point at a mock server.
fn mocked_config(server: &mockito::ServerGuard) -> Config {
    let mut config = Config::new("test");
    config.stripe.api_base = server.url();
    config.anthropic.api_base = server.url();
    config
}

fn stripe_secrets() -> Secrets {
    Secrets {
        stripe_secret_key: Some("sk_test_123".into()),
        anthropic_api_key: Some("anthropic-key".into()),
        clerk_webhook_secret: None,
    }
}

async fn send(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            axum::body::Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => axum::body::Body::empty(),
    };
    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// Send a GET request via `oneshot` and return (status, parsed JSON body).
async fn get(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "GET", uri, None).await
}

/// Send a POST request with a JSON body via `oneshot`.
async fn post_json(app: axum::Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    send(app, "POST", uri, Some(body)).await
}

async fn put_json(app: axum::Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
    send(app, "PUT", uri, Some(body)).await
}

async fn delete(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    send(app, "DELETE", uri, None).await
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_ok() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get(app(&dir), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "ok" }));
}

// ---------------------------------------------------------------------------
// Pillars and calendar
// ---------------------------------------------------------------------------

#[tokio::test]
async fn content_flows_from_pillar_to_calendar() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, json) = post_json(app.clone(), "/api/pillars", json!({ "name": "Recipes" })).await;
    assert_eq!(status, StatusCode::OK);
    let pillar_id = json["id"].as_str().unwrap().to_string();

    let (status, item) = post_json(
        app.clone(),
        &format!("/api/pillars/{pillar_id}/content"),
        json!({ "title": "Five-minute pasta", "format": "reel", "blob": { "hook": "Dinner in 5" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["pillar_id"], pillar_id.as_str());
    let content_id = item["id"].as_str().unwrap().to_string();

    let (status, cal) = post_json(
        app.clone(),
        &format!("/api/pillars/{pillar_id}/content/{content_id}/send-to-calendar"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cal["ready"].as_array().unwrap().len(), 1);
    assert_eq!(cal["scheduled"].as_array().unwrap().len(), 0);

    // Sending the same item twice is a conflict.
    let (status, _) = post_json(
        app.clone(),
        &format!("/api/pillars/{pillar_id}/content/{content_id}/send-to-calendar"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, cal) = post_json(
        app.clone(),
        &format!("/api/calendar/{content_id}/schedule"),
        json!({ "date": "2026-03-14" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(cal["ready"].as_array().unwrap().is_empty());
    assert_eq!(cal["scheduled"][0]["scheduled_date"], "2026-03-14");
    assert_eq!(cal["scheduled"][0]["status"], "scheduled");

    let (_, month) = get(app.clone(), "/api/calendar/month?year=2026&month=3").await;
    assert_eq!(month["2026-03-14"][0]["id"], content_id.as_str());

    let (status, cal) = post_json(
        app.clone(),
        &format!("/api/calendar/{content_id}/unschedule"),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cal["ready"].as_array().unwrap().len(), 1);
    assert!(cal["scheduled"].as_array().unwrap().is_empty());
    assert!(cal["ready"][0]["scheduled_date"].is_null());
}

#[tokio::test]
async fn schedule_rejects_bad_date() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(
        app(&dir),
        "/api/calendar/anything/schedule",
        json!({ "date": "14/03/2026" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("invalid date"));
}

/// Send a raw body, for payloads `serde_json` would never produce.
async fn send_raw(
    app: axum::Router,
    uri: &str,
    content_type: Option<&str>,
    body: &'static str,
) -> (StatusCode, serde_json::Value) {
    let mut builder = axum::http::Request::builder().method("POST").uri(uri);
    if let Some(ct) = content_type {
        builder = builder.header("content-type", ct);
    }
    let response = app
        .oneshot(builder.body(axum::body::Body::from(body)).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null))
}

#[tokio::test]
async fn malformed_input_gets_a_json_error_body() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, json) = send_raw(app.clone(), "/api/tasks", Some("application/json"), "{\"title\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());

    let (status, json) = send_raw(app.clone(), "/api/tasks", Some("application/json"), "{}").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("title"));

    let (status, json) = send_raw(app.clone(), "/api/tasks", None, "{\"title\": \"Film\"}").await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(json["error"].is_string());

    let (status, json) = get(app, "/api/calendar/month?year=soon&month=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn unknown_pillar_is_404() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(
        app(&dir),
        "/api/pillars/nope/content",
        json!({ "title": "Orphan" }),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn overdue_lists_past_scheduled_items() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (_, p) = post_json(app.clone(), "/api/pillars", json!({ "name": "Daily" })).await;
    let pid = p["id"].as_str().unwrap().to_string();
    let (_, item) = post_json(
        app.clone(),
        &format!("/api/pillars/{pid}/content"),
        json!({ "title": "Old post" }),
    )
    .await;
    let cid = item["id"].as_str().unwrap().to_string();
    post_json(
        app.clone(),
        &format!("/api/pillars/{pid}/content/{cid}/send-to-calendar"),
        json!({}),
    )
    .await;
    post_json(
        app.clone(),
        &format!("/api/calendar/{cid}/schedule"),
        json!({ "date": "2026-01-01" }),
    )
    .await;

    let (status, overdue) = get(app.clone(), "/api/calendar/overdue?today=2026-02-01").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overdue.as_array().unwrap().len(), 1);

    let (_, overdue) = get(app, "/api/calendar/overdue?today=2025-12-31").await;
    assert!(overdue.as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[tokio::test]
async fn moving_a_task_changes_only_its_status() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (status, task) = post_json(app.clone(), "/api/tasks", json!({ "title": "Edit vlog" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(task["status"], "todo-all");
    let id = task["id"].as_str().unwrap().to_string();

    let (status, moved) = post_json(
        app.clone(),
        &format!("/api/tasks/{id}/move"),
        json!({ "status": "todo-today" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "todo-today");
    assert_eq!(moved["title"], task["title"]);
    assert_eq!(moved["priority"], task["priority"]);
    assert_eq!(moved["is_completed"], task["is_completed"]);

    let (_, listing) = get(app.clone(), "/api/tasks").await;
    assert_eq!(listing["counts"]["todo-today"], 1);
    assert_eq!(listing["counts"]["todo-all"], 0);

    let (_, toggled) = post_json(app.clone(), &format!("/api/tasks/{id}/toggle"), json!({})).await;
    assert_eq!(toggled["status"], "completed");
    assert_eq!(toggled["is_completed"], true);

    let (status, _) = delete(app.clone(), &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = delete(app, &format!("/api/tasks/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn task_patch_clears_due_date() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (_, task) = post_json(app.clone(), "/api/tasks", json!({ "title": "Film intro" })).await;
    let id = task["id"].as_str().unwrap().to_string();

    let (_, patched) = send(
        app.clone(),
        "PATCH",
        &format!("/api/tasks/{id}"),
        Some(json!({ "due_date": "2026-05-01", "priority": "high" })),
    )
    .await;
    assert_eq!(patched["due_date"], "2026-05-01");
    assert_eq!(patched["priority"], "high");

    let (_, cleared) = send(
        app,
        "PATCH",
        &format!("/api/tasks/{id}"),
        Some(json!({ "due_date": null })),
    )
    .await;
    assert!(cleared["due_date"].is_null());
    assert_eq!(cleared["priority"], "high");
}

// ---------------------------------------------------------------------------
// Ideas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sixth_pin_is_rejected() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let mut table = serde_json::Value::Null;
    for _ in 0..5 {
        table = post_json(app.clone(), "/api/ideas/rows", json!({})).await.1;
    }
    let rows: Vec<String> = table["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(rows.len(), 6);

    for id in &rows[..5] {
        let (status, _) = post_json(app.clone(), &format!("/api/ideas/rows/{id}/pin"), json!({})).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, json) = post_json(app.clone(), &format!("/api/ideas/rows/{}/pin", rows[5]), json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("5"));

    let (_, table) = get(app, "/api/ideas").await;
    assert_eq!(table["pinned"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn fresh_idea_table_row_is_addressable() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (_, first) = get(app.clone(), "/api/ideas").await;
    let (_, second) = get(app.clone(), "/api/ideas").await;
    let row = first["rows"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(second["rows"][0]["id"], row.as_str());

    let (status, table) = post_json(app.clone(), &format!("/api/ideas/rows/{row}/pin"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["pinned"][0], row.as_str());

    let (status, json) = delete(app, &format!("/api/ideas/rows/{row}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("last row"));
}

#[tokio::test]
async fn last_row_and_last_standard_column_are_kept() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    let (_, table) = get(app.clone(), "/api/ideas").await;
    let row = table["rows"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = delete(app.clone(), &format!("/api/ideas/rows/{row}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    for col in ["title", "format", "platform", "hook"] {
        let (status, _) = delete(app.clone(), &format!("/api/ideas/columns/{col}")).await;
        assert_eq!(status, StatusCode::OK);
    }
    let (status, _) = delete(app.clone(), "/api/ideas/columns/notes").await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, table) = get(app, "/api/ideas").await;
    assert_eq!(table["columns"].as_array().unwrap().len(), 1);
    assert_eq!(table["rows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn cells_can_be_set_and_cleared() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (_, table) = get(app.clone(), "/api/ideas").await;
    let row = table["rows"][0]["id"].as_str().unwrap().to_string();

    let (_, table) = put_json(
        app.clone(),
        &format!("/api/ideas/rows/{row}/cells/hook"),
        json!({ "text": "You won't believe this" }),
    )
    .await;
    assert_eq!(table["rows"][0]["cells"]["hook"], "You won't believe this");

    let (_, table) = put_json(
        app,
        &format!("/api/ideas/rows/{row}/cells/hook"),
        json!({ "text": "" }),
    )
    .await;
    assert!(table["rows"][0]["cells"].get("hook").is_none());
}

// ---------------------------------------------------------------------------
// Goals and flags
// ---------------------------------------------------------------------------

#[tokio::test]
async fn goals_link_and_progress() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);

    post_json(app.clone(), "/api/goals", json!({ "text": "Post daily" })).await;
    let (_, listing) = post_json(app.clone(), "/api/goals", json!({ "text": "Reach 10k" })).await;
    let a = listing["goals"][0]["id"].as_str().unwrap().to_string();
    let b = listing["goals"][1]["id"].as_str().unwrap().to_string();

    let (status, _) = put_json(app.clone(), &format!("/api/goals/{a}/link"), json!({ "target": a })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, listing) = put_json(app.clone(), &format!("/api/goals/{a}/link"), json!({ "target": b })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing["goals"][0]["linked_goal_id"], b.as_str());

    let (_, listing) = put_json(
        app.clone(),
        &format!("/api/goals/{b}/status"),
        json!({ "status": "completed" }),
    )
    .await;
    assert_eq!(listing["progress"], 0.5);

    let (_, listing) = delete(app, &format!("/api/goals/{b}")).await;
    assert_eq!(listing["goals"].as_array().unwrap().len(), 1);
    assert!(listing["goals"][0].get("linked_goal_id").is_none());
}

#[tokio::test]
async fn flags_toggle() {
    let dir = TempDir::new().unwrap();
    let app = app(&dir);
    let (_, flags) = get(app.clone(), "/api/flags").await;
    assert_eq!(flags, json!({}));

    let (status, flags) = put_json(app.clone(), "/api/flags/trending", json!({ "enabled": true })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flags["trending"], true);

    let (_, flags) = put_json(app, "/api/flags/trending", json!({ "enabled": false })).await;
    assert_eq!(flags["trending"], false);
}

// ---------------------------------------------------------------------------
// Billing proxy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_customer_proxies_to_stripe() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/v1/customers")
        .match_header("authorization", "Bearer sk_test_123")
        .match_body(mockito::Matcher::UrlEncoded("email".into(), "ada@example.com".into()))
        .with_status(200)
        .with_body(r#"{"id": "cus_42", "object": "customer", "email": "ada@example.com"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(app, "/api/create-customer", json!({ "email": "ada@example.com" })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], "cus_42");
    mock.assert_async().await;
}

#[tokio::test]
async fn missing_customer_is_null() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/v1/customers")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"object": "list", "data": []}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(app, "/api/get-customer-by-email", json!({ "email": "x@example.com" })).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json.is_null());
}

#[tokio::test]
async fn attach_rejects_ids_that_escape_the_path() {
    let mut server = mockito::Server::new_async().await;
    let upstream = server
        .mock("POST", mockito::Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(
        app,
        "/api/attach-payment-method",
        json!({ "customerId": "cus_1/../../v1/subscriptions/sub_x", "paymentMethodId": "pm_1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("invalid stripe id"));
    upstream.assert_async().await;
}

#[tokio::test]
async fn card_error_is_400_with_stripe_message() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/subscriptions")
        .with_status(402)
        .with_body(r#"{"error": {"type": "card_error", "message": "Your card was declined."}}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(
        app,
        "/api/create-subscription",
        json!({ "customerId": "cus_1", "priceId": "price_1" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Your card was declined.");
}

#[tokio::test]
async fn portal_session_returns_url_only() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/billing_portal/sessions")
        .match_body(mockito::Matcher::UrlEncoded(
            "return_url".into(),
            "http://localhost:5173/settings".into(),
        ))
        .with_status(200)
        .with_body(r#"{"id": "bps_1", "url": "https://billing.stripe.com/session/abc"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(app, "/api/create-portal-session", json!({ "customerId": "cus_1" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "url": "https://billing.stripe.com/session/abc" }));
}

#[tokio::test]
async fn billing_without_key_is_503() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(app(&dir), "/api/get-subscription", json!({ "customer_id": "cus_1" })).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(json["error"].as_str().unwrap().contains("STRIPE_SECRET_KEY"));
}

#[tokio::test]
async fn blank_email_is_400() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(app(&dir), "/api/create-customer", json!({ "email": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Clerk webhook
// ---------------------------------------------------------------------------

fn user_created() -> serde_json::Value {
    json!({
        "type": "user.created",
        "data": {
            "id": "user_1",
            "primary_email_address_id": "e1",
            "email_addresses": [{ "id": "e1", "email_address": "new@example.com" }],
            "first_name": "New",
            "last_name": "User"
        }
    })
}

#[tokio::test]
async fn unsigned_user_created_creates_customer_when_no_secret() {
    let mut server = mockito::Server::new_async().await;
    let lookup = server
        .mock("GET", "/v1/customers")
        .match_query(mockito::Matcher::UrlEncoded("email".into(), "new@example.com".into()))
        .with_status(200)
        .with_body(r#"{"object": "list", "data": []}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/v1/customers")
        .match_body(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("email".into(), "new@example.com".into()),
            mockito::Matcher::UrlEncoded("name".into(), "New User".into()),
            mockito::Matcher::UrlEncoded("metadata[clerk_user_id]".into(), "user_1".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"id": "cus_new"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(app, "/api/webhooks/clerk", user_created()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["customer_id"], "cus_new");
    lookup.assert_async().await;
    create.assert_async().await;
}

#[tokio::test]
async fn signed_webhook_requires_svix_headers() {
    let dir = TempDir::new().unwrap();
    let secrets = Secrets {
        clerk_webhook_secret: Some("whsec_MfKQ9r8GKYqrTwjUPD8ILPZIo2LaLaSw".into()),
        ..Default::default()
    };
    let app = app_with(&dir, Config::default(), secrets);
    let (status, json) = post_json(app, "/api/webhooks/clerk", user_created()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("svix-id"));
}

#[tokio::test]
async fn other_events_are_acknowledged() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(
        app(&dir),
        "/api/webhooks/clerk",
        json!({ "type": "session.created", "data": { "id": "sess_1" } }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["received"], true);
}

// ---------------------------------------------------------------------------
// Analysis and ideas
// ---------------------------------------------------------------------------

fn claude_reply(text: &str) -> String {
    json!({
        "id": "msg_1",
        "type": "message",
        "model": "claude-sonnet-4-5",
        "role": "assistant",
        "content": [{ "type": "text", "text": text }],
        "stop_reason": "end_turn",
        "usage": { "input_tokens": 1, "output_tokens": 1 }
    })
    .to_string()
}

#[tokio::test]
async fn analyze_requires_url_or_image() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(app(&dir), "/api/analyze-content", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn analyze_rejects_unsupported_host() {
    let dir = TempDir::new().unwrap();
    let (status, json) = post_json(
        app(&dir),
        "/api/analyze-content",
        json!({ "url": "https://example.com/p/abc" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("unsupported host"));
}

#[tokio::test]
async fn analyze_uploaded_image() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .match_header("x-api-key", "anthropic-key")
        .with_status(200)
        .with_body(claude_reply("{\"summary\": \"flat lay of a breakfast bowl\"}"))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (status, json) = post_json(
        app,
        "/api/analyze-content",
        json!({ "image": "data:image/jpeg;base64,QUJD" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["analysis"]["summary"], "flat lay of a breakfast bowl");
    assert_eq!(json["is_video"], false);
    assert!(json["platform"].is_null());
}

#[tokio::test]
async fn generated_ideas_can_be_saved_to_a_pillar() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/v1/messages")
        .with_status(200)
        .with_body(claude_reply(
            "[{\"title\": \"Pantry tour\", \"hook\": \"What I always keep\", \"format\": \"reel\"},\
              {\"title\": \"Meal prep Sunday\", \"format\": \"carousel\"}]",
        ))
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let app = app_with(&dir, mocked_config(&server), stripe_secrets());
    let (_, pillar) = post_json(app.clone(), "/api/pillars", json!({ "name": "Kitchen" })).await;
    let pid = pillar["id"].as_str().unwrap().to_string();

    let (status, json) = post_json(
        app.clone(),
        "/api/generate-ideas",
        json!({ "niche": "home cooking", "count": 2, "pillarId": pid }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ideas"].as_array().unwrap().len(), 2);
    assert_eq!(json["saved"].as_array().unwrap().len(), 2);

    let (_, pillars) = get(app, "/api/pillars").await;
    let content = pillars[0]["content"].as_array().unwrap();
    assert_eq!(content[0]["title"], "Pantry tour");
    assert!(content[0]["url"].as_str().unwrap().contains("What I always keep"));
    assert_eq!(content[1]["format"], "carousel");
}

#[tokio::test]
async fn generate_ideas_requires_niche() {
    let dir = TempDir::new().unwrap();
    let (status, _) = post_json(app(&dir), "/api/generate-ideas", json!({ "niche": "" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
