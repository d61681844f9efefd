pub mod capture;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;
pub mod stripe;
pub mod webhook;

use axum::routing::{delete, get, patch, post, put};
use axum::Router;
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(root: PathBuf) -> Router {
    build_router_with(state::AppState::new(root))
}

/// Same as [`build_router`] with caller-supplied state, so tests can point
/// the outbound clients at mock servers.
pub fn build_router_with(app_state: state::AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health::health))
        // Billing proxy
        .route(
            "/api/create-customer",
            post(routes::billing::create_customer),
        )
        .route(
            "/api/attach-payment-method",
            post(routes::billing::attach_payment_method),
        )
        .route(
            "/api/create-subscription",
            post(routes::billing::create_subscription),
        )
        .route(
            "/api/get-customer-by-email",
            post(routes::billing::get_customer_by_email),
        )
        .route(
            "/api/get-subscription",
            post(routes::billing::get_subscription),
        )
        .route(
            "/api/create-portal-session",
            post(routes::billing::create_portal_session),
        )
        .route(
            "/api/webhooks/clerk",
            post(routes::webhooks::clerk_webhook),
        )
        // AI
        .route(
            "/api/analyze-content",
            post(routes::analyze::analyze_content),
        )
        .route(
            "/api/generate-ideas",
            post(routes::analyze::generate_ideas),
        )
        // Pillars
        .route("/api/pillars", get(routes::pillars::list_pillars))
        .route("/api/pillars", post(routes::pillars::create_pillar))
        .route("/api/pillars/{id}", put(routes::pillars::rename_pillar))
        .route("/api/pillars/{id}", delete(routes::pillars::delete_pillar))
        .route(
            "/api/pillars/{id}/content",
            post(routes::pillars::add_content),
        )
        .route(
            "/api/pillars/{id}/content/{content_id}",
            patch(routes::pillars::update_content),
        )
        .route(
            "/api/pillars/{id}/content/{content_id}",
            delete(routes::pillars::remove_content),
        )
        .route(
            "/api/pillars/{id}/content/{content_id}/move",
            post(routes::pillars::move_content),
        )
        .route(
            "/api/pillars/{id}/content/{content_id}/send-to-calendar",
            post(routes::pillars::send_to_calendar),
        )
        // Calendar
        .route("/api/calendar", get(routes::calendar::get_calendar))
        .route("/api/calendar/month", get(routes::calendar::get_month))
        .route("/api/calendar/overdue", get(routes::calendar::get_overdue))
        .route(
            "/api/calendar/{id}/schedule",
            post(routes::calendar::schedule),
        )
        .route(
            "/api/calendar/{id}/unschedule",
            post(routes::calendar::unschedule),
        )
        .route("/api/calendar/{id}", delete(routes::calendar::remove))
        // Tasks
        .route("/api/tasks", get(routes::tasks::list_tasks))
        .route("/api/tasks", post(routes::tasks::add_task))
        .route("/api/tasks/{id}", patch(routes::tasks::update_task))
        .route("/api/tasks/{id}", delete(routes::tasks::delete_task))
        .route("/api/tasks/{id}/move", post(routes::tasks::move_task))
        .route(
            "/api/tasks/{id}/toggle",
            post(routes::tasks::toggle_complete),
        )
        // Ideas
        .route("/api/ideas", get(routes::ideas::get_table))
        .route("/api/ideas/columns", post(routes::ideas::add_column))
        .route(
            "/api/ideas/columns/{id}",
            put(routes::ideas::rename_column),
        )
        .route(
            "/api/ideas/columns/{id}",
            delete(routes::ideas::delete_column),
        )
        .route("/api/ideas/rows", post(routes::ideas::add_row))
        .route("/api/ideas/rows/{id}", delete(routes::ideas::delete_row))
        .route(
            "/api/ideas/rows/{id}/cells/{column_id}",
            put(routes::ideas::set_cell),
        )
        .route("/api/ideas/rows/{id}/pin", post(routes::ideas::pin_row))
        .route("/api/ideas/rows/{id}/pin", delete(routes::ideas::unpin_row))
        // Goals
        .route("/api/goals", get(routes::goals::list_goals))
        .route("/api/goals", post(routes::goals::add_goal))
        .route("/api/goals/{id}", delete(routes::goals::delete_goal))
        .route("/api/goals/{id}/status", put(routes::goals::set_status))
        .route("/api/goals/{id}/link", put(routes::goals::link_goal))
        .route("/api/goals/{id}/link", delete(routes::goals::unlink_goal))
        // Feature flags
        .route("/api/flags", get(routes::flags::list_flags))
        .route("/api/flags/{name}", put(routes::flags::set_flag))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}

/// Start the studio API server.
pub async fn serve(root: PathBuf, port: u16, open_browser: bool) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(root, listener, open_browser).await
}

/// Start the studio API server on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    root: PathBuf,
    listener: tokio::net::TcpListener,
    open_browser: bool,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(root);

    tracing::info!("studio API listening on http://localhost:{actual_port}");

    if open_browser {
        let url = format!("http://localhost:{actual_port}/health");
        let _ = open::that(&url);
    }

    axum::serve(listener, app).await?;
    Ok(())
}
