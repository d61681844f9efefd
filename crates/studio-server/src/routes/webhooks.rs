use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;
use crate::webhook::{self, ClerkEvent, SvixHeaders, WebhookError};

/// POST /api/webhooks/clerk — on `user.created`, make sure a Stripe customer
/// exists for the user's primary email.
pub async fn clerk_webhook(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    match app.secrets.clerk_webhook_secret.as_deref() {
        Some(secret) => {
            let svix = SvixHeaders {
                id: header(&headers, "svix-id")?,
                timestamp: header(&headers, "svix-timestamp")?,
                signature: header(&headers, "svix-signature")?,
            };
            webhook::verify(secret, &svix, &body, chrono::Utc::now().timestamp())?;
        }
        None => tracing::warn!("CLERK_WEBHOOK_SECRET not set; accepting unsigned webhook"),
    }

    let event: ClerkEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("invalid webhook payload: {e}")))?;

    if event.kind != "user.created" {
        tracing::debug!(kind = %event.kind, "ignoring clerk event");
        return Ok(Json(serde_json::json!({ "received": true })));
    }

    let Some(email) = event.data.primary_email() else {
        return Err(AppError::bad_request("user has no email address"));
    };

    let customer = match app.stripe.find_customer_by_email(email).await? {
        Some(existing) => existing,
        None => {
            let name = event.data.full_name();
            app.stripe
                .create_customer(
                    email,
                    name.as_deref(),
                    &[("clerk_user_id", event.data.id.as_str())],
                )
                .await?
        }
    };
    tracing::info!(user = %event.data.id, customer = %customer["id"], "linked clerk user");

    Ok(Json(serde_json::json!({
        "received": true,
        "customer_id": customer["id"],
    })))
}

fn header<'h>(headers: &'h HeaderMap, name: &'static str) -> Result<&'h str, WebhookError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or(WebhookError::MissingHeader(name))
}
