use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::Value;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

// Bodies accept the frontend's camelCase names as well as snake_case.

#[derive(Deserialize)]
pub struct CreateCustomerBody {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /api/create-customer — create a Stripe customer.
pub async fn create_customer(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<CreateCustomerBody>,
) -> Result<Json<Value>, AppError> {
    let email = required("email", &body.email)?;
    let customer = app
        .stripe
        .create_customer(email, body.name.as_deref(), &[])
        .await?;
    tracing::info!(customer = %customer["id"], "created stripe customer");
    Ok(Json(customer))
}

#[derive(Deserialize)]
pub struct AttachPaymentMethodBody {
    #[serde(alias = "customerId")]
    pub customer_id: String,
    #[serde(alias = "paymentMethodId")]
    pub payment_method_id: String,
}

/// POST /api/attach-payment-method — attach and set as invoice default.
pub async fn attach_payment_method(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<AttachPaymentMethodBody>,
) -> Result<Json<Value>, AppError> {
    let customer_id = required("customer_id", &body.customer_id)?;
    let pm = required("payment_method_id", &body.payment_method_id)?;
    let customer = app.stripe.attach_payment_method(customer_id, pm).await?;
    Ok(Json(customer))
}

#[derive(Deserialize)]
pub struct CreateSubscriptionBody {
    #[serde(alias = "customerId")]
    pub customer_id: String,
    #[serde(alias = "priceId")]
    pub price_id: String,
    #[serde(default, alias = "paymentMethodId")]
    pub payment_method_id: Option<String>,
    #[serde(default, alias = "trialDays", alias = "trial_period_days")]
    pub trial_days: Option<u32>,
}

/// POST /api/create-subscription — subscribe a customer to a price.
pub async fn create_subscription(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<CreateSubscriptionBody>,
) -> Result<Json<Value>, AppError> {
    let customer_id = required("customer_id", &body.customer_id)?;
    let price_id = required("price_id", &body.price_id)?;
    let subscription = app
        .stripe
        .create_subscription(
            customer_id,
            price_id,
            body.payment_method_id.as_deref(),
            body.trial_days,
        )
        .await?;
    tracing::info!(
        subscription = %subscription["id"],
        status = %subscription["status"],
        "created subscription"
    );
    Ok(Json(subscription))
}

#[derive(Deserialize)]
pub struct EmailBody {
    pub email: String,
}

/// POST /api/get-customer-by-email — first matching customer or `null`.
pub async fn get_customer_by_email(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<EmailBody>,
) -> Result<Json<Value>, AppError> {
    let email = required("email", &body.email)?;
    let customer = app.stripe.find_customer_by_email(email).await?;
    Ok(Json(customer.unwrap_or(Value::Null)))
}

#[derive(Deserialize)]
pub struct CustomerBody {
    #[serde(alias = "customerId")]
    pub customer_id: String,
    #[serde(default, alias = "returnUrl")]
    pub return_url: Option<String>,
}

/// POST /api/get-subscription — most recent subscription or `null`.
pub async fn get_subscription(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<CustomerBody>,
) -> Result<Json<Value>, AppError> {
    let customer_id = required("customer_id", &body.customer_id)?;
    let subscription = app.stripe.latest_subscription(customer_id).await?;
    Ok(Json(subscription.unwrap_or(Value::Null)))
}

/// POST /api/create-portal-session — returns `{ url }`.
pub async fn create_portal_session(
    State(app): State<AppState>,
    ApiJson(body): ApiJson<CustomerBody>,
) -> Result<Json<Value>, AppError> {
    let customer_id = required("customer_id", &body.customer_id)?;
    let return_url = body
        .return_url
        .as_deref()
        .unwrap_or(&app.config.stripe.portal_return_url);
    let session = app
        .stripe
        .create_portal_session(customer_id, return_url)
        .await?;
    Ok(Json(serde_json::json!({ "url": session["url"] })))
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::bad_request(format!("{field} is required")));
    }
    Ok(value)
}
