//! Minimal Stripe REST client covering the billing routes.
//!
//! Requests are form-encoded and authenticated with the secret key as a
//! bearer token. Responses are passed back to callers as raw JSON so the
//! frontend sees Stripe's own object shapes.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

#[derive(Debug, thiserror::Error)]
pub enum StripeError {
    #[error("STRIPE_SECRET_KEY is not configured")]
    NotConfigured,

    #[error("stripe request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{message}")]
    Api {
        status: u16,
        kind: String,
        code: Option<String>,
        message: String,
    },

    #[error("failed to decode stripe response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid stripe id '{0}'")]
    InvalidId(String),
}

impl StripeError {
    /// True for errors caused by the caller's input (card declined, bad id).
    pub fn is_client_error(&self) -> bool {
        match self {
            StripeError::InvalidId(_) => true,
            StripeError::Api { status, .. } => (400..500).contains(status),
            _ => false,
        }
    }
}

static OBJECT_ID_RE: OnceLock<Regex> = OnceLock::new();

/// Ids that end up in a request path must look like `cus_…`/`pm_…`.
fn object_id(id: &str) -> Result<&str> {
    let re = OBJECT_ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_]{1,255}$").unwrap());
    if re.is_match(id) {
        Ok(id)
    } else {
        Err(StripeError::InvalidId(id.to_string()))
    }
}

type Result<T> = std::result::Result<T, StripeError>;

pub const DEFAULT_BASE_URL: &str = "https://api.stripe.com";

#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: Option<String>,
    base_url: String,
}

impl StripeClient {
    pub fn new(http: reqwest::Client, secret_key: Option<String>) -> Self {
        Self {
            http,
            secret_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some()
    }

    // ---------------------------------------------------------------------------
    // Customers
    // ---------------------------------------------------------------------------

    pub async fn create_customer(
        &self,
        email: &str,
        name: Option<&str>,
        metadata: &[(&str, &str)],
    ) -> Result<Value> {
        let mut form = vec![("email".to_string(), email.to_string())];
        if let Some(name) = name {
            form.push(("name".to_string(), name.to_string()));
        }
        for (k, v) in metadata {
            form.push((format!("metadata[{k}]"), v.to_string()));
        }
        self.post("/v1/customers", &form).await
    }

    /// First customer with this email, if any.
    pub async fn find_customer_by_email(&self, email: &str) -> Result<Option<Value>> {
        let list = self
            .get("/v1/customers", &[("email", email), ("limit", "1")])
            .await?;
        Ok(first_item(list))
    }

    /// Attach a payment method and make it the customer's invoice default.
    /// Returns the updated customer.
    pub async fn attach_payment_method(&self, customer_id: &str, payment_method_id: &str) -> Result<Value> {
        let customer_id = object_id(customer_id)?;
        let payment_method_id = object_id(payment_method_id)?;
        self.post(
            &format!("/v1/payment_methods/{payment_method_id}/attach"),
            &[("customer".to_string(), customer_id.to_string())],
        )
        .await?;
        self.post(
            &format!("/v1/customers/{customer_id}"),
            &[(
                "invoice_settings[default_payment_method]".to_string(),
                payment_method_id.to_string(),
            )],
        )
        .await
    }

    // ---------------------------------------------------------------------------
    // Subscriptions
    // ---------------------------------------------------------------------------

    pub async fn create_subscription(
        &self,
        customer_id: &str,
        price_id: &str,
        payment_method_id: Option<&str>,
        trial_days: Option<u32>,
    ) -> Result<Value> {
        let mut form = vec![
            ("customer".to_string(), customer_id.to_string()),
            ("items[0][price]".to_string(), price_id.to_string()),
            ("payment_behavior".to_string(), "default_incomplete".to_string()),
            (
                "payment_settings[save_default_payment_method]".to_string(),
                "on_subscription".to_string(),
            ),
            (
                "expand[]".to_string(),
                "latest_invoice.payment_intent".to_string(),
            ),
        ];
        if let Some(pm) = payment_method_id {
            form.push(("default_payment_method".to_string(), pm.to_string()));
        }
        if let Some(days) = trial_days.filter(|d| *d > 0) {
            form.push(("trial_period_days".to_string(), days.to_string()));
        }
        self.post("/v1/subscriptions", &form).await
    }

    /// Most recent subscription of any status for a customer.
    pub async fn latest_subscription(&self, customer_id: &str) -> Result<Option<Value>> {
        let list = self
            .get(
                "/v1/subscriptions",
                &[("customer", customer_id), ("status", "all"), ("limit", "1")],
            )
            .await?;
        Ok(first_item(list))
    }

    // ---------------------------------------------------------------------------
    // Billing portal
    // ---------------------------------------------------------------------------

    pub async fn create_portal_session(&self, customer_id: &str, return_url: &str) -> Result<Value> {
        self.post(
            "/v1/billing_portal/sessions",
            &[
                ("customer".to_string(), customer_id.to_string()),
                ("return_url".to_string(), return_url.to_string()),
            ],
        )
        .await
    }

    // ---------------------------------------------------------------------------
    // Transport
    // ---------------------------------------------------------------------------

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let key = self.secret_key.as_deref().ok_or(StripeError::NotConfigured)?;
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(key)
            .query(query)
            .send()
            .await?;
        decode(resp).await
    }

    async fn post(&self, path: &str, form: &[(String, String)]) -> Result<Value> {
        let key = self.secret_key.as_deref().ok_or(StripeError::NotConfigured)?;
        let resp = self
            .http
            .post(format!("{}{path}", self.base_url))
            .bearer_auth(key)
            .form(form)
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body: Value = serde_json::from_slice(&resp.bytes().await?)?;
    if status.is_success() {
        return Ok(body);
    }
    let err = &body["error"];
    Err(StripeError::Api {
        status: status.as_u16(),
        kind: err["type"].as_str().unwrap_or("api_error").to_string(),
        code: err["code"].as_str().map(str::to_string),
        message: err["message"]
            .as_str()
            .unwrap_or("stripe request failed")
            .to_string(),
    })
}

fn first_item(list: Value) -> Option<Value> {
    match list {
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(mut items)) if !items.is_empty() => Some(items.swap_remove(0)),
            _ => None,
        },
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(server: &mockito::ServerGuard) -> StripeClient {
        StripeClient::new(reqwest::Client::new(), Some("sk_test_123".into())).with_base_url(server.url())
    }

    #[tokio::test]
    async fn create_customer_posts_form_with_metadata() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/customers")
            .match_header("authorization", "Bearer sk_test_123")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("email".into(), "ada@example.com".into()),
                Matcher::UrlEncoded("metadata[clerk_user_id]".into(), "user_1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"id": "cus_1", "object": "customer", "email": "ada@example.com"}"#)
            .create_async()
            .await;

        let customer = client(&server)
            .create_customer("ada@example.com", None, &[("clerk_user_id", "user_1")])
            .await
            .unwrap();
        assert_eq!(customer["id"], "cus_1");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn find_customer_returns_none_for_empty_list() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1/customers")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("email".into(), "nobody@example.com".into()),
                Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"object": "list", "data": [], "has_more": false}"#)
            .create_async()
            .await;

        let found = client(&server)
            .find_customer_by_email("nobody@example.com")
            .await
            .unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn api_errors_carry_stripe_message() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/subscriptions")
            .with_status(402)
            .with_body(
                r#"{"error": {"type": "card_error", "code": "card_declined", "message": "Your card was declined."}}"#,
            )
            .create_async()
            .await;

        let err = client(&server)
            .create_subscription("cus_1", "price_1", None, None)
            .await
            .unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Your card was declined.");
    }

    #[tokio::test]
    async fn attach_sets_default_payment_method() {
        let mut server = mockito::Server::new_async().await;
        let attach = server
            .mock("POST", "/v1/payment_methods/pm_1/attach")
            .match_body(Matcher::UrlEncoded("customer".into(), "cus_1".into()))
            .with_status(200)
            .with_body(r#"{"id": "pm_1"}"#)
            .create_async()
            .await;
        let update = server
            .mock("POST", "/v1/customers/cus_1")
            .match_body(Matcher::UrlEncoded(
                "invoice_settings[default_payment_method]".into(),
                "pm_1".into(),
            ))
            .with_status(200)
            .with_body(r#"{"id": "cus_1", "invoice_settings": {"default_payment_method": "pm_1"}}"#)
            .create_async()
            .await;

        let customer = client(&server)
            .attach_payment_method("cus_1", "pm_1")
            .await
            .unwrap();
        assert_eq!(customer["invoice_settings"]["default_payment_method"], "pm_1");
        attach.assert_async().await;
        update.assert_async().await;
    }

    #[tokio::test]
    async fn path_ids_are_validated_before_any_request() {
        let mut server = mockito::Server::new_async().await;
        let any = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        for (customer, pm) in [
            ("cus_1/../../v1/subscriptions/sub_x", "pm_1"),
            ("cus_1", "pm_1?expand[]=customer"),
            ("", "pm_1"),
        ] {
            let err = client(&server)
                .attach_payment_method(customer, pm)
                .await
                .unwrap_err();
            assert!(matches!(err, StripeError::InvalidId(_)), "{customer} / {pm}");
            assert!(err.is_client_error());
        }
        any.assert_async().await;
    }

    #[tokio::test]
    async fn unconfigured_client_fails_fast() {
        let client = StripeClient::new(reqwest::Client::new(), None);
        let err = client.latest_subscription("cus_1").await.unwrap_err();
        assert!(matches!(err, StripeError::NotConfigured));
    }
}
