use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use claude_client::ClaudeClient;
use studio_core::config::{Config, Secrets};
use studio_core::Store;
use tokio::sync::Mutex;

use crate::capture::PageCapture;
use crate::error::AppError;
use crate::stripe::StripeClient;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub root: PathBuf,
    pub config: Arc<Config>,
    pub secrets: Arc<Secrets>,
    pub store: Store,
    /// Serializes load-modify-save cycles on the store.
    pub store_lock: Arc<Mutex<()>>,
    pub stripe: StripeClient,
    pub claude: ClaudeClient,
    pub capture: PageCapture,
}

impl AppState {
    /// Load `.studio/config.yaml` (defaults when absent) and read secrets
    /// from the environment.
    pub fn new(root: PathBuf) -> Self {
        let config = Config::load(&root).unwrap_or_else(|e| {
            tracing::warn!("failed to load config, using defaults: {e}");
            Config::default()
        });
        Self::with_config(root, config, Secrets::from_env())
    }

    pub fn with_config(root: PathBuf, config: Config, secrets: Secrets) -> Self {
        let http = reqwest::Client::new();

        let stripe = StripeClient::new(http.clone(), secrets.stripe_secret_key.clone())
            .with_base_url(&config.stripe.api_base);
        let claude = ClaudeClient::new(secrets.anthropic_api_key.clone())
            .with_http(http.clone())
            .with_base_url(&config.anthropic.api_base)
            .with_model(&config.anthropic.model)
            .with_max_tokens(config.anthropic.max_tokens);
        let capture = PageCapture::new(
            http,
            Duration::from_secs(config.capture.timeout_secs),
            &config.capture.user_agent,
        );

        for warning in config.validate(&secrets) {
            tracing::warn!("{}", warning.message);
        }

        Self {
            store: Store::new(root.clone()),
            root,
            config: Arc::new(config),
            secrets: Arc::new(secrets),
            store_lock: Arc::new(Mutex::new(())),
            stripe,
            claude,
            capture,
        }
    }

    /// Run `f` against the store on the blocking pool while holding the
    /// store lock.
    pub async fn with_store<R, F>(&self, f: F) -> Result<R, AppError>
    where
        F: FnOnce(&Store) -> studio_core::Result<R> + Send + 'static,
        R: Send + 'static,
    {
        let guard = self.store_lock.clone().lock_owned().await;
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || {
            let _guard = guard;
            f(&store)
        })
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
        Ok(result)
    }
}
