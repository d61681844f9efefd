use crate::error::Result;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// AnthropicConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnthropicConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_anthropic_base")]
    pub api_base: String,
}

fn default_model() -> String {
    "claude-sonnet-4-5".to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

fn default_anthropic_base() -> String {
    "https://api.anthropic.com".to_string()
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            api_base: default_anthropic_base(),
        }
    }
}

// ---------------------------------------------------------------------------
// StripeConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StripeConfig {
    #[serde(default = "default_stripe_base")]
    pub api_base: String,
    #[serde(default = "default_return_url")]
    pub portal_return_url: String,
}

fn default_stripe_base() -> String {
    "https://api.stripe.com".to_string()
}

fn default_return_url() -> String {
    "http://localhost:5173/settings".to_string()
}

impl Default for StripeConfig {
    fn default() -> Self {
        Self {
            api_base: default_stripe_base(),
            portal_return_url: default_return_url(),
        }
    }
}

// ---------------------------------------------------------------------------
// CaptureConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string()
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_project")]
    pub project: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub anthropic: AnthropicConfig,
    #[serde(default)]
    pub stripe: StripeConfig,
    #[serde(default)]
    pub capture: CaptureConfig,
}

fn default_project() -> String {
    "studio".to_string()
}

fn default_port() -> u16 {
    3001
}

impl Default for Config {
    fn default() -> Self {
        Self::new(default_project())
    }
}

impl Config {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            port: default_port(),
            anthropic: AnthropicConfig::default(),
            stripe: StripeConfig::default(),
            capture: CaptureConfig::default(),
        }
    }

    /// Read `.studio/config.yaml`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        match crate::io::read_optional(&paths::config_path(root))? {
            Some(data) => Ok(serde_yaml::from_str(&data)?),
            None => Ok(Self::default()),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    pub fn validate(&self, secrets: &Secrets) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if secrets.stripe_secret_key.is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "STRIPE_SECRET_KEY is not set; billing routes will fail".to_string(),
            });
        }
        if secrets.anthropic_api_key.is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "VITE_ANTHROPIC_API_KEY is not set; analysis routes will fail".to_string(),
            });
        }
        if secrets.clerk_webhook_secret.is_none() {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "CLERK_WEBHOOK_SECRET is not set; webhook signatures are not verified"
                    .to_string(),
            });
        }
        if self.anthropic.max_tokens == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "anthropic.max_tokens must be greater than zero".to_string(),
            });
        }
        if self.capture.timeout_secs == 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: "capture.timeout_secs must be greater than zero".to_string(),
            });
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Secrets
// ---------------------------------------------------------------------------

/// Credentials read from the environment. Never written to disk.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    pub stripe_secret_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub clerk_webhook_secret: Option<String>,
}

impl Secrets {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            stripe_secret_key: get("STRIPE_SECRET_KEY"),
            anthropic_api_key: get("VITE_ANTHROPIC_API_KEY").or_else(|| get("ANTHROPIC_API_KEY")),
            clerk_webhook_secret: get("CLERK_WEBHOOK_SECRET"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
