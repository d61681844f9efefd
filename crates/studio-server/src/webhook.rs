//! Clerk webhooks are delivered through Svix. A request is authentic when
//! `svix-signature` carries a `v1,<base64>` HMAC-SHA256 of
//! `"{svix-id}.{svix-timestamp}.{body}"` keyed with the decoded `whsec_` secret.

use base64::Engine as _;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;

/// Maximum clock skew between the signature timestamp and now.
pub const TOLERANCE_SECS: i64 = 5 * 60;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WebhookError {
    #[error("missing header: {0}")]
    MissingHeader(&'static str),

    #[error("invalid webhook secret")]
    InvalidSecret,

    #[error("invalid timestamp")]
    InvalidTimestamp,

    #[error("timestamp outside tolerance")]
    Expired,

    #[error("no matching signature")]
    BadSignature,
}

pub struct SvixHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

pub fn verify(secret: &str, headers: &SvixHeaders<'_>, body: &[u8], now: i64) -> Result<(), WebhookError> {
    let key = base64::engine::general_purpose::STANDARD
        .decode(secret.strip_prefix("whsec_").unwrap_or(secret))
        .map_err(|_| WebhookError::InvalidSecret)?;

    let ts: i64 = headers
        .timestamp
        .parse()
        .map_err(|_| WebhookError::InvalidTimestamp)?;
    if (now - ts).abs() > TOLERANCE_SECS {
        return Err(WebhookError::Expired);
    }

    for candidate in headers.signature.split_whitespace() {
        let Some(encoded) = candidate.strip_prefix("v1,") else {
            continue;
        };
        let Ok(sig) = base64::engine::general_purpose::STANDARD.decode(encoded) else {
            continue;
        };
        let mut mac = Hmac::<Sha256>::new_from_slice(&key).map_err(|_| WebhookError::InvalidSecret)?;
        mac.update(headers.id.as_bytes());
        mac.update(b".");
        mac.update(headers.timestamp.as_bytes());
        mac.update(b".");
        mac.update(body);
        if mac.verify_slice(&sig).is_ok() {
            return Ok(());
        }
    }
    Err(WebhookError::BadSignature)
}

// ---------------------------------------------------------------------------
// Clerk payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ClerkEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub data: ClerkUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClerkUser {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<ClerkEmail>,
    #[serde(default)]
    pub primary_email_address_id: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClerkEmail {
    #[serde(default)]
    pub id: String,
    pub email_address: String,
}

impl ClerkUser {
    /// The primary address, or the first one listed.
    pub fn primary_email(&self) -> Option<&str> {
        let primary = self.primary_email_address_id.as_deref();
        self.email_addresses
            .iter()
            .find(|e| Some(e.id.as_str()) == primary)
            .or_else(|| self.email_addresses.first())
            .map(|e| e.email_address.as_str())
    }

    pub fn full_name(&self) -> Option<String> {
        let parts: Vec<&str> = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        (!parts.is_empty()).then(|| parts.join(" "))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
