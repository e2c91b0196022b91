//! Webhook verification and decoding.
//!
//! The service signs each webhook body with the application secret and sends:
//!
//! ```text
//! X-Eventflit-Key:       <app key>
//! X-Eventflit-Signature: hex(HMAC-SHA256(secret, body))
//! ```
//!
//! A mismatch is an ordinary `false`, never an error.

use axum::http::{header::CONTENT_TYPE, HeaderMap};
use chrono::{DateTime, TimeZone, Utc};
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::auth::{hmac_sha256_hex, Credentials};
use crate::error::{Error, Result};
use crate::models::event::{WebhookData, WebhookEvent};

pub const KEY_HEADER: &str = "x-eventflit-key";
pub const SIGNATURE_HEADER: &str = "x-eventflit-signature";

const JSON_CONTENT_TYPE: &str = "application/json";

/// True only if `key_header` is this application's key and `signature_header`
/// is the HMAC of `body` under its secret.
pub fn verify(
    credentials: &Credentials,
    body: &[u8],
    signature_header: &str,
    key_header: &str,
) -> bool {
    if key_header != credentials.key() {
        return false;
    }
    check_signature(credentials.secret(), body, signature_header)
}

fn check_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = hmac_sha256_hex(secret, body) else {
        return false;
    };
    if signature.len() != expected.len() {
        return false;
    }
    signature.as_bytes().ct_eq(expected.as_bytes()).into()
}

/// A received webhook request.
#[derive(Debug, Clone)]
pub struct Webhook {
    key: String,
    signature: String,
    content_type: String,
    body: Vec<u8>,
}

impl Webhook {
    pub fn new(
        key: impl Into<String>,
        signature: impl Into<String>,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            key: key.into(),
            signature: signature.into(),
            content_type: JSON_CONTENT_TYPE.to_string(),
            body: body.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Build from request headers. Missing headers become empty values: a missing key or
    /// signature fails verification, a missing content type fails [`Webhook::data`].
    pub fn from_headers(headers: &HeaderMap, body: impl Into<Vec<u8>>) -> Self {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("")
                .to_string()
        };
        Self {
            key: header(KEY_HEADER),
            signature: header(SIGNATURE_HEADER),
            content_type: header(CONTENT_TYPE.as_str()),
            body: body.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Check the signature against the application credentials, or against
    /// any of `extra_tokens` whose key matches (e.g. during key rotation).
    pub fn valid(&self, credentials: &Credentials, extra_tokens: &[Credentials]) -> bool {
        let token = std::iter::once(credentials)
            .chain(extra_tokens)
            .find(|token| token.key() == self.key);

        let Some(token) = token else {
            warn!(key = %self.key, "received webhook with unknown key");
            return false;
        };

        if check_signature(token.secret(), &self.body, &self.signature) {
            debug!(key = %self.key, "webhook signature verified");
            true
        } else {
            warn!(key = %self.key, signature = %self.signature, "received webhook with invalid signature");
            false
        }
    }

    /// Decode the body. Only `application/json` bodies are understood.
    pub fn data(&self) -> Result<WebhookData> {
        let media_type = self
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim();
        if !media_type.eq_ignore_ascii_case(JSON_CONTENT_TYPE) {
            return Err(Error::Webhook(format!(
                "Unknown Content-Type ({})",
                self.content_type
            )));
        }
        Ok(serde_json::from_slice(&self.body)?)
    }

    pub fn events(&self) -> Result<Vec<WebhookEvent>> {
        Ok(self.data()?.events)
    }

    /// When the service generated the webhook.
    pub fn time(&self) -> Result<DateTime<Utc>> {
        let time_ms = self.data()?.time_ms;
        Utc.timestamp_millis_opt(time_ms)
            .single()
            .ok_or_else(|| Error::Webhook(format!("invalid time_ms {}", time_ms)))
    }
}
