//! Application credentials used by every signing operation.

use std::fmt;

/// The `{app_id, key, secret}` triple of one application.
///
/// Immutable once built. The secret is only ever used as an HMAC key: it is
/// redacted from `Debug` output and never appears in signed output.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    app_id: String,
    key: String,
    secret: String,
}

impl Credentials {
    pub fn new(
        app_id: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            app_id: app_id.into(),
            key: key.into(),
            secret: secret.into(),
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("key", &self.key)
            .field("secret", &"[redacted]")
            .finish()
    }
}
