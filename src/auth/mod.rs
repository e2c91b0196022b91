//! Credentials and HMAC-SHA256 request signing.

mod credentials;
pub mod signature;

pub use credentials::Credentials;
pub use signature::{Method, Params, SignableRequest, SignedRequest, AUTH_VERSION};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// Lowercase hex of HMAC-SHA256(secret, message).
pub(crate) fn hmac_sha256_hex(secret: &str, message: &[u8]) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::Signing(format!("HMAC init: {}", e)))?;
    mac.update(message);
    Ok(hex::encode(mac.finalize().into_bytes()))
}
