//! Canonical request signing for the REST API.
//!
//! Every REST call carries its authentication in the query string:
//!
//! ```text
//! auth_key, auth_timestamp, auth_version, [body_md5], auth_signature
//! ```
//!
//! where `auth_signature = hex(HMAC-SHA256(secret, StringToSign))` and
//!
//! ```text
//! StringToSign = METHOD + "\n" +
//!                PATH + "\n" +
//!                sorted, form-encoded "key=value" pairs joined with "&"
//! ```
//!
//! The signed parameter set is every final parameter except `auth_signature`.

use std::collections::BTreeMap;
use std::fmt;

use md5::{Digest, Md5};
use tracing::debug;

use super::{hmac_sha256_hex, Credentials};
use crate::error::Result;

pub const AUTH_VERSION: &str = "1.0";

const AUTH_KEY: &str = "auth_key";
const AUTH_TIMESTAMP: &str = "auth_timestamp";
const AUTH_VERSION_PARAM: &str = "auth_version";
const AUTH_SIGNATURE: &str = "auth_signature";
const BODY_MD5: &str = "body_md5";

/// Query parameters, kept sorted by key (byte-wise).
pub type Params = BTreeMap<String, String>;

/// HTTP verbs used by the REST API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A REST call before signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    pub method: Method,
    /// Request path only: no scheme, host or query string.
    pub path: String,
    pub query_params: Params,
    pub body: Option<String>,
}

impl SignableRequest {
    pub fn new(method: Method, path: impl AsRef<str>) -> Self {
        Self {
            method,
            path: normalize_path(path.as_ref()),
            query_params: Params::new(),
            body: None,
        }
    }

    pub fn with_params(mut self, params: Params) -> Self {
        self.query_params = params;
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sign with the current unix time.
    pub fn sign(self, credentials: &Credentials) -> Result<SignedRequest> {
        let timestamp = chrono::Utc::now().timestamp();
        self.sign_at(credentials, timestamp)
    }

    /// Sign with an explicit `auth_timestamp`.
    pub fn sign_at(self, credentials: &Credentials, timestamp: i64) -> Result<SignedRequest> {
        let SignableRequest {
            method,
            path,
            query_params,
            body,
        } = self;

        let mut params = query_params;
        // A caller supplied signature is never part of the signed set.
        params.remove(AUTH_SIGNATURE);
        params.insert(AUTH_KEY.to_owned(), credentials.key().to_owned());
        params.insert(AUTH_TIMESTAMP.to_owned(), timestamp.to_string());
        params.insert(AUTH_VERSION_PARAM.to_owned(), AUTH_VERSION.to_owned());
        if let Some(body) = &body {
            params.insert(BODY_MD5.to_owned(), hex::encode(Md5::digest(body.as_bytes())));
        }

        let to_sign = string_to_sign(method, &path, &params);
        debug!(method = %method, path = %path, "signing request");
        let signature = hmac_sha256_hex(credentials.secret(), to_sign.as_bytes())?;
        params.insert(AUTH_SIGNATURE.to_owned(), signature);

        Ok(SignedRequest {
            method,
            path,
            params,
            body,
        })
    }
}

/// A request carrying its auth parameters, ready for the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    method: Method,
    path: String,
    params: Params,
    body: Option<String>,
}

impl SignedRequest {
    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// All parameters, including `auth_signature`.
    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    pub fn signature(&self) -> &str {
        self.params
            .get(AUTH_SIGNATURE)
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Sorted, form-encoded query string including the signature.
    pub fn query_string(&self) -> String {
        encode_params(self.params.iter())
    }
}

/// The exact bytes covered by `auth_signature`.
pub fn string_to_sign(method: Method, path: &str, params: &Params) -> String {
    let signed = params.iter().filter(|(k, _)| k.as_str() != AUTH_SIGNATURE);
    format!("{}\n{}\n{}", method.as_str(), path, encode_params(signed))
}

fn encode_params<'a>(params: impl Iterator<Item = (&'a String, &'a String)>) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
}

/// Leading slash, no repeated slashes.
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        out.push('/');
        out.push_str(segment);
    }
    if out.is_empty() || path.ends_with('/') {
        out.push('/');
    }
    out
}
