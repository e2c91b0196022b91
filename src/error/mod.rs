//! Error types for signing, validation, configuration and transport.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::channel::MAX_CHANNEL_NAME_LENGTH;

/// Boxed error returned by a [`Transport`](crate::client::Transport).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Malformed caller input, rejected before any network or cryptographic work.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid socket ID {0:?}")]
    InvalidSocketId(String),

    #[error("Illegal channel name '{0}'")]
    IllegalChannelName(String),

    #[error("Channel name too long (limit {} characters) '{0}'", MAX_CHANNEL_NAME_LENGTH)]
    ChannelNameTooLong(String),

    #[error("Too many channels ({0}), max {}", crate::client::MAX_TRIGGER_CHANNELS)]
    TooManyChannels(usize),

    #[error("Channel '{0}' is public and does not require authentication")]
    PublicChannel(String),

    #[error("Presence channel '{0}' requires user data")]
    MissingPresenceData(String),

    #[error("Interests array must not be empty")]
    EmptyInterests,

    #[error("Notification data must be a JSON object")]
    InvalidNotificationData,
}

/// Library-level errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("missing key `{0}' in the client configuration")]
    Configuration(&'static str),

    #[error("Configuration error: {0}")]
    ConfigLoad(#[from] crate::config::ConfigLoadError),

    #[error("Signing error: {0}")]
    Signing(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("404 Not found ({0})")]
    NotFound(String),

    #[error("Proxy Authentication Required")]
    ProxyAuthenticationRequired,

    #[error("Unknown error (status code {status}): {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// Failure inside the HTTP transport; the original error is the `source()`.
    #[error("HTTP transport error: {0}")]
    Http(#[source] BoxError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Webhook error: {0}")]
    Webhook(String),
}

impl Error {
    /// The error raised by the transport, if this is a transport failure.
    pub fn original_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Http(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) | Error::Serialization(_) | Error::Webhook(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::Authentication(_) => StatusCode::UNAUTHORIZED,
            Error::Http(_)
            | Error::BadRequest(_)
            | Error::NotFound(_)
            | Error::ProxyAuthenticationRequired
            | Error::UnexpectedStatus { .. } => StatusCode::BAD_GATEWAY,
            Error::Configuration(_) | Error::ConfigLoad(_) | Error::Signing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_include_offending_value() {
        let err = ValidationError::InvalidSocketId("abc".to_string());
        assert_eq!(err.to_string(), "Invalid socket ID \"abc\"");

        let err = ValidationError::ChannelNameTooLong("x".to_string());
        assert_eq!(
            err.to_string(),
            "Channel name too long (limit 200 characters) 'x'"
        );
    }

    #[test]
    fn configuration_error_names_missing_key() {
        assert_eq!(
            Error::Configuration("secret").to_string(),
            "missing key `secret' in the client configuration"
        );
    }

    #[test]
    fn http_error_preserves_original() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = Error::Http(Box::new(io));
        assert!(std::error::Error::source(&err).is_some());
        assert_eq!(err.original_error().map(|e| e.to_string()), Some("refused".to_string()));
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let response = Error::from(ValidationError::EmptyInterests).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
