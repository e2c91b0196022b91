//! Server library for the Eventflit real-time API.
//!
//! Signs REST requests, triggers events on channels, queries channel and
//! presence state, issues private/presence channel auth tokens, verifies
//! webhooks and sends native push notifications.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use auth::{Credentials, Method, Params, SignableRequest, SignedRequest};
pub use client::{Client, Resource, Transport};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use handlers::http::AppState;
pub use models::{ChannelName, ChannelType, PresenceUser, SocketId};
pub use services::{Channel, ChannelAuthenticator, NativeNotificationClient, Webhook};

use axum::routing::{get, post};
use handlers::http;

/// Build the endpoint router (channel auth, webhooks, health). Used by main and by integration tests.
pub fn create_app(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/eventflit/auth", post(http::channel_auth))
        .route("/eventflit/webhook", post(http::webhook))
        .route("/health", get(http::health))
        .with_state(state)
}
