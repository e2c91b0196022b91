//! HTTP handlers: channel auth endpoint, webhook receiver and health.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Form, Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::client::Client;
use crate::error::{Error, ValidationError};
use crate::models::channel::{ChannelType, SocketId};
use crate::models::event::ChannelAuthResponse;
use crate::models::presence::PresenceUser;
use crate::services::Webhook;

/// Shared state for the endpoint handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub client: Client,
}

impl AppState {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Form posted by the browser SDK when subscribing to a private or presence channel.
#[derive(Debug, Deserialize)]
pub struct ChannelAuthForm {
    pub socket_id: Option<String>,
    pub channel_name: Option<String>,
    /// Presence channels only. A real application takes this from its session.
    pub user_id: Option<String>,
}

/// POST /eventflit/auth
///
/// Demo endpoint only. Presence channel data is signed from the
/// browser-supplied `user_id`, so any subscriber can claim any identity.
/// Applications must replace this route with one that takes the user id
/// and info from their own authenticated session.
pub async fn channel_auth(
    State(state): State<AppState>,
    Form(form): Form<ChannelAuthForm>,
) -> Result<Json<ChannelAuthResponse>, Error> {
    let socket_id = SocketId::parse_opt(form.socket_id.as_deref())?;
    let channel = state
        .client()
        .channel(form.channel_name.as_deref().unwrap_or_default())?;

    let response = match channel.name().channel_type() {
        ChannelType::Public => {
            return Err(ValidationError::PublicChannel(channel.name().to_string()).into())
        }
        ChannelType::Private => channel.authenticate(socket_id.as_str())?,
        ChannelType::Presence => {
            let user_id = form
                .user_id
                .filter(|id| !id.is_empty())
                .ok_or_else(|| ValidationError::MissingPresenceData(channel.name().to_string()))?;
            channel.authenticate_with_data(socket_id.as_str(), &PresenceUser::new(user_id, None))?
        }
    };

    info!(channel = %channel.name(), socket_id = %socket_id, "channel subscription authorized");
    Ok(Json(response))
}

/// POST /eventflit/webhook
pub async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let webhook = Webhook::from_headers(&headers, body.to_vec());
    if !state.client().webhook_valid(&webhook)? {
        return Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid webhook signature" })),
        ));
    }

    let events = webhook.events()?;
    for event in &events {
        info!(name = %event.name, channel = %event.channel, "webhook event");
    }

    Ok((
        StatusCode::OK,
        Json(json!({ "ok": true, "events": events.len() })),
    ))
}

/// GET /health — liveness probe.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({ "status": "ok", "service": "eventflit" })),
    )
}
