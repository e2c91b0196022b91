//! Wire models for the REST API, the channel auth endpoint and webhooks.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Body of `POST /events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerRequest {
    pub name: String,
    pub channels: Vec<String>,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
}

/// One event of `POST /batch_events`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchEvent {
    pub channel: String,
    pub name: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_id: Option<String>,
}

impl BatchEvent {
    /// Build an event; `data` goes through [`encode_data`].
    pub fn new<T: Serialize + ?Sized>(
        channel: impl Into<String>,
        name: impl Into<String>,
        data: &T,
    ) -> Result<Self> {
        Ok(Self {
            channel: channel.into(),
            name: name.into(),
            data: encode_data(data)?,
            socket_id: None,
        })
    }

    /// Exclude the given connection from receiving the event.
    pub fn excluding(mut self, socket_id: impl Into<String>) -> Self {
        self.socket_id = Some(socket_id.into());
        self
    }
}

/// Body of `POST /batch_events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRequest {
    pub batch: Vec<BatchEvent>,
}

/// Response body of a channel authentication endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAuthResponse {
    pub auth: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<String>,
}

/// Decoded webhook body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookData {
    pub time_ms: i64,
    #[serde(default)]
    pub events: Vec<WebhookEvent>,
}

/// A single webhook event, e.g. `channel_occupied` or `member_added`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub name: String,
    #[serde(default)]
    pub channel: String,
    /// Event specific fields (`user_id`, `event`, `data`, `socket_id`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Event payloads travel as strings: a JSON string is sent as-is, any other value is JSON-encoded.
pub fn encode_data<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    match serde_json::to_value(data)? {
        serde_json::Value::String(s) => Ok(s),
        other => Ok(serde_json::to_string(&other)?),
    }
}
