//! Channel authentication tokens for private and presence channels.

use serde::Serialize;
use tracing::debug;

use crate::auth::{hmac_sha256_hex, Credentials};
use crate::error::Result;
use crate::models::channel::{ChannelName, SocketId};
use crate::models::event::ChannelAuthResponse;

/// Signs channel subscriptions.
/// Token: `key:hex(HMAC-SHA256(secret, socket_id:channel_name[:custom_string]))`.
#[derive(Debug, Clone)]
pub struct ChannelAuthenticator {
    credentials: Credentials,
}

impl ChannelAuthenticator {
    pub fn new(credentials: Credentials) -> Self {
        Self { credentials }
    }

    /// The `auth` value an authentication endpoint returns.
    ///
    /// `custom_string` is signed verbatim; structured data must already be
    /// serialized by the caller.
    pub fn authentication_string(
        &self,
        channel: &ChannelName,
        socket_id: &str,
        custom_string: Option<&str>,
    ) -> Result<String> {
        let socket_id = SocketId::parse(socket_id)?;

        let string_to_sign = match custom_string {
            Some(custom) => format!("{}:{}:{}", socket_id, channel, custom),
            None => format!("{}:{}", socket_id, channel),
        };
        debug!(channel = %channel, socket_id = %socket_id, "signing channel subscription");

        let signature = hmac_sha256_hex(self.credentials.secret(), string_to_sign.as_bytes())?;
        Ok(format!("{}:{}", self.credentials.key(), signature))
    }

    /// Endpoint response for a private channel: `{"auth": ...}`.
    pub fn authenticate(&self, channel: &ChannelName, socket_id: &str) -> Result<ChannelAuthResponse> {
        let auth = self.authentication_string(channel, socket_id, None)?;
        Ok(ChannelAuthResponse {
            auth,
            channel_data: None,
        })
    }

    /// Endpoint response carrying signed custom data, e.g. a
    /// [`PresenceUser`](crate::models::PresenceUser) for presence channels.
    ///
    /// `data` is serialized once; `channel_data` holds exactly the bytes that were signed.
    pub fn authenticate_with_data<T: Serialize + ?Sized>(
        &self,
        channel: &ChannelName,
        socket_id: &str,
        data: &T,
    ) -> Result<ChannelAuthResponse> {
        let channel_data = serde_json::to_string(data)?;
        let auth = self.authentication_string(channel, socket_id, Some(&channel_data))?;
        Ok(ChannelAuthResponse {
            auth,
            channel_data: Some(channel_data),
        })
    }
}
