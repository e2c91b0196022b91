//! REST client: triggers, channel queries and signed resources.

mod request;
mod resource;
pub mod transport;

pub use resource::Resource;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

pub(crate) use request::Request;

use std::fmt;
use std::sync::Arc;

use reqwest::Url;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::auth::{Credentials, Params};
use crate::config::{Config, ConfigLoadError};
use crate::error::{Error, Result, ValidationError};
use crate::models::channel::{ChannelName, SocketId};
use crate::models::event::{encode_data, BatchEvent, BatchRequest, ChannelAuthResponse, TriggerRequest};
use crate::services::{Channel, ChannelAuthenticator, NativeNotificationClient, Webhook};

/// Most channels a single trigger may target.
pub const MAX_TRIGGER_CHANNELS: usize = 100;

/// Client for one application. Cheap to clone; the config is read-only.
#[derive(Clone)]
pub struct Client {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Client using a [`ReqwestTransport`] built from `config`.
    pub fn new(config: Config) -> Result<Self> {
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
        }
    }

    /// See [`Config::from_env`].
    pub fn from_env() -> Result<Self> {
        Self::new(Config::from_env()?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn credentials(&self) -> Result<Credentials> {
        self.config.credentials()
    }

    pub(crate) fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    /// `{scheme}://{host}:{port}/apps/{app_id}{path}`
    pub fn url(&self, path: &str) -> Result<Url> {
        let app_id = self
            .config
            .app_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(Error::Configuration("app_id"))?;
        let raw = format!(
            "{}://{}:{}/apps/{}{}",
            self.config.scheme, self.config.host, self.config.port, app_id, path
        );
        Url::parse(&raw).map_err(|e| Error::ConfigLoad(ConfigLoadError::InvalidUrl(e.to_string())))
    }

    pub fn resource(&self, path: impl Into<String>) -> Resource<'_> {
        Resource::new(self, path)
    }

    pub async fn get(&self, path: &str, params: &Params) -> Result<Value> {
        self.resource(path).get(params).await
    }

    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Value> {
        self.resource(path).post(body).await
    }

    /// `GET /channels`, e.g. with `filter_by_prefix` or `info`.
    pub async fn channels(&self, params: &Params) -> Result<Value> {
        self.get("/channels", params).await
    }

    /// `GET /channels/{channel}`
    pub async fn channel_info(&self, channel: &str, params: &Params) -> Result<Value> {
        let channel = ChannelName::parse(channel)?;
        self.get(&format!("/channels/{}", channel), params).await
    }

    /// `GET /channels/{channel}/users`; presence channels only.
    pub async fn channel_users(&self, channel: &str, params: &Params) -> Result<Value> {
        let channel = ChannelName::parse(channel)?;
        self.get(&format!("/channels/{}/users", channel), params).await
    }

    /// Publish `event_name` to each channel. `socket_id` excludes that connection from receiving it.
    pub async fn trigger<S, T>(
        &self,
        channels: &[S],
        event_name: &str,
        data: &T,
        socket_id: Option<&str>,
    ) -> Result<Value>
    where
        S: AsRef<str>,
        T: Serialize + ?Sized,
    {
        if channels.len() > MAX_TRIGGER_CHANNELS {
            return Err(ValidationError::TooManyChannels(channels.len()).into());
        }
        let channels = channels
            .iter()
            .map(|c| ChannelName::parse(c.as_ref()).map(|name| name.as_str().to_owned()))
            .collect::<Result<Vec<_>, _>>()?;
        let socket_id = socket_id
            .map(SocketId::parse)
            .transpose()?
            .map(|id| id.as_str().to_owned());

        let body = TriggerRequest {
            name: event_name.to_owned(),
            channels,
            data: encode_data(data)?,
            socket_id,
        };
        info!(event = %body.name, channels = ?body.channels, "triggering event");
        self.post("/events", &body).await
    }

    /// Publish several events in one call: `POST /batch_events`.
    pub async fn trigger_batch(&self, events: &[BatchEvent]) -> Result<Value> {
        for event in events {
            ChannelName::parse(event.channel.as_str())?;
            if let Some(socket_id) = &event.socket_id {
                SocketId::parse(socket_id)?;
            }
        }
        let body = BatchRequest {
            batch: events.to_vec(),
        };
        info!(count = events.len(), "triggering batch");
        self.post("/batch_events", &body).await
    }

    /// A validated handle on one channel.
    pub fn channel(&self, name: &str) -> Result<Channel> {
        Channel::new(self.clone(), name)
    }

    pub fn authenticator(&self) -> Result<ChannelAuthenticator> {
        Ok(ChannelAuthenticator::new(self.credentials()?))
    }

    /// Auth endpoint response for a private channel.
    pub fn authenticate(&self, channel: &str, socket_id: &str) -> Result<ChannelAuthResponse> {
        self.channel(channel)?.authenticate(socket_id)
    }

    /// Auth endpoint response signing `data`, e.g. presence user data.
    pub fn authenticate_with_data<T: Serialize + ?Sized>(
        &self,
        channel: &str,
        socket_id: &str,
        data: &T,
    ) -> Result<ChannelAuthResponse> {
        self.channel(channel)?
            .authenticate_with_data(socket_id, data)
    }

    /// Whether `webhook` was signed with this application's credentials.
    pub fn webhook_valid(&self, webhook: &Webhook) -> Result<bool> {
        Ok(webhook.valid(&self.credentials()?, &[]))
    }

    pub fn notification_client(&self) -> Result<NativeNotificationClient> {
        NativeNotificationClient::new(self.clone())
    }

    /// Send a native push notification to `interests`.
    pub async fn notify<S: AsRef<str>>(&self, interests: &[S], data: Value) -> Result<Value> {
        self.notification_client()?.notify(interests, data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(config: Config) -> Client {
        Client::new(config).unwrap()
    }

    #[test]
    fn url_includes_app_path() {
        let client = client(Config::new("54", "k", "s").with_port(441));
        assert_eq!(
            client.url("/channels").unwrap().as_str(),
            "http://service.eventflit.com:441/apps/54/channels"
        );
    }

    #[test]
    fn url_requires_app_id() {
        let client = client(Config::default());
        assert!(matches!(client.url("/events"), Err(Error::Configuration("app_id"))));
    }

    #[test]
    fn channel_rejects_illegal_name() {
        let client = client(Config::new("1", "k", "s"));
        assert!(matches!(
            client.channel("bad name"),
            Err(Error::Validation(ValidationError::IllegalChannelName(_)))
        ));
    }

    #[test]
    fn authenticate_requires_credentials() {
        let client = client(Config::default());
        assert!(matches!(
            client.authenticate("private-a", "1.1"),
            Err(Error::Configuration(_))
        ));
    }
}
