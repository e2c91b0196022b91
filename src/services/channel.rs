//! Channel handle: trigger, query and authenticate one named channel.

use serde::Serialize;
use serde_json::Value;

use crate::auth::Params;
use crate::client::Client;
use crate::error::Result;
use crate::models::channel::ChannelName;
use crate::models::event::ChannelAuthResponse;
use crate::models::presence::ChannelUser;

/// A validated channel bound to a client.
#[derive(Debug, Clone)]
pub struct Channel {
    name: ChannelName,
    client: Client,
}

impl Channel {
    pub fn new(client: Client, name: &str) -> Result<Self> {
        Ok(Self {
            name: ChannelName::parse(name)?,
            client,
        })
    }

    pub fn name(&self) -> &ChannelName {
        &self.name
    }

    pub async fn trigger<T: Serialize + ?Sized>(
        &self,
        event_name: &str,
        data: &T,
        socket_id: Option<&str>,
    ) -> Result<Value> {
        self.client
            .trigger(&[self.name.as_str()], event_name, data, socket_id)
            .await
    }

    /// Channel attributes, e.g. `["user_count", "subscription_count"]`.
    pub async fn info(&self, attributes: &[&str]) -> Result<Value> {
        let mut params = Params::new();
        if !attributes.is_empty() {
            params.insert("info".to_owned(), attributes.join(","));
        }
        self.client.channel_info(self.name.as_str(), &params).await
    }

    /// Members of a presence channel.
    pub async fn users(&self) -> Result<Vec<ChannelUser>> {
        let response = self
            .client
            .channel_users(self.name.as_str(), &Params::new())
            .await?;
        match response.get("users") {
            Some(users) => Ok(serde_json::from_value(users.clone())?),
            None => Ok(Vec::new()),
        }
    }

    pub fn authentication_string(&self, socket_id: &str, custom_string: Option<&str>) -> Result<String> {
        self.client
            .authenticator()?
            .authentication_string(&self.name, socket_id, custom_string)
    }

    pub fn authenticate(&self, socket_id: &str) -> Result<ChannelAuthResponse> {
        self.client.authenticator()?.authenticate(&self.name, socket_id)
    }

    pub fn authenticate_with_data<T: Serialize + ?Sized>(
        &self,
        socket_id: &str,
        data: &T,
    ) -> Result<ChannelAuthResponse> {
        self.client
            .authenticator()?
            .authenticate_with_data(&self.name, socket_id, data)
    }
}
