//! A REST resource under `/apps/{app_id}`.

use serde::Serialize;
use serde_json::Value;

use super::request::Request;
use super::Client;
use crate::auth::{Method, Params};
use crate::error::Result;

#[derive(Debug, Clone)]
pub struct Resource<'a> {
    client: &'a Client,
    path: String,
}

impl<'a> Resource<'a> {
    pub(crate) fn new(client: &'a Client, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub async fn get(&self, params: &Params) -> Result<Value> {
        self.request(Method::Get, params.clone(), None).await
    }

    /// POST `body` as JSON.
    pub async fn post<T: Serialize + ?Sized>(&self, body: &T) -> Result<Value> {
        let body = serde_json::to_string(body)?;
        self.request(Method::Post, Params::new(), Some(body)).await
    }

    async fn request(&self, method: Method, params: Params, body: Option<String>) -> Result<Value> {
        let url = self.client.url(&self.path)?;
        let credentials = self.client.credentials()?;
        Request::new(self.client.transport(), credentials, method, url, params, body)
            .send()
            .await
    }
}
