//! HTTP transport used to deliver signed requests.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::auth::Method;
use crate::config::Config;
use crate::error::{BoxError, Error, Result};

/// A signed request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Full URL, query string included.
    pub url: Url,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one HTTP request per call. Implementations must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError>;
}

/// [`Transport`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Apply the config's timeouts and proxy.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .pool_idle_timeout(config.keep_alive_timeout);

        if let Some(proxy) = &config.http_proxy {
            let proxy = reqwest::Proxy::all(proxy.as_str()).map_err(|e| Error::Http(Box::new(e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| Error::Http(Box::new(e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, BoxError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, request.url);
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_config() {
        assert!(ReqwestTransport::from_config(&Config::default()).is_ok());
    }
}
