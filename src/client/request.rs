//! Signing, sending and decoding one REST call.

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use super::transport::{HttpRequest, Transport};
use crate::auth::{Credentials, Method, Params, SignableRequest};
use crate::error::{Error, Result};

pub(crate) struct Request<'a> {
    transport: &'a dyn Transport,
    credentials: Credentials,
    method: Method,
    url: Url,
    params: Params,
    body: Option<String>,
}

impl<'a> Request<'a> {
    pub(crate) fn new(
        transport: &'a dyn Transport,
        credentials: Credentials,
        method: Method,
        url: Url,
        params: Params,
        body: Option<String>,
    ) -> Self {
        Self {
            transport,
            credentials,
            method,
            url,
            params,
            body,
        }
    }

    pub(crate) async fn send(self) -> Result<Value> {
        let mut unsigned = SignableRequest::new(self.method, self.url.path()).with_params(self.params);
        if let Some(body) = self.body {
            unsigned = unsigned.with_body(body);
        }
        let signed = unsigned.sign(&self.credentials)?;

        let mut url = self.url;
        url.set_path(signed.path());
        url.set_query(Some(&signed.query_string()));
        debug!(method = %signed.method(), path = %signed.path(), "sending request");

        let response = self
            .transport
            .send(HttpRequest {
                method: signed.method(),
                url,
                body: signed.body().map(str::to_owned),
            })
            .await
            .map_err(Error::Http)?;

        handle_response(response.status, &response.body, signed.path())
    }
}

/// Map a response to a JSON value or a typed error.
pub(crate) fn handle_response(status: u16, body: &str, path: &str) -> Result<Value> {
    match status {
        200 => decode(body),
        202 if body.trim().is_empty() => Ok(Value::Bool(true)),
        202 => decode(body),
        400 => Err(Error::BadRequest(body.to_string())),
        401 => Err(Error::Authentication(body.to_string())),
        404 => Err(Error::NotFound(path.to_string())),
        407 => Err(Error::ProxyAuthenticationRequired),
        status => Err(Error::UnexpectedStatus {
            status,
            body: body.to_string(),
        }),
    }
}

fn decode(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}
