//! Native push notifications to interests.

use reqwest::Url;
use serde_json::{Map, Value};
use tracing::info;

use crate::auth::{Method, Params};
use crate::client::{Client, Request};
use crate::config::ConfigLoadError;
use crate::error::{Error, Result, ValidationError};

const API_PREFIX: &str = "publisher/app";

/// Posts notifications to the native push API, signed with the client's credentials.
#[derive(Debug, Clone)]
pub struct NativeNotificationClient {
    app_id: String,
    host: String,
    scheme: String,
    client: Client,
}

impl NativeNotificationClient {
    pub fn new(client: Client) -> Result<Self> {
        let config = client.config();
        let app_id = config
            .app_id
            .clone()
            .filter(|id| !id.is_empty())
            .ok_or(Error::Configuration("app_id"))?;
        Ok(Self {
            app_id,
            host: config.notification_host.clone(),
            scheme: config.notification_scheme.clone(),
            client,
        })
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// `{scheme}://{host}/publisher/app/{app_id}{path}`
    pub fn url(&self, path: &str) -> Result<Url> {
        let raw = format!(
            "{}://{}/{}/{}{}",
            self.scheme, self.host, API_PREFIX, self.app_id, path
        );
        Url::parse(&raw).map_err(|e| Error::ConfigLoad(ConfigLoadError::InvalidUrl(e.to_string())))
    }

    /// `data` holds the platform payloads (`apns`, `gcm`, ...); `interests` is merged in.
    pub async fn notify<S: AsRef<str>>(&self, interests: &[S], data: Value) -> Result<Value> {
        let body = payload(interests, data)?;
        let url = self.url("/publishes")?;
        let credentials = self.client.credentials()?;
        info!(interests = interests.len(), "sending native notification");
        Request::new(
            self.client.transport(),
            credentials,
            Method::Post,
            url,
            Params::new(),
            Some(body),
        )
        .send()
        .await
    }
}

/// JSON body: the caller's fields plus `interests`.
pub fn payload<S: AsRef<str>>(interests: &[S], data: Value) -> Result<String> {
    if interests.is_empty() {
        return Err(ValidationError::EmptyInterests.into());
    }
    let mut object = match data {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        _ => return Err(ValidationError::InvalidNotificationData.into()),
    };
    let interests = interests
        .iter()
        .map(|i| Value::String(i.as_ref().to_owned()))
        .collect();
    object.insert("interests".to_owned(), Value::Array(interests));
    Ok(serde_json::to_string(&Value::Object(object))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use serde_json::json;

    #[test]
    fn payload_merges_interests() {
        let body = payload(&["donuts"], json!({ "apns": { "aps": { "alert": "hi" } } })).unwrap();
        let value: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(
            value,
            json!({ "apns": { "aps": { "alert": "hi" } }, "interests": ["donuts"] })
        );
    }

    #[test]
    fn payload_requires_interests() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            payload(&empty, json!({})),
            Err(Error::Validation(ValidationError::EmptyInterests))
        ));
    }

    #[test]
    fn payload_rejects_non_object_data() {
        assert!(matches!(
            payload(&["a"], json!([1])),
            Err(Error::Validation(ValidationError::InvalidNotificationData))
        ));
        assert_eq!(payload(&["a"], Value::Null).unwrap(), r#"{"interests":["a"]}"#);
    }

    #[test]
    fn url_has_single_slashes() {
        let client = Client::new(Config::new("54", "k", "s")).unwrap();
        let notifications = NativeNotificationClient::new(client).unwrap();
        assert_eq!(
            notifications.url("/publishes").unwrap().as_str(),
            "https://nativepush-cluster1.eventflit.com/publisher/app/54/publishes"
        );
    }
}
