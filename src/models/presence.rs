//! Presence channel data: the user a presence subscription is signed for.

use serde::{Deserialize, Serialize};

/// User data signed into a presence channel auth token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresenceUser {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_info: Option<serde_json::Value>,
}

impl PresenceUser {
    pub fn new(user_id: impl Into<String>, user_info: Option<serde_json::Value>) -> Self {
        Self {
            user_id: user_id.into(),
            user_info,
        }
    }
}

/// Member entry returned by `GET /channels/{channel}/users`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUser {
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presence_user_omits_missing_info() {
        let user = PresenceUser::new("10", None);
        assert_eq!(serde_json::to_string(&user).unwrap(), r#"{"user_id":"10"}"#);
    }

    #[test]
    fn presence_user_keeps_field_order() {
        let user = PresenceUser::new("10", Some(serde_json::json!({ "name": "Ann" })));
        assert_eq!(
            serde_json::to_string(&user).unwrap(),
            r#"{"user_id":"10","user_info":{"name":"Ann"}}"#
        );
    }
}
