//! Channel types, channel names and socket ids.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Longest channel name the service accepts.
pub const MAX_CHANNEL_NAME_LENGTH: usize = 200;

/// Channel type based on prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelType {
    /// Public channel: no auth required.
    Public,
    /// Private channel: subscribers need an auth token.
    Private,
    /// Presence channel: auth token signed over user data.
    Presence,
}

impl ChannelType {
    /// Derive channel type from name: `private-*`, `presence-*`, anything else is public.
    pub fn from_name(name: &str) -> Self {
        if name.starts_with("presence-") {
            ChannelType::Presence
        } else if name.starts_with("private-") {
            ChannelType::Private
        } else {
            ChannelType::Public
        }
    }

    pub fn requires_auth(&self) -> bool {
        matches!(self, ChannelType::Private | ChannelType::Presence)
    }
}

/// A validated channel name: `[A-Za-z0-9_\-=@,.;]+`, at most 200 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelName(String);

impl ChannelName {
    pub fn parse(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.is_empty() || !name.chars().all(is_channel_char) {
            return Err(ValidationError::IllegalChannelName(name));
        }
        if name.len() > MAX_CHANNEL_NAME_LENGTH {
            return Err(ValidationError::ChannelNameTooLong(name));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn channel_type(&self) -> ChannelType {
        ChannelType::from_name(&self.0)
    }
}

impl fmt::Display for ChannelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChannelName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn is_channel_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '=' | '@' | ',' | '.' | ';')
}

/// A subscriber connection id issued by the service: `<digits>.<digits>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SocketId(String);

impl SocketId {
    pub fn parse(socket_id: &str) -> Result<Self, ValidationError> {
        let valid = socket_id
            .split_once('.')
            .map(|(conn, seq)| is_digits(conn) && is_digits(seq))
            .unwrap_or(false);
        if !valid {
            return Err(ValidationError::InvalidSocketId(socket_id.to_string()));
        }
        Ok(Self(socket_id.to_string()))
    }

    /// Missing socket ids are rejected the same way as malformed ones.
    pub fn parse_opt(socket_id: Option<&str>) -> Result<Self, ValidationError> {
        match socket_id {
            Some(id) => Self::parse(id),
            None => Err(ValidationError::InvalidSocketId(String::new())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SocketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
