//! Channel authentication, channel handles, webhooks and native notifications.

pub mod auth;
pub mod channel;
pub mod notification;
pub mod webhook;

pub use auth::ChannelAuthenticator;
pub use channel::Channel;
pub use notification::NativeNotificationClient;
pub use webhook::Webhook;
