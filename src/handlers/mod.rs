//! HTTP endpoint glue for applications embedding the library in an axum server.

pub mod http;

pub use http::*;
