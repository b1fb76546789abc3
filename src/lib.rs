//! Dynamic API gateway library.
//!
//! Requests to `/api/{service}/{*path}` pass an admission check, have
//! `{service}` resolved through a health registry, and are forwarded to one
//! healthy instance.

pub mod admission;
pub mod config;
pub mod discovery;
pub mod forwarding;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::Shutdown;
