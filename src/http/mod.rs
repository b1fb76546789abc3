//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, body limit)
//!     → request.rs (capture RouteRequest, raw remaining path)
//!     → admission → discovery → forwarding
//!     → response.rs (ForwardOutcome → Response)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{RouteRequest, X_REQUEST_ID};
pub use server::{dispatch, AppState, GatewayServer, ServerError};
