//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! RouteRequest + ServiceInstance
//!     → target.rs (http://host:port/path?query)
//!     → headers.rs (allow-list + X-Gateway + X-Client-IP)
//!     → engine.rs (single upstream call under a timeout)
//!     → outcome.rs (Success | TransportFailure)
//! ```
//!
//! # Design Decisions
//! - Upstream status codes are never interpreted; a 500 is a success here
//! - 3xx responses are relayed, never followed
//! - Transport causes go to the log, never into the caller's response
//! - The allow-list is configuration, not whatever headers happen to arrive

pub mod engine;
pub mod headers;
pub mod outcome;
pub mod target;

pub use engine::Forwarder;
pub use headers::{HeaderPolicy, HeaderPolicyError};
pub use outcome::{ForwardOutcome, TransportError, UpstreamResponse, UNRESOLVED_SERVICE};
pub use target::target_url;
