//! Admission control subsystem.
//!
//! # Data Flow
//! ```text
//! client identity (source IP)
//!     → controller.rs (enabled? consult store)
//!     → store.rs (atomic per-key consume)
//!     → window.rs (fixed-window arithmetic)
//!     → Accepted | Rejected { retry_after }
//! ```
//!
//! # Design Decisions
//! - One unit per request, keyed by source IP, not authenticated principal
//! - The counter table is an injected store, not a global
//! - Rejection is terminal: discovery and forwarding never run

pub mod controller;
pub mod store;
pub mod window;

pub use controller::AdmissionController;
pub use store::{InMemoryQuotaStore, QuotaStore};
pub use window::{Admission, QuotaPolicy, QuotaState};
