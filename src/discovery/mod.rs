//! Service discovery subsystem.
//!
//! # Data Flow
//! ```text
//! logical service name
//!     → registry.rs (GET /v1/health/service/{name}?passing=1)
//!     → instance.rs (HealthEntry → ServiceInstance, node address fallback)
//!     → selector.rs (pick one candidate)
//!     → resolver.rs (Found | NotFound | RegistryFailure)
//! ```
//!
//! # Design Decisions
//! - No caching: every request issues a fresh registry query
//! - No retries or circuit breaking at this layer
//! - Registry failures are a distinct variant for operators, but callers
//!   see the same 404 as an unknown service
//! - Selection policy is a trait so it can be swapped without touching
//!   the query logic

pub mod instance;
pub mod registry;
pub mod resolver;
pub mod selector;

pub use instance::{HealthEntry, ServiceInstance};
pub use registry::{RegistryClient, RegistryError};
pub use resolver::{Resolution, Resolver};
pub use selector::{InstanceSelector, UniformRandom};
