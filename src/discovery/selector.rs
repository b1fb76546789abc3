//! Instance selection strategies.

use rand::seq::SliceRandom;

use crate::discovery::instance::ServiceInstance;

/// Picks one instance out of the healthy candidates for a request.
pub trait InstanceSelector: Send + Sync + std::fmt::Debug {
    /// Returns `None` only when `candidates` is empty.
    fn select<'a>(&self, candidates: &'a [ServiceInstance]) -> Option<&'a ServiceInstance>;
}

/// Uniform random choice, independent across requests.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformRandom;

impl InstanceSelector for UniformRandom {
    fn select<'a>(&self, candidates: &'a [ServiceInstance]) -> Option<&'a ServiceInstance> {
        candidates.choose(&mut rand::thread_rng())
    }
}
