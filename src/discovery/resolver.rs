//! Logical service name → one healthy instance.

use crate::discovery::instance::ServiceInstance;
use crate::discovery::registry::{RegistryClient, RegistryError};
use crate::discovery::selector::InstanceSelector;
use crate::observability::metrics;

/// Result of a single lookup.
#[derive(Debug)]
pub enum Resolution {
    Found(ServiceInstance),
    /// The registry answered with no passing instances.
    NotFound,
    /// The registry could not be queried or its answer was unusable.
    RegistryFailure(RegistryError),
}

/// Resolves service names against the health registry.
#[derive(Debug)]
pub struct Resolver {
    registry: RegistryClient,
    selector: Box<dyn InstanceSelector>,
}

impl Resolver {
    pub fn new(registry: RegistryClient, selector: Box<dyn InstanceSelector>) -> Self {
        Self { registry, selector }
    }

    /// Query the registry and pick one passing instance of `service`.
    pub async fn resolve(&self, service: &str) -> Resolution {
        // Dot segments would be dropped from the query path.
        if service.is_empty() || service == "." || service == ".." {
            return Resolution::NotFound;
        }

        let entries = match self.registry.passing_instances(service).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(service = %service, error = %e, "Registry lookup failed");
                metrics::record_registry_failure();
                return Resolution::RegistryFailure(e);
            }
        };

        let candidates: Vec<ServiceInstance> = entries.into_iter().map(Into::into).collect();
        match self.selector.select(&candidates) {
            Some(instance) => {
                tracing::debug!(
                    service = %service,
                    instance = %instance,
                    candidates = candidates.len(),
                    "Service resolved"
                );
                Resolution::Found(instance.clone())
            }
            None => {
                tracing::debug!(service = %service, "No passing instances");
                Resolution::NotFound
            }
        }
    }
}
