//! Startup configuration assembly.
//!
//! File (or defaults) → CLI/env overrides → validation. Any error is fatal.

use std::path::Path;

use crate::config::{load_config, validate_config, ConfigError, GatewayConfig};

/// Values supplied on the command line or through the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub registry_url: Option<String>,
}

impl Overrides {
    pub fn apply(self, config: &mut GatewayConfig) {
        if let Some(bind_address) = self.bind_address {
            config.listener.bind_address = bind_address;
        }
        if let Some(registry_url) = self.registry_url {
            config.discovery.registry_url = registry_url;
        }
    }
}

/// Build the effective configuration.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
