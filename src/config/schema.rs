//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body limit).
    pub listener: ListenerConfig,

    /// Health registry used to resolve logical service names.
    pub discovery: DiscoveryConfig,

    /// Per-client admission quota.
    pub quota: QuotaConfig,

    /// Upstream forwarding settings.
    pub forwarding: ForwardingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Largest inbound body the gateway will buffer, in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Service discovery configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Base URL of the health registry (e.g., "http://127.0.0.1:8500").
    pub registry_url: String,

    /// Timeout for a single registry query in milliseconds.
    pub timeout_ms: u64,
}

impl DiscoveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            registry_url: "http://127.0.0.1:8500".to_string(),
            timeout_ms: 2000,
        }
    }
}

/// Fixed-window quota configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QuotaConfig {
    /// Enable admission control.
    pub enabled: bool,

    /// Requests admitted per client within one window.
    pub limit: u32,

    /// Window length in seconds.
    pub window_secs: u64,
}

impl QuotaConfig {
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: 10,
            window_secs: 60,
        }
    }
}

/// Forwarding configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ForwardingConfig {
    /// Upper bound on a forwarded exchange (connect + response) in milliseconds.
    pub timeout_ms: u64,

    /// Inbound headers copied to the upstream call. Nothing else is forwarded.
    pub allowed_headers: Vec<String>,

    /// Name of the injected gateway marker header.
    pub gateway_header: String,

    /// Value of the injected gateway marker header.
    pub gateway_marker: String,

    /// Name of the injected header carrying the original client IP.
    pub client_ip_header: String,
}

impl ForwardingConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ForwardingConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            allowed_headers: vec![
                "accept".to_string(),
                "content-type".to_string(),
                "user-agent".to_string(),
            ],
            gateway_header: "x-gateway".to_string(),
            gateway_marker: "api-gateway".to_string(),
            client_ip_header: "x-client-ip".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [discovery]
            registry_url = "http://consul:8500"

            [quota]
            limit = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.discovery.registry_url, "http://consul:8500");
        assert_eq!(config.discovery.timeout_ms, 2000);
        assert_eq!(config.quota.limit, 3);
        assert_eq!(config.quota.window(), Duration::from_secs(60));
        assert!(config.quota.enabled);
        assert_eq!(config.forwarding.timeout(), Duration::from_secs(5));
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
    }

    #[test]
    fn test_log_format_is_lowercase() {
        let config: ObservabilityConfig = toml::from_str(r#"log_format = "json""#).unwrap();
        assert_eq!(config.log_format, LogFormat::Json);
    }

    #[test]
    fn test_default_allow_list() {
        let config = ForwardingConfig::default();
        assert_eq!(config.allowed_headers, ["accept", "content-type", "user-agent"]);
        assert_eq!(config.gateway_marker, "api-gateway");
    }
}
