//! Configuration validation.
//!
//! Serde handles the syntactic checks; this module covers value ranges and
//! formats. All problems are reported, not just the first.

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue};
use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid socket address for {field}: {value}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("invalid registry url {0}")]
    InvalidRegistryUrl(String),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("invalid header name in {field}: {value}")]
    InvalidHeaderName { field: &'static str, value: String },

    #[error("invalid gateway marker value: {0}")]
    InvalidMarker(String),
}

/// Validate a configuration, returning every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_socket_addr(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_socket_addr(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    match Url::parse(&config.discovery.registry_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && !url.cannot_be_a_base() => {}
        _ => errors.push(ValidationError::InvalidRegistryUrl(
            config.discovery.registry_url.clone(),
        )),
    }

    if config.listener.max_body_bytes == 0 {
        errors.push(ValidationError::Zero("listener.max_body_bytes"));
    }
    if config.discovery.timeout_ms == 0 {
        errors.push(ValidationError::Zero("discovery.timeout_ms"));
    }
    if config.forwarding.timeout_ms == 0 {
        errors.push(ValidationError::Zero("forwarding.timeout_ms"));
    }
    if config.quota.enabled {
        if config.quota.limit == 0 {
            errors.push(ValidationError::Zero("quota.limit"));
        }
        if config.quota.window_secs == 0 {
            errors.push(ValidationError::Zero("quota.window_secs"));
        }
    }

    for name in &config.forwarding.allowed_headers {
        check_header_name(&mut errors, "forwarding.allowed_headers", name);
    }
    check_header_name(&mut errors, "forwarding.gateway_header", &config.forwarding.gateway_header);
    check_header_name(
        &mut errors,
        "forwarding.client_ip_header",
        &config.forwarding.client_ip_header,
    );
    if HeaderValue::from_str(&config.forwarding.gateway_marker).is_err() {
        errors.push(ValidationError::InvalidMarker(
            config.forwarding.gateway_marker.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_socket_addr(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_header_name(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if HeaderName::from_bytes(value.as_bytes()).is_err() {
        errors.push(ValidationError::InvalidHeaderName {
            field,
            value: value.to_string(),
        });
    }
}
