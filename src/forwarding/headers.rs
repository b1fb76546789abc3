//! Outbound header policy.
//!
//! Only allow-listed inbound headers cross the gateway. Two identity headers
//! are injected on every call; inbound values for them are discarded.

use std::net::IpAddr;

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::ForwardingConfig;

/// Connection-scoped response headers the gateway re-frames itself.
const HOP_BY_HOP: [&str; 7] = [
    "connection",
    "keep-alive",
    "proxy-connection",
    "transfer-encoding",
    "te",
    "trailer",
    "upgrade",
];

#[derive(Debug, Error)]
pub enum HeaderPolicyError {
    #[error("invalid header name: {0}")]
    Name(#[from] header::InvalidHeaderName),

    #[error("invalid header value: {0}")]
    Value(#[from] header::InvalidHeaderValue),
}

#[derive(Debug, Clone)]
pub struct HeaderPolicy {
    allowed: Vec<HeaderName>,
    gateway_header: HeaderName,
    gateway_marker: HeaderValue,
    client_ip_header: HeaderName,
}

impl HeaderPolicy {
    pub fn from_config(config: &ForwardingConfig) -> Result<Self, HeaderPolicyError> {
        let allowed = config
            .allowed_headers
            .iter()
            .map(|name| HeaderName::from_bytes(name.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            allowed,
            gateway_header: HeaderName::from_bytes(config.gateway_header.as_bytes())?,
            gateway_marker: HeaderValue::from_str(&config.gateway_marker)?,
            client_ip_header: HeaderName::from_bytes(config.client_ip_header.as_bytes())?,
        })
    }

    pub fn allowed(&self) -> &[HeaderName] {
        &self.allowed
    }

    /// Build the header set for the upstream call.
    pub fn outbound(&self, inbound: &HeaderMap, client_ip: IpAddr) -> HeaderMap {
        let mut headers = HeaderMap::new();

        for name in &self.allowed {
            for value in inbound.get_all(name) {
                headers.append(name.clone(), value.clone());
            }
        }

        headers.insert(self.gateway_header.clone(), self.gateway_marker.clone());
        // An IP address always renders as a valid header value.
        if let Ok(ip) = HeaderValue::from_str(&client_ip.to_string()) {
            headers.insert(self.client_ip_header.clone(), ip);
        }
        headers
    }
}

/// Drop hop-by-hop headers from an upstream response, keeping the rest as-is.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(name);
    }
}
