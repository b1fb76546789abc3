//! Service instances and the registry records they are derived from.

use serde::Deserialize;
use std::fmt;

/// A reachable endpoint of a logical service.
///
/// Only produced from records the registry reported as passing, and only
/// for the duration of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceInstance {
    pub address: String,
    pub port: u16,
}

impl ServiceInstance {
    pub fn new(address: impl Into<String>, port: u16) -> Self {
        Self {
            address: address.into(),
            port,
        }
    }

    /// `host:port`, with IPv6 hosts bracketed.
    pub fn authority(&self) -> String {
        if self.address.contains(':') && !self.address.starts_with('[') {
            format!("[{}]:{}", self.address, self.port)
        } else {
            format!("{}:{}", self.address, self.port)
        }
    }
}

impl fmt::Display for ServiceInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

/// One entry of `/v1/health/service/{name}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HealthEntry {
    pub service: ServiceRecord,
    pub node: NodeRecord,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRecord {
    #[serde(default)]
    pub address: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NodeRecord {
    #[serde(default)]
    pub address: String,
}

impl From<HealthEntry> for ServiceInstance {
    /// Service address wins; the node address is the fallback.
    fn from(entry: HealthEntry) -> Self {
        let address = if entry.service.address.is_empty() {
            entry.node.address
        } else {
            entry.service.address
        };
        ServiceInstance::new(address, entry.service.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<HealthEntry> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_prefers_service_address() {
        let entries = parse(
            r#"[{"Node": {"Node": "n1", "Address": "192.168.1.5"},
                 "Service": {"ID": "users-1", "Address": "10.0.0.1", "Port": 8080},
                 "Checks": []}]"#,
        );
        let instance = ServiceInstance::from(entries[0].clone());
        assert_eq!(instance, ServiceInstance::new("10.0.0.1", 8080));
    }

    #[test]
    fn test_falls_back_to_node_address() {
        let entries = parse(
            r#"[{"Node": {"Address": "192.168.1.5"},
                 "Service": {"Address": "", "Port": 9000}}]"#,
        );
        let instance = ServiceInstance::from(entries[0].clone());
        assert_eq!(instance, ServiceInstance::new("192.168.1.5", 9000));
    }

    #[test]
    fn test_missing_service_address_falls_back() {
        let entries = parse(r#"[{"Node": {"Address": "10.1.1.1"}, "Service": {"Port": 81}}]"#);
        assert_eq!(ServiceInstance::from(entries[0].clone()).authority(), "10.1.1.1:81");
    }

    #[test]
    fn test_missing_port_is_malformed() {
        let result: Result<Vec<HealthEntry>, _> =
            serde_json::from_str(r#"[{"Node": {"Address": "10.1.1.1"}, "Service": {}}]"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_ipv6_authority() {
        assert_eq!(ServiceInstance::new("::1", 8080).authority(), "[::1]:8080");
        assert_eq!(ServiceInstance::new("[::1]", 8080).authority(), "[::1]:8080");
    }
}
