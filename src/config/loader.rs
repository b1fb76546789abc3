//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::ValidationError;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from a TOML file. Semantic validation is left to the
/// caller, after overrides are applied.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Deserialize configuration from TOML text.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::validation::validate_config;

    #[test]
    fn test_parse_full_config() {
        let config = parse_config(
            r#"
            [listener]
            bind_address = "127.0.0.1:9000"

            [discovery]
            registry_url = "http://consul.internal:8500"

            [quota]
            limit = 100
            window_secs = 1

            [forwarding]
            timeout_ms = 250
            allowed_headers = ["accept"]

            [observability]
            log_format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.quota.limit, 100);
        assert_eq!(config.forwarding.allowed_headers, ["accept"]);
    }

    #[test]
    fn test_parse_does_not_validate() {
        let config = parse_config(
            r#"
            [discovery]
            registry_url = "consul"
            "#,
        )
        .unwrap();
        assert_eq!(config.discovery.registry_url, "consul");
    }

    #[test]
    fn test_validation_errors_are_joined() {
        let config = parse_config(
            r#"
            [quota]
            limit = 0
            window_secs = 0
            "#,
        )
        .unwrap();
        let err = ConfigError::Validation(validate_config(&config).unwrap_err());

        assert_eq!(
            err.to_string(),
            "Validation failed: quota.limit must be greater than zero, \
             quota.window_secs must be greater than zero"
        );
    }

    #[test]
    fn test_example_config_is_valid() {
        let config = parse_config(include_str!("../../gateway.example.toml")).unwrap();
        validate_config(&config).unwrap();
        assert_eq!(config.quota.limit, 10);
        assert_eq!(config.forwarding.timeout_ms, 5000);
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(parse_config("[quota"), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/gateway.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
