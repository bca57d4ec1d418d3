//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use crate::config::schema::HealthConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            ConfigError::Validation(_) => None,
        }
    }
}

/// Command-line values that take precedence over the config file.
///
/// An empty host or a zero port means "not given" and leaves the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub db_host: Option<String>,
    pub db_port: Option<u16>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut HealthConfig) {
        if let Some(host) = self.host.as_deref().filter(|h| !h.is_empty()) {
            config.host = host.to_string();
        }
        if let Some(port) = self.port.filter(|p| *p != 0) {
            config.port = port;
        }
        if let Some(host) = self.db_host.as_deref().filter(|h| !h.is_empty()) {
            config.db.host = host.to_string();
        }
        if let Some(port) = self.db_port.filter(|p| *p != 0) {
            config.db.port = port;
        }
    }
}

/// Parse a TOML document without validating it.
pub fn parse_config(content: &str) -> Result<HealthConfig, ConfigError> {
    toml::from_str(content).map_err(ConfigError::Parse)
}

/// Load a TOML file, apply command-line overrides, then validate.
pub fn load_config(path: &Path, overrides: &ConfigOverrides) -> Result<HealthConfig, ConfigError> {
    tracing::debug!(path = %path.display(), "Parsing config file");

    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config = parse_config(&content)?;

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
host = "127.0.0.1"
port = 9200
available_when_donor = false

[db]
host = "db1.internal"
username = "health"
password = "hunter2"
"#;

    #[test]
    fn parses_partial_document_with_defaults() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9200);
        assert!(!config.available_when_donor);
        assert_eq!(config.db.host, "db1.internal");
        assert_eq!(config.db.port, 3306);
        assert_eq!(config.db.max_connections, 10);
        assert_eq!(config.timeouts.shutdown_secs, 15);
    }

    #[test]
    fn rejects_malformed_toml() {
        let err = parse_config("port = \"many\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn metrics_address_is_parsed_with_the_file() {
        let config = parse_config("[observability]\nmetrics_address = \"0.0.0.0:9300\"").unwrap();
        assert_eq!(config.observability.metrics_address.port(), 9300);

        let err = parse_config("[observability]\nmetrics_address = \"not an address\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn flags_take_precedence() {
        let mut config = parse_config(SAMPLE).unwrap();
        let overrides = ConfigOverrides {
            host: Some("0.0.0.0".into()),
            port: Some(33061),
            db_host: None,
            db_port: Some(3307),
        };
        overrides.apply(&mut config);

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 33061);
        assert_eq!(config.db.host, "db1.internal");
        assert_eq!(config.db.port, 3307);
    }

    #[test]
    fn empty_flags_do_not_override() {
        let mut config = parse_config(SAMPLE).unwrap();
        let overrides = ConfigOverrides {
            host: Some(String::new()),
            port: Some(0),
            ..Default::default()
        };
        overrides.apply(&mut config);

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9200);
    }

    #[test]
    fn loads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = load_config(file.path(), &ConfigOverrides::default()).unwrap();
        assert_eq!(config.db.username, "health");
    }

    #[test]
    fn missing_password_prevents_startup() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"[db]\nusername = \"health\"\n").unwrap();

        let err = load_config(file.path(), &ConfigOverrides::default()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("db.password"));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(
            Path::new("/nonexistent/galera-health.toml"),
            &ConfigOverrides::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
