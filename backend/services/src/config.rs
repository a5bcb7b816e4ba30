use crate::error::ConfigError;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Keys recognised in the config file. Each can be overridden by an
/// environment variable of the same name.
pub const CONFIG_KEYS: [&str; 5] = [
    "InfluxUsername",
    "InfluxPassword",
    "InfluxHost",
    "InfluxDatabase",
    "InfluxMeasurement",
];

/// Override lookup backed by the process environment.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// InfluxDB connection and target settings, loaded once per invocation.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Configuration {
    pub influx_username: String,
    pub influx_password: String,
    pub influx_host: String,
    pub influx_database: String,
    pub influx_measurement: String,
}

impl Configuration {
    /// Load the config file, applying overrides from `lookup`.
    ///
    /// Every key must end up present, either in the file or through an
    /// override. Nothing is defaulted.
    pub fn load_with_env<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let Value::Object(mut map) = value else {
            return Err(ConfigError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        for key in CONFIG_KEYS {
            if let Some(v) = lookup(key) {
                log::debug!("{} overridden from environment", key);
                map.insert(key.to_string(), Value::String(v));
            }
        }

        let config: Configuration = serde_json::from_value(Value::Object(map))
            .map_err(|source| ConfigError::Fields { source })?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("InfluxHost", &self.influx_host),
            ("InfluxDatabase", &self.influx_database),
            ("InfluxMeasurement", &self.influx_measurement),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    field,
                    reason: "must not be empty".to_string(),
                });
            }
        }

        let url = reqwest::Url::parse(&self.influx_host).map_err(|e| ConfigError::Invalid {
            field: "InfluxHost",
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                field: "InfluxHost",
                reason: format!("unsupported scheme {:?}", url.scheme()),
            });
        }

        Ok(())
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("influx_username", &self.influx_username)
            .field("influx_password", &"<redacted>")
            .field("influx_host", &self.influx_host)
            .field("influx_database", &self.influx_database)
            .field("influx_measurement", &self.influx_measurement)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL_CONFIG: &str = r#"{
        "InfluxUsername": "ingest",
        "InfluxPassword": "s3cret",
        "InfluxHost": "http://localhost:8086",
        "InfluxDatabase": "civic",
        "InfluxMeasurement": "service_requests"
    }"#;

    fn config_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("create temp file");
        file.write_all(content.as_bytes()).expect("write temp file");
        file
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_full_config() {
        let file = config_file(FULL_CONFIG);
        let config = Configuration::load_with_env(file.path(), no_env).expect("load config");

        assert_eq!(config.influx_username, "ingest");
        assert_eq!(config.influx_password, "s3cret");
        assert_eq!(config.influx_host, "http://localhost:8086");
        assert_eq!(config.influx_database, "civic");
        assert_eq!(config.influx_measurement, "service_requests");
    }

    #[test]
    fn test_missing_file() {
        let err = Configuration::load_with_env("/nonexistent/config.json", no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_malformed_file() {
        let file = config_file("{ not json");
        let err = Configuration::load_with_env(file.path(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));

        let file = config_file("[1, 2]");
        let err = Configuration::load_with_env(file.path(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::NotAnObject { .. }));
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let file = config_file(
            r#"{"InfluxUsername": "u", "InfluxPassword": "p", "InfluxHost": "http://localhost:8086"}"#,
        );
        let err = Configuration::load_with_env(file.path(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Fields { .. }));
        assert!(err.to_string().contains("InfluxDatabase"));
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = config_file(FULL_CONFIG);
        let env = HashMap::from([("InfluxDatabase", "civic_test"), ("InfluxPassword", "from-env")]);
        let config = Configuration::load_with_env(file.path(), |key| env.get(key).map(|v| v.to_string()))
            .expect("load config");

        assert_eq!(config.influx_database, "civic_test");
        assert_eq!(config.influx_password, "from-env");
        assert_eq!(config.influx_measurement, "service_requests");
    }

    #[test]
    fn test_environment_supplies_missing_field() {
        let file = config_file(
            r#"{"InfluxUsername": "", "InfluxPassword": "", "InfluxHost": "http://localhost:8086", "InfluxDatabase": "civic"}"#,
        );
        let config = Configuration::load_with_env(file.path(), |key| {
            (key == "InfluxMeasurement").then(|| "requests".to_string())
        })
        .expect("load config");

        assert_eq!(config.influx_measurement, "requests");
        assert_eq!(config.influx_username, "");
    }

    #[test]
    fn test_empty_and_invalid_values() {
        let file = config_file(&FULL_CONFIG.replace("\"civic\"", "\"  \""));
        let err = Configuration::load_with_env(file.path(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "InfluxDatabase", .. }));

        let file = config_file(&FULL_CONFIG.replace("http://localhost:8086", "localhost:8086"));
        let err = Configuration::load_with_env(file.path(), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "InfluxHost", .. }));
    }

    #[test]
    fn test_debug_redacts_password() {
        let file = config_file(FULL_CONFIG);
        let config = Configuration::load_with_env(file.path(), no_env).expect("load config");
        let debug = format!("{:?}", config);

        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));
    }
}
