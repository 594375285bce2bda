//! Layered application configuration.
//!
//! Precedence, lowest first: built-in defaults, YAML file, `TYPE_EXPLORER__*`
//! environment variables, command-line flags.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use type_explorer::TypeExplorerConfig;

/// Prefix of environment overrides; nested keys are separated by `__`,
/// e.g. `TYPE_EXPLORER__CLIENT__BASE_URL`.
pub const ENV_PREFIX: &str = "TYPE_EXPLORER__";

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("config file does not exist: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
    #[error("failed to render configuration: {0}")]
    Render(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Server whose types are loaded when `--server` is not given.
    pub server_name: Option<String>,
    /// Platform hosting that server when `--platform` is not given.
    pub platform_name: Option<String>,
    pub logging: LoggingConfig,
    pub client: TypeExplorerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `type_explorer=debug`.
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Values taken from command-line flags; `None` leaves the layered value alone.
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub server_name: Option<String>,
    pub platform_name: Option<String>,
    pub base_url: Option<String>,
    pub enterprise_option: Option<bool>,
    pub allow_insecure_http: Option<bool>,
}

impl AppConfig {
    /// Loads defaults, then `path` if given, then the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `path` is not a file and
    /// [`ConfigError::Invalid`] if the merged layers do not form a valid config.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            figment = figment.merge(Yaml::file(path));
        }

        figment
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .map_err(|e| ConfigError::Invalid(Box::new(e)))
    }

    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(server_name) = overrides.server_name {
            self.server_name = Some(server_name);
        }
        if let Some(platform_name) = overrides.platform_name {
            self.platform_name = Some(platform_name);
        }
        if let Some(base_url) = overrides.base_url {
            self.client.base_url = base_url;
        }
        if let Some(enterprise_option) = overrides.enterprise_option {
            self.client.enterprise_option = enterprise_option;
        }
        if let Some(allow_insecure_http) = overrides.allow_insecure_http {
            self.client.allow_insecure_http = allow_insecure_http;
        }
    }

    /// Effective configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_saphyr::to_string(self).map_err(|e| ConfigError::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;

    fn write_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config.server_name, None);
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(config.client.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_load_yaml_file() {
        let file = write_yaml(
            r#"
server_name: cocoMDS1
platform_name: Core Platform
logging:
  level: debug
  format: json
client:
  base_url: "https://egeria.local:9443"
  request_timeout: "10s"
  enterprise_option: true
"#,
        );

        let config = AppConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.server_name.as_deref(), Some("cocoMDS1"));
        assert_eq!(config.platform_name.as_deref(), Some("Core Platform"));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.client.base_url, "https://egeria.local:9443");
        assert_eq!(config.client.request_timeout, Duration::from_secs(10));
        assert!(config.client.enterprise_option);
        // untouched keys keep their defaults
        assert!(!config.client.allow_insecure_http);
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let file = write_yaml("client:\n  retries: 3\n");
        let result = AppConfig::load(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let result = AppConfig::load(Some(Path::new("/definitely/not/here.yaml")));
        assert!(matches!(result, Err(ConfigError::MissingFile(_))));
    }

    #[test]
    fn test_cli_overrides_win() {
        let file = write_yaml("server_name: fromFile\nclient:\n  base_url: \"https://a.local\"\n");
        let mut config = AppConfig::load(Some(file.path())).unwrap();

        config.apply_cli_overrides(CliOverrides {
            server_name: Some("fromCli".to_owned()),
            base_url: Some("http://localhost:9443".to_owned()),
            allow_insecure_http: Some(true),
            ..CliOverrides::default()
        });

        assert_eq!(config.server_name.as_deref(), Some("fromCli"));
        assert_eq!(config.platform_name, None);
        assert_eq!(config.client.base_url, "http://localhost:9443");
        assert!(config.client.allow_insecure_http);
        assert!(!config.client.enterprise_option);
    }

    #[test]
    fn test_to_yaml_round_trips() {
        let mut config = AppConfig::default();
        config.server_name = Some("cocoMDS1".to_owned());

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("cocoMDS1"));

        let parsed: AppConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
