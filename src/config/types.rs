//! Core configuration types.

use super::limits::{LimitsConfig, OutputConfig};
use super::oper::{CaptchaConfig, OperBlock, ServicesBlock};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Replica configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server identity.
    pub server: ServerConfig,
    /// Operator blocks.
    #[serde(default)]
    pub oper: Vec<OperBlock>,
    /// Accepted services-link passwords.
    #[serde(default)]
    pub services: Vec<ServicesBlock>,
    #[serde(default)]
    pub limits: LimitsConfig,
    /// Challenge verification; absent means `+x` cannot be set.
    pub captcha: Option<CaptchaConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find an operator block by name and check its password.
    pub fn find_oper(&self, name: &str, password: &str) -> Option<&OperBlock> {
        self.oper
            .iter()
            .find(|o| o.name == name && o.verify_password(password))
    }

    /// Whether `password` authenticates a services link.
    pub fn services_password_ok(&self, password: &str) -> bool {
        self.services.iter().any(|s| s.verify_password(password))
    }
}

/// Server identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Server name, used as the prefix of server-originated messages.
    pub name: String,
    /// Network name (e.g., "RobustIRC").
    pub network: String,
    /// Shown in RPL_CREATED. Configured rather than computed so all
    /// replicas agree.
    #[serde(default = "default_created")]
    pub created: String,
    /// Visible hosts are `<host_prefix>/0x<connection id in hex>`.
    #[serde(default = "default_host_prefix")]
    pub host_prefix: String,
    /// Message of the day.
    #[serde(default = "default_motd")]
    pub motd: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "robustirc.net".to_string(),
            network: "RobustIRC".to_string(),
            created: default_created(),
            host_prefix: default_host_prefix(),
            motd: default_motd(),
        }
    }
}

fn default_created() -> String {
    "at boot".to_string()
}

fn default_host_prefix() -> String {
    "robust".to_string()
}

fn default_motd() -> Vec<String> {
    vec!["No MOTD configured yet.".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config = Config::from_toml(
            r#"
            [server]
            name = "irc.example.net"
            network = "Example"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.host_prefix, "robust");
        assert_eq!(config.server.motd, vec!["No MOTD configured yet."]);
        assert!(config.captcha.is_none());
        assert_eq!(config.limits.max_channels, 0);
        assert!(config.output.retained_batches > 0);
    }

    #[test]
    fn missing_server_section_fails() {
        assert!(matches!(
            Config::from_toml("[limits]\nmax_channels = 3\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn oper_and_services_lookup() {
        let config = Config::from_toml(
            r#"
            [server]
            name = "irc.example.net"
            network = "Example"

            [[oper]]
            name = "root"
            password = "hunter2"

            [[services]]
            password = "s3cret"
            "#,
        )
        .unwrap();
        assert!(config.find_oper("root", "hunter2").is_some());
        assert!(config.find_oper("root", "wrong").is_none());
        assert!(config.find_oper("admin", "hunter2").is_none());
        assert!(config.services_password_ok("s3cret"));
        assert!(!config.services_password_ok("s3cre"));
    }
}
