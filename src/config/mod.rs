//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use clap::{Args, Parser, builder::BoolishValueParser};
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::filter::Directive;

use crate::application::serializer::ApiVersion;

const LOCAL_CONFIG_BASENAME: &str = "folio";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

/// Command-line arguments for the Folio binary.
#[derive(Debug, Parser)]
#[command(name = "folio", version, about = "Folio library-catalog API server")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "FOLIO_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ServeOverrides,
}

#[derive(Debug, Args, Default, Clone)]
pub struct ServeOverrides {
    /// Override the listener host.
    #[arg(long = "server-host", value_name = "HOST")]
    pub server_host: Option<String>,

    /// Override the listener port.
    #[arg(long = "server-port", value_name = "PORT")]
    pub server_port: Option<u16>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub log_json: Option<bool>,

    /// Toggle the list response cache.
    #[arg(
        long = "cache-enabled",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub cache_enabled: Option<bool>,

    /// Override the cached list TTL in seconds (0 disables expiry).
    #[arg(long = "cache-list-ttl-seconds", value_name = "SECONDS")]
    pub cache_list_ttl_secs: Option<u64>,

    /// Toggle demo fixture seeding at startup.
    #[arg(
        long = "seed-fixtures",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new()
    )]
    pub seed_fixtures: Option<bool>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid bind address `{value}`: {message}")]
    InvalidBindAddress { value: String, message: String },
    #[error("invalid log level `{0}`")]
    InvalidLogLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl From<LogLevel> for Directive {
    fn from(level: LogLevel) -> Self {
        LevelFilter::from(level).into()
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Listener host; must be an IP address.
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let value = format!("{}:{}", self.host, self.port);
        value
            .parse()
            .map_err(|err: std::net::AddrParseError| ConfigError::InvalidBindAddress {
                value,
                message: err.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: LogLevel,
    pub format: LogFormat,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            format: LogFormat::Compact,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ApiSettings {
    /// Serialization version used when the client does not negotiate one.
    pub default_version: ApiVersion,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            default_version: ApiVersion::V1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub enabled: bool,
    pub list_ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            list_ttl_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
    /// Seed the demo catalog when the server starts with an empty store.
    pub seed_on_startup: bool,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            seed_on_startup: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub api: ApiSettings,
    pub cache: CacheSettings,
    pub fixtures: FixtureSettings,
}

impl Settings {
    fn apply_overrides(&mut self, overrides: &ServeOverrides) -> Result<(), ConfigError> {
        if let Some(host) = &overrides.server_host {
            self.server.host = host.clone();
        }
        if let Some(port) = overrides.server_port {
            self.server.port = port;
        }
        if let Some(level) = &overrides.log_level {
            self.logging.level = level
                .parse()
                .map_err(ConfigError::InvalidLogLevel)?;
        }
        if let Some(json) = overrides.log_json {
            self.logging.format = if json {
                LogFormat::Json
            } else {
                LogFormat::Compact
            };
        }
        if let Some(enabled) = overrides.cache_enabled {
            self.cache.enabled = enabled;
        }
        if let Some(ttl) = overrides.cache_list_ttl_secs {
            self.cache.list_ttl_secs = ttl;
        }
        if let Some(seed) = overrides.seed_fixtures {
            self.fixtures.seed_on_startup = seed;
        }
        Ok(())
    }
}

/// Parse CLI arguments and load settings with file → env → CLI precedence.
pub fn load_with_cli() -> Result<(CliArgs, Settings), ConfigError> {
    let cli = CliArgs::parse();
    let settings = load_settings(&cli)?;
    Ok((cli, settings))
}

fn load_settings(cli: &CliArgs) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    match &cli.config_file {
        Some(path) => builder = builder.add_source(File::from(path.clone())),
        None => {
            builder = builder.add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));
        }
    }
    builder = builder.add_source(Environment::with_prefix("FOLIO").separator("__"));

    let mut settings: Settings = builder.build()?.try_deserialize()?;
    settings.apply_overrides(&cli.overrides)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    #[test]
    fn default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.port, 3000);
        assert_eq!(settings.logging.level, LogLevel::Info);
        assert_eq!(settings.logging.format, LogFormat::Compact);
        assert_eq!(settings.api.default_version, ApiVersion::V1);
        assert!(settings.cache.enabled);
        assert_eq!(settings.cache.list_ttl_secs, 60);
        assert!(settings.fixtures.seed_on_startup);
    }

    #[test]
    fn settings_parse_from_toml() {
        let toml = r#"
            [server]
            port = 8080

            [logging]
            level = "debug"
            format = "json"

            [api]
            default_version = "2.0"

            [cache]
            enabled = false
            list_ttl_secs = 120
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .expect("config built")
            .try_deserialize()
            .expect("settings deserialized");

        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert_eq!(settings.api.default_version, ApiVersion::V2);
        assert!(!settings.cache.enabled);
        assert_eq!(settings.cache.list_ttl_secs, 120);
    }

    #[test]
    fn overrides_take_precedence() {
        let mut settings = Settings::default();
        let overrides = ServeOverrides {
            server_port: Some(4000),
            log_level: Some("warn".to_string()),
            log_json: Some(true),
            cache_enabled: Some(false),
            ..Default::default()
        };

        settings.apply_overrides(&overrides).expect("applied");

        assert_eq!(settings.server.port, 4000);
        assert_eq!(settings.logging.level, LogLevel::Warn);
        assert_eq!(settings.logging.format, LogFormat::Json);
        assert!(!settings.cache.enabled);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut settings = Settings::default();
        let overrides = ServeOverrides {
            log_level: Some("verbose".to_string()),
            ..Default::default()
        };

        let err = settings.apply_overrides(&overrides).expect_err("rejected");
        assert!(matches!(err, ConfigError::InvalidLogLevel(level) if level == "verbose"));
    }

    #[test]
    fn hostname_bind_addresses_are_rejected() {
        let settings = ServerSettings {
            host: "localhost".to_string(),
            port: 3000,
        };
        assert!(settings.bind_addr().is_err());
    }

    #[test]
    fn bind_addr_parses_ip_hosts() {
        let settings = ServerSettings::default();
        let addr = settings.bind_addr().expect("bind address");
        assert_eq!(addr.port(), 3000);
    }
}
