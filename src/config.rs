//! Application settings
//!
//! Layered: built-in defaults, then an optional TOML file, then environment
//! variables such as `COVID_STATUS__FEEDS__TIMEOUT_SECS=10`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::case_data::adapters::FeedSource;
use crate::case_data::transport::{FeedEndpoints, BING_URL, DEFAULT_USER_AGENT, SCMP_URL};
use crate::engine::types::SortKey;

const DEFAULT_CONFIG_NAME: &str = "covid-status";
const ENV_PREFIX: &str = "COVID_STATUS";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feeds: FeedSettings,
    pub session: SessionSettings,
    pub display: DisplaySettings,
    pub telemetry: TelemetrySettings,
}

/// Upstream endpoints and HTTP client options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    pub scmp_url: String,
    pub bing_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            scmp_url: SCMP_URL.to_string(),
            bing_url: BING_URL.to_string(),
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Initial source and ordering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    pub source: FeedSource,
    pub sort: SortKey,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Directory of flag images named by normalised country key
    pub flag_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    pub log_filter: String,
    pub metrics_port: u16,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self { log_filter: "info".to_string(), metrics_port: 9000 }
    }
}

impl Settings {
    /// Load settings; `path` must exist when given, otherwise
    /// `covid-status.toml` in the working directory is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };
        Self::from_builder(Config::builder().add_source(file))
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__").try_parsing(true))
            .build()?
            .try_deserialize()
    }

    pub fn endpoints(&self) -> FeedEndpoints {
        FeedEndpoints { scmp_url: self.feeds.scmp_url.clone(), bing_url: self.feeds.bing_url.clone() }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.feeds.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::FileFormat;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.endpoints(), FeedEndpoints::default());
        assert_eq!(settings.session.source, FeedSource::Bing);
        assert_eq!(settings.session.sort, SortKey::Country);
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.display.flag_dir, None);
        assert!(settings.feeds.user_agent.starts_with("covid-status-rs/"));
    }

    #[test]
    fn test_toml_overrides() {
        let toml = r#"
            [feeds]
            bing_url = "http://localhost:8080/covid"
            timeout_secs = 5

            [session]
            source = "scmp"
            sort = "deaths"
        "#;
        let settings =
            Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml))).unwrap();
        assert_eq!(settings.feeds.bing_url, "http://localhost:8080/covid");
        assert_eq!(settings.feeds.scmp_url, SCMP_URL);
        assert_eq!(settings.timeout(), Duration::from_secs(5));
        assert_eq!(settings.session.source, FeedSource::Scmp);
        assert_eq!(settings.session.sort, SortKey::Deaths);
        assert_eq!(settings.telemetry.log_filter, "info");
    }

    #[test]
    fn test_bad_enum_is_rejected() {
        let toml = "[session]\nsort = \"population\"\n";
        assert!(Settings::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml))).is_err());
    }
}
