//! Configuration: optional TOML file, then command-line overrides
//!
//! ```toml
//! [fetch]
//! timeout_ms = 10000
//! priority = "high-accuracy"
//!
//! [permission]
//! mode = "prompt"
//! access = "fine-location"
//!
//! [provider]
//! kind = "simulated"
//! delay_ms = 1500
//! latitude = 37.422
//! longitude = -122.084
//! result = "fix"
//!
//! [ui]
//! tick_ms = 100
//! notice_ms = 2000
//!
//! [log]
//! file = "geofix.log"
//! level = "info"
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::ValueEnum;
use geofix_core::{
    DEFAULT_TIMEOUT, FetchOptions, LocationFix, LocationProvider, Permission, Priority,
    SimulatedProvider, SimulatedResult,
};
use serde::Deserialize;
use thiserror::Error;

use crate::ip_provider::{DEFAULT_URL, IpLocationProvider};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid setting: {0}")]
    Invalid(String),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PermissionMode {
    /// Ask on first use
    #[default]
    Prompt,
    /// Already granted
    Granted,
    /// Always refused
    Denied,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    /// Canned answer after a delay
    #[default]
    Simulated,
    /// Public-IP geolocation over HTTP
    Ip,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum SimulatedOutcome {
    #[default]
    Fix,
    NoFix,
    Error,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub timeout_ms: u64,
    pub priority: Priority,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
            priority: Priority::HighAccuracy,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PermissionConfig {
    pub mode: PermissionMode,
    /// `fine-location` or `coarse-location`
    pub access: Permission,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub delay_ms: u64,
    pub latitude: f64,
    pub longitude: f64,
    pub result: SimulatedOutcome,
    pub url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: ProviderKind::Simulated,
            delay_ms: 1500,
            latitude: 37.422,
            longitude: -122.084,
            result: SimulatedOutcome::Fix,
            url: DEFAULT_URL.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UiConfig {
    pub tick_ms: u64,
    pub notice_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_ms: 100,
            notice_ms: 2000,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub file: PathBuf,
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from("geofix.log"),
            level: "info".to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub fetch: FetchConfig,
    pub permission: PermissionConfig,
    pub provider: ProviderConfig,
    pub ui: UiConfig,
    pub log: LogConfig,
}

/// Command-line values that win over the file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub timeout_ms: Option<u64>,
    pub permission: Option<PermissionMode>,
    pub provider: Option<ProviderKind>,
    pub delay_ms: Option<u64>,
    pub result: Option<SimulatedOutcome>,
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Load `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(timeout_ms) = overrides.timeout_ms {
            self.fetch.timeout_ms = timeout_ms;
        }
        if let Some(mode) = overrides.permission {
            self.permission.mode = mode;
        }
        if let Some(kind) = overrides.provider {
            self.provider.kind = kind;
        }
        if let Some(delay_ms) = overrides.delay_ms {
            self.provider.delay_ms = delay_ms;
        }
        if let Some(result) = overrides.result {
            self.provider.result = result;
        }
        if let Some(file) = overrides.log_file {
            self.log.file = file;
        }
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.timeout_ms == 0 {
            return Err(ConfigError::Invalid("fetch.timeout_ms must be > 0".into()));
        }
        if self.ui.tick_ms == 0 {
            return Err(ConfigError::Invalid("ui.tick_ms must be > 0".into()));
        }
        if !(-90.0..=90.0).contains(&self.provider.latitude) {
            return Err(ConfigError::Invalid(format!(
                "provider.latitude {} is outside -90..=90",
                self.provider.latitude
            )));
        }
        if !(-180.0..=180.0).contains(&self.provider.longitude) {
            return Err(ConfigError::Invalid(format!(
                "provider.longitude {} is outside -180..=180",
                self.provider.longitude
            )));
        }
        Ok(())
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            permission: self.permission.access,
            priority: self.fetch.priority,
            timeout: Duration::from_millis(self.fetch.timeout_ms),
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.ui.tick_ms)
    }

    /// Notice lifetime in ticks, at least one.
    pub fn notice_ticks(&self) -> u32 {
        let ticks = self.ui.notice_ms / self.ui.tick_ms.max(1);
        u32::try_from(ticks).unwrap_or(u32::MAX).max(1)
    }

    pub fn location_provider(&self) -> Arc<dyn LocationProvider> {
        let provider = &self.provider;
        match provider.kind {
            ProviderKind::Ip => Arc::new(IpLocationProvider::new(provider.url.clone())),
            ProviderKind::Simulated => {
                let result = match provider.result {
                    SimulatedOutcome::Fix => SimulatedResult::Fix(LocationFix::new(
                        provider.latitude,
                        provider.longitude,
                    )),
                    SimulatedOutcome::NoFix => SimulatedResult::Nothing,
                    SimulatedOutcome::Error => {
                        SimulatedResult::Fail("simulated location services failure".into())
                    }
                };
                Arc::new(SimulatedProvider::new(
                    Duration::from_millis(provider.delay_ms),
                    result,
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.fetch.timeout_ms, 10_000);
        assert_eq!(config.fetch.priority, Priority::HighAccuracy);
        assert_eq!(config.permission.mode, PermissionMode::Prompt);
        assert_eq!(config.fetch_options().permission, Permission::FineLocation);
        assert_eq!(config.notice_ticks(), 20);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_defaults() {
        assert_eq!(Config::parse("").expect("empty config"), Config::default());
    }

    #[test]
    fn test_parse_sections() {
        let config = Config::parse(
            r#"
            [fetch]
            timeout_ms = 5000
            priority = "balanced-power-accuracy"

            [permission]
            mode = "granted"
            access = "coarse-location"

            [provider]
            kind = "ip"
            url = "https://ipapi.co/json"

            [ui]
            tick_ms = 50
            notice_ms = 1000
            "#,
        )
        .expect("valid config");

        assert_eq!(config.fetch.timeout_ms, 5000);
        assert_eq!(config.fetch.priority, Priority::BalancedPowerAccuracy);
        assert_eq!(config.permission.mode, PermissionMode::Granted);
        assert_eq!(config.fetch_options().permission, Permission::CoarseLocation);
        assert_eq!(config.provider.kind, ProviderKind::Ip);
        assert_eq!(config.provider.url, "https://ipapi.co/json");
        assert_eq!(config.provider.delay_ms, 1500);
        assert_eq!(config.notice_ticks(), 20);
        assert_eq!(
            config.fetch_options().timeout,
            Duration::from_millis(5000)
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("[fetch]\nretries = 3\n").is_err());
    }

    #[test]
    fn test_overrides_win() {
        let config = Config::default().with_overrides(Overrides {
            timeout_ms: Some(2000),
            permission: Some(PermissionMode::Denied),
            delay_ms: Some(11_000),
            result: Some(SimulatedOutcome::NoFix),
            ..Default::default()
        });

        assert_eq!(config.fetch.timeout_ms, 2000);
        assert_eq!(config.permission.mode, PermissionMode::Denied);
        assert_eq!(config.provider.delay_ms, 11_000);
        assert_eq!(config.provider.result, SimulatedOutcome::NoFix);
        assert_eq!(config.provider.kind, ProviderKind::Simulated);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.fetch.timeout_ms = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.provider.latitude = 91.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/geofix.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
