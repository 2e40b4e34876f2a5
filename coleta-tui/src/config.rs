//! `coleta.toml` loading.

use std::{env, fs, io};
use std::path::{Path, PathBuf};

use coleta_core::{Coordinate, DEFAULT_EMAIL_SUBJECT, DEFAULT_MESSAGE_TEXT};
use coleta_provider_http::DEFAULT_BASE_URL;
use serde::Deserialize;

/// Environment variable overriding the config file location.
pub(crate) const CONFIG_ENV: &str = "COLETA_CONFIG";
const DEFAULT_CONFIG_FILE: &str = "coleta.toml";

#[derive(thiserror::Error, Debug)]
pub(crate) enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Config {
    pub api: ApiConfig,
    pub region: RegionConfig,
    pub location: LocationConfig,
    pub contact: ContactConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ApiConfig {
    pub base_url: String,
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: "coleta/0.1".to_owned(),
        }
    }
}

/// Route parameters the discovery screen is opened with.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RegionConfig {
    pub city: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum PermissionSetting {
    #[default]
    Grant,
    Deny,
}

/// Answers the terminal gives in place of a device permission dialog and GPS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(crate) struct LocationConfig {
    pub permission: PermissionSetting,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl LocationConfig {
    /// Configured fix; both coordinates are needed.
    pub(crate) fn fix(&self) -> Option<Coordinate> {
        Some(Coordinate::new(self.latitude?, self.longitude?))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct ContactConfig {
    pub email_subject: String,
    pub message_text: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            email_subject: DEFAULT_EMAIL_SUBJECT.to_owned(),
            message_text: DEFAULT_MESSAGE_TEXT.to_owned(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub(crate) struct LogConfig {
    pub level: String,
    pub file: PathBuf,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            file: PathBuf::from("coleta.log"),
        }
    }
}

/// Load the config from `$COLETA_CONFIG`, or `./coleta.toml` when present.
///
/// A missing default file yields the defaults; a missing explicit file is an error.
pub(crate) fn load() -> Result<Config, ConfigError> {
    match env::var_os(CONFIG_ENV) {
        Some(path) => read(Path::new(&path)),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => read(Path::new(DEFAULT_CONFIG_FILE)),
        None => Ok(Config::default()),
    }
}

fn read(path: &Path) -> Result<Config, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&text)
}

pub(crate) fn parse(text: &str) -> Result<Config, ConfigError> {
    Ok(toml::from_str(text)?)
}
