//! Application settings.
//!
//! Settings come from a YAML file (`CHATBOX_NOWPLAYING_CONFIG`, or
//! `config.yaml` in the working directory when it exists) and can be
//! overridden per key with `CHATBOX_NOWPLAYING__<KEY>` environment variables.
//! Without either, the defaults target a chatbox listening on
//! `127.0.0.1:9000` and read `templates.yaml`.

use std::{
    env, fs,
    net::{SocketAddr, ToSocketAddrs},
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::info;

use crate::error::ConfigError;

const ENV_CONFIG_FILE: &str = "CHATBOX_NOWPLAYING_CONFIG";
const ENV_PREFIX: &str = "CHATBOX_NOWPLAYING__";
const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub osc_host: String,
    pub osc_port: u16,
    pub templates_path: PathBuf,
    /// Substring matched against MPRIS bus names and identities.
    pub preferred_player: Option<String>,
    /// Re-read the template file on every poll.
    pub reload_templates: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            osc_host: "127.0.0.1".to_string(),
            osc_port: 9000,
            templates_path: PathBuf::from("templates.yaml"),
            preferred_player: None,
            reload_templates: false,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        let path = match env::var(ENV_CONFIG_FILE) {
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => Some(PathBuf::from(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let config = match path {
            Some(path) => {
                info!("Loading settings from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.with_overrides(|key| env::var(format!("{ENV_PREFIX}{key}")).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies overrides looked up by upper-case key name.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = lookup("OSC_HOST") {
            self.osc_host = host;
        }
        if let Some(port) = lookup("OSC_PORT") {
            self.osc_port = parse_value("OSC_PORT", &port)?;
        }
        if let Some(path) = lookup("TEMPLATES_PATH") {
            self.templates_path = PathBuf::from(path);
        }
        if let Some(player) = lookup("PREFERRED_PLAYER") {
            self.preferred_player = Some(player).filter(|p| !p.is_empty());
        }
        if let Some(reload) = lookup("RELOAD_TEMPLATES") {
            self.reload_templates = parse_value("RELOAD_TEMPLATES", &reload)?;
        }

        Ok(self)
    }

    /// Resolves the chatbox endpoint. Host names are looked up once.
    pub fn osc_addr(&self) -> Result<SocketAddr, ConfigError> {
        (self.osc_host.as_str(), self.osc_port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "osc_host".to_string(),
                value: self.osc_host.clone(),
            })
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: format!("{ENV_PREFIX}{key}"),
        value: value.to_string(),
    })
}
