use std::{io, path::PathBuf};

use thiserror::Error;

/// Problems with the settings file or the template file. Always fatal.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("template list '{0}' is empty")]
    EmptyTemplates(&'static str),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// The error type of the platform's media API.
#[cfg(target_os = "linux")]
pub type BackendError = zbus::Error;
#[cfg(target_os = "windows")]
pub type BackendError = windows::core::Error;
#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub type BackendError = io::Error;

/// Failures while querying the OS for the current media session.
#[derive(Error, Debug)]
pub enum MediaError {
    #[error("media session query failed: {0}")]
    Backend(#[from] BackendError),

    #[error("platform {0} is not supported")]
    UnsupportedPlatform(String),
}

/// Contract violations of the renderer. These point at a logic or
/// configuration defect and stop the process.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RenderError {
    #[error("no track data for a playing template")]
    MissingTrack,

    #[error("rendered status is {len} characters, the chatbox accepts at most {limit}")]
    TooLong { len: usize, limit: usize },
}

#[derive(Error, Debug)]
pub enum OscError {
    #[error("OSC socket error: {0}")]
    Io(#[from] io::Error),

    #[error("OSC encoding error: {0:?}")]
    Encode(rosc::OscError),
}

impl From<rosc::OscError> for OscError {
    fn from(e: rosc::OscError) -> Self {
        OscError::Encode(e)
    }
}
