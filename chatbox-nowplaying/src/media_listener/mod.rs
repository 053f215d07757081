use async_trait::async_trait;

use crate::{config::Config, error::MediaError, media_events::MediaQuery};

#[cfg(target_os = "linux")]
mod linux_mpris;

#[cfg(target_os = "windows")]
mod windows_smtc;

#[cfg(target_os = "linux")]
pub use linux_mpris::MprisSource;

#[cfg(target_os = "windows")]
pub use windows_smtc::SmtcSource;

/// A backend that can be asked what is playing right now.
///
/// `Ok(None)` means there is no media session at all.
#[async_trait(?Send)]
pub trait MediaSource {
    async fn fetch(&mut self) -> Result<Option<MediaQuery>, MediaError>;
}

/// Opens the backend for the OS this binary was built for.
#[cfg(target_os = "linux")]
pub async fn platform_source(config: &Config) -> Result<Box<dyn MediaSource>, MediaError> {
    Ok(Box::new(
        MprisSource::connect(config.preferred_player.clone()).await?,
    ))
}

#[cfg(target_os = "windows")]
pub async fn platform_source(_config: &Config) -> Result<Box<dyn MediaSource>, MediaError> {
    Ok(Box::new(SmtcSource::new()?))
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
pub async fn platform_source(_config: &Config) -> Result<Box<dyn MediaSource>, MediaError> {
    Err(MediaError::UnsupportedPlatform(std::env::consts::OS.to_string()))
}
