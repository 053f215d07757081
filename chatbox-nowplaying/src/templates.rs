use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::warn;

use crate::error::ConfigError;

/// Number of polls each template stays on screen.
pub const ROTATE_EVERY_TICKS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Playing,
    NotPlaying,
}

/// The two ordered template lists. Both are guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawTemplateSet")]
pub struct TemplateSet {
    playing: Vec<String>,
    not_playing: Vec<String>,
}

/// The file layout, before the non-empty check.
#[derive(Deserialize)]
struct RawTemplateSet {
    playing: Vec<String>,
    #[serde(rename = "notPlaying")]
    not_playing: Vec<String>,
}

impl TryFrom<RawTemplateSet> for TemplateSet {
    type Error = ConfigError;

    fn try_from(raw: RawTemplateSet) -> Result<Self, Self::Error> {
        Self::new(raw.playing, raw.not_playing)
    }
}

impl TemplateSet {
    pub fn new(playing: Vec<String>, not_playing: Vec<String>) -> Result<Self, ConfigError> {
        Self {
            playing,
            not_playing,
        }
        .validated()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&contents, path)
    }

    fn parse(contents: &str, path: &Path) -> Result<Self, ConfigError> {
        serde_yaml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn validated(self) -> Result<Self, ConfigError> {
        if self.playing.is_empty() {
            return Err(ConfigError::EmptyTemplates("playing"));
        }
        if self.not_playing.is_empty() {
            return Err(ConfigError::EmptyTemplates("notPlaying"));
        }
        Ok(self)
    }

    pub fn list(&self, mode: Mode) -> &[String] {
        match mode {
            Mode::Playing => &self.playing,
            Mode::NotPlaying => &self.not_playing,
        }
    }

    /// The template shown for `mode` at `tick`.
    pub fn template(&self, mode: Mode, tick: u64) -> &str {
        let list = self.list(mode);
        &list[select(tick, list.len())]
    }
}

/// Owns the active [`TemplateSet`] and, when asked to, re-reads the file on
/// every poll. A failed re-read keeps the previous set.
#[derive(Debug)]
pub struct TemplateStore {
    path: PathBuf,
    reload: bool,
    current: TemplateSet,
}

impl TemplateStore {
    /// Loads the initial set; failure here is fatal.
    pub fn open(path: &Path, reload: bool) -> Result<Self, ConfigError> {
        let current = TemplateSet::load(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            reload,
            current,
        })
    }

    pub fn current(&mut self) -> &TemplateSet {
        if self.reload {
            match TemplateSet::load(&self.path) {
                Ok(set) => self.current = set,
                Err(e) => warn!("Keeping previous templates: {e}"),
            }
        }
        &self.current
    }
}

#[cfg(test)]
impl From<TemplateSet> for TemplateStore {
    fn from(current: TemplateSet) -> Self {
        Self {
            path: PathBuf::new(),
            reload: false,
            current,
        }
    }
}

/// `floor(tick / 5) mod len`. `len` must be non-zero.
pub fn select(tick: u64, len: usize) -> usize {
    ((tick / ROTATE_EVERY_TICKS) % len as u64) as usize
}
