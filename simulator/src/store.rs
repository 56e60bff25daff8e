//! Settings persistence.
//!
//! The file holds a postcard-encoded `(version, settings)` pair. A file
//! written by a different layout version is rejected rather than decoded.

use std::fs;
use std::io;
use std::path::PathBuf;

use crate::settings::Settings;

/// Bumped whenever [`Settings`] changes shape.
pub const SETTINGS_VERSION: u16 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("settings file: {0}")]
    Io(#[from] io::Error),

    #[error("settings encoding: {0}")]
    Codec(#[from] postcard::Error),

    #[error("settings version {found}, expected {SETTINGS_VERSION}")]
    Version { found: u16 },
}

pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn load(&self) -> Result<Settings, StoreError> {
        let bytes = fs::read(&self.path)?;
        let (found, rest): (u16, &[u8]) = postcard::take_from_bytes(&bytes)?;
        if found != SETTINGS_VERSION {
            return Err(StoreError::Version { found });
        }
        Ok(postcard::from_bytes(rest)?)
    }

    pub fn save(
        &self,
        settings: &Settings,
    ) -> Result<(), StoreError> {
        let bytes = postcard::to_stdvec(&(SETTINGS_VERSION, settings))?;
        fs::write(&self.path, bytes)?;
        log::info!("settings saved to {}", self.path.display());
        Ok(())
    }

    /// Load the stored settings, falling back to defaults on any failure.
    /// The second value is a one-line status for the boot screen.
    pub fn load_or_default(&self) -> (Settings, &'static str) {
        match self.load() {
            Ok(settings) => {
                log::info!("settings loaded from {}", self.path.display());
                (settings, "Settings loaded")
            }
            Err(StoreError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                log::info!("no settings at {}, using defaults", self.path.display());
                (Settings::default(), "Default settings")
            }
            Err(e) => {
                log::warn!("{e}; using defaults");
                (Settings::default(), "Settings reset")
            }
        }
    }
}
