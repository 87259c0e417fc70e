use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::MOVIE_CHANNEL;
use crate::state::{Size, DEFAULT_MOVIE_SIZE};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("movie channel name must not be empty")]
    EmptyChannel,
    #[error("default movie size {0} has no area")]
    EmptyDefaultSize(Size),
}

/// Host-tunable knobs for movie playback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovieSettings {
    /// Audio channel reserved for movies.
    pub channel: String,
    /// Initial fallback size for displayables without an explicit size.
    pub default_size: Size,
    /// Reduced-update mode; movie start requests are ignored while set.
    pub less_updates: bool,
    /// Frames to wait before redrawing a displayable after a media refresh.
    pub refresh_redraw_delay: u32,
}

impl Default for MovieSettings {
    fn default() -> Self {
        Self {
            channel: MOVIE_CHANNEL.to_string(),
            default_size: DEFAULT_MOVIE_SIZE,
            less_updates: false,
            refresh_redraw_delay: 0,
        }
    }
}

impl MovieSettings {
    /// Loads settings from a JSON file, falling back to defaults when no path
    /// is given. Missing keys take their default values.
    pub fn from_json_file(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read movie settings: {}", path.display()))?;
        let settings: MovieSettings = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse movie settings json: {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("invalid movie settings in {}", path.display()))?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.channel.trim().is_empty() {
            return Err(SettingsError::EmptyChannel);
        }
        if self.default_size.is_empty() {
            return Err(SettingsError::EmptyDefaultSize(self.default_size));
        }
        Ok(())
    }
}
