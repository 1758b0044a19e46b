// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hub settings.
//!
//! Settings are stored as RON and cover:
//! - Motion preference (full or reduced cinematic)
//! - An optional custom transition config
//! - The knock gesture window
//! - Sound and model asset paths

use crate::audio::{DOOR_CREAK, DRAG_WHOOSH, HAND_EMERGE};
use crate::error::{HubError, Result};
use hauntedhub_sequencer::{MotionPreference, TransitionConfig};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default knock window in milliseconds
pub const DEFAULT_KNOCK_WINDOW_MS: u64 = 2000;

/// Settings file name looked up next to the binary when no path is given
pub const SETTINGS_FILE_NAME: &str = "hauntedhub.ron";

/// Hub configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    /// Accessibility motion preference
    pub motion: MotionPreference,
    /// Custom durations, overriding the motion preset
    pub transition: Option<TransitionConfig>,
    /// Window in which consecutive knocks count
    pub knock_window_ms: u64,
    /// Root directory for relative asset paths
    pub assets_root: PathBuf,
    /// Sound name -> asset path, in load order
    pub sounds: IndexMap<String, PathBuf>,
    /// Hand model (glTF binary)
    pub hand_model: Option<PathBuf>,
}

impl Default for HubSettings {
    fn default() -> Self {
        let mut sounds = IndexMap::new();
        sounds.insert(DOOR_CREAK.to_string(), PathBuf::from("sounds/door_creak.ogg"));
        sounds.insert(HAND_EMERGE.to_string(), PathBuf::from("sounds/hand_emerge.ogg"));
        sounds.insert(DRAG_WHOOSH.to_string(), PathBuf::from("sounds/drag_whoosh.ogg"));

        Self {
            motion: MotionPreference::Full,
            transition: None,
            knock_window_ms: DEFAULT_KNOCK_WINDOW_MS,
            assets_root: PathBuf::from("assets"),
            sounds,
            hand_model: Some(PathBuf::from("models/hand.glb")),
        }
    }
}

impl HubSettings {
    /// Parse settings from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }

    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| HubError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&content)
    }

    /// Load settings, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No settings at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> std::result::Result<String, ron::Error> {
        let config = ron::ser::PrettyConfig::default().struct_names(true);
        ron::ser::to_string_pretty(self, config)
    }

    /// Durations for the next run: the custom config if set, else the preset
    pub fn transition_config(&self) -> Result<TransitionConfig> {
        let config = self
            .transition
            .unwrap_or_else(|| TransitionConfig::for_motion_preference(self.motion));
        config.validate()?;
        Ok(config)
    }

    /// Knock window as a duration
    pub fn knock_window(&self) -> Duration {
        Duration::from_millis(self.knock_window_ms)
    }

    /// Resolve an asset path against `assets_root`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.assets_root.join(path)
        }
    }
}
