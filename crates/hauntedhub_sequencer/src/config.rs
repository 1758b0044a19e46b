// SPDX-License-Identifier: MIT OR Apache-2.0
//! Transition durations and motion presets.

use crate::error::{Result, SequencerError};
use serde::{Deserialize, Serialize};

/// Accessibility preference selecting a duration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionPreference {
    /// Full-length cinematic
    #[default]
    Full,
    /// Shortened cinematic for users who prefer reduced motion
    Reduced,
}

/// Durations (seconds) of the five timed phases of the door cinematic
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionConfig {
    /// Door rotation
    pub door_duration: f32,
    /// Hand reaching out of the doorway
    pub hand_duration: f32,
    /// Hold before the drag
    pub pause_duration: f32,
    /// Camera dragged towards the door
    pub drag_duration: f32,
    /// Fade to black
    pub fade_duration: f32,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            door_duration: 1.2,
            hand_duration: 0.8,
            pause_duration: 0.3,
            drag_duration: 1.0,
            fade_duration: 0.5,
        }
    }
}

impl TransitionConfig {
    /// Preset used when reduced motion is requested
    pub fn reduced_motion() -> Self {
        Self {
            door_duration: 0.3,
            hand_duration: 0.2,
            pause_duration: 0.1,
            drag_duration: 0.3,
            fade_duration: 0.3,
        }
    }

    /// Pick the preset matching a motion preference
    pub fn for_motion_preference(preference: MotionPreference) -> Self {
        match preference {
            MotionPreference::Full => Self::default(),
            MotionPreference::Reduced => Self::reduced_motion(),
        }
    }

    /// Check that every duration is positive and finite
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("door", self.door_duration),
            ("hand", self.hand_duration),
            ("pause", self.pause_duration),
            ("drag", self.drag_duration),
            ("fade", self.fade_duration),
        ];

        for (phase, value) in durations {
            if !value.is_finite() || value <= 0.0 {
                return Err(SequencerError::InvalidDuration { phase, value });
            }
        }

        Ok(())
    }

    /// Parse and validate a config from RON
    pub fn from_ron(source: &str) -> Result<Self> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }
}
