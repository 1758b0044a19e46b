// SPDX-License-Identifier: MIT OR Apache-2.0
//! Phases of the door cinematic and the transitions allowed between them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Phase of the door cinematic, declared in playback order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum AnimationState {
    /// Nothing playing
    #[default]
    Idle,
    /// Door swinging open
    DoorOpening,
    /// Hand reaching out of the doorway
    HandEmerging,
    /// Hand holding still
    HandPaused,
    /// Camera dragged into the doorway
    Dragging,
    /// Screen fading out
    Fading,
    /// Handing off to the selected mini-game
    Navigating,
    /// Tearing down the current run
    Resetting,
}

impl AnimationState {
    /// All states, in declaration order
    pub const ALL: [AnimationState; 8] = [
        AnimationState::Idle,
        AnimationState::DoorOpening,
        AnimationState::HandEmerging,
        AnimationState::HandPaused,
        AnimationState::Dragging,
        AnimationState::Fading,
        AnimationState::Navigating,
        AnimationState::Resetting,
    ];

    /// Timed phases driven by the frame tick, in playback order
    pub const TIMED: [AnimationState; 6] = [
        AnimationState::DoorOpening,
        AnimationState::HandEmerging,
        AnimationState::HandPaused,
        AnimationState::Dragging,
        AnimationState::Fading,
        AnimationState::Navigating,
    ];

    /// Position in [`AnimationState::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Whether a run is in progress (any state but `Idle`)
    pub fn is_active(self) -> bool {
        self != Self::Idle
    }

    /// The forward successor in playback order (`Resetting` leads to `Idle`)
    pub fn next(self) -> Option<AnimationState> {
        match self {
            Self::Idle => Some(Self::DoorOpening),
            Self::DoorOpening => Some(Self::HandEmerging),
            Self::HandEmerging => Some(Self::HandPaused),
            Self::HandPaused => Some(Self::Dragging),
            Self::Dragging => Some(Self::Fading),
            Self::Fading => Some(Self::Navigating),
            Self::Navigating => None,
            Self::Resetting => Some(Self::Idle),
        }
    }

    /// Get the display name
    pub fn name(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::DoorOpening => "DOOR_OPENING",
            Self::HandEmerging => "HAND_EMERGING",
            Self::HandPaused => "HAND_PAUSED",
            Self::Dragging => "DRAGGING",
            Self::Fading => "FADING",
            Self::Navigating => "NAVIGATING",
            Self::Resetting => "RESETTING",
        }
    }
}

impl fmt::Display for AnimationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Whether `from -> to` is in the adjacency table.
///
/// Every state may be interrupted into `Resetting`, except `Resetting`
/// itself, which can only return to `Idle`.
pub fn is_valid_transition(from: AnimationState, to: AnimationState) -> bool {
    use AnimationState::*;

    match (from, to) {
        (Resetting, Idle) => true,
        (Resetting, _) => false,
        (_, Resetting) => true,
        (Idle, DoorOpening)
        | (DoorOpening, HandEmerging)
        | (HandEmerging, HandPaused)
        | (HandPaused, Dragging)
        | (Dragging, Fading)
        | (Fading, Navigating) => true,
        _ => false,
    }
}
