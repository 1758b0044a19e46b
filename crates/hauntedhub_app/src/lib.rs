// SPDX-License-Identifier: MIT OR Apache-2.0
//! Haunted hub: the knock-to-enter door cinematic.
//!
//! Three knocks on the door start a timed sequence: the door creaks open,
//! a hand emerges, pauses, drags the camera through the doorway, the scene
//! fades and a randomly chosen mini-game is entered. Phase timing lives in
//! [`hauntedhub_sequencer`]; this crate wires it to the door, camera, audio
//! and navigation.

pub mod assets;
pub mod audio;
pub mod camera;
pub mod clock;
pub mod door;
pub mod error;
pub mod hub;
pub mod navigation;
pub mod settings;

/// World position of the door; spatial cues and the camera drag target
pub const DOOR_POSITION: [f32; 3] = [0.0, 1.0, -4.0];

pub use assets::{load_hand_model, AssetSlot, AssetStatus, HandModel, HandVisual, LoadTicket};
pub use audio::{default_backend, AudioBackend, AudioCoordinator, NullBackend};
pub use camera::{CameraControl, CameraDrive, CameraPose, CameraTransitionDriver};
pub use clock::FrameClock;
pub use door::{DoorInput, DoorInteractionController, DoorKey, KnockOutcome};
pub use error::{HubError, Result};
pub use hub::{sound_cue, Hub, SoundCue};
pub use navigation::{LogNavigator, Navigator};
pub use settings::HubSettings;
