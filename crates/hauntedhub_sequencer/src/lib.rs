// SPDX-License-Identifier: MIT OR Apache-2.0
//! Door-opening transition sequencer for the HauntedHub mini-game hub.
//!
//! This crate provides the cinematic that carries the player from the hub
//! scene into a mini-game:
//! - Easing curves for progress remapping
//! - Timeline calculation from phase durations
//! - The phase state machine with its adjacency table
//! - The mini-game registry used for random selection
//!
//! ## Architecture
//!
//! The sequencer is built on:
//! - An explicit frame tick (`update(now)` / `advance_to(elapsed)`)
//! - Synchronous state-change listeners (no per-frame observers)
//! - A completion callback carrying the selected game
//!
//! Rendering, audio and navigation stay outside this crate and react to
//! state changes.

pub mod config;
pub mod easing;
pub mod error;
pub mod machine;
pub mod registry;
pub mod state;
pub mod timeline;

pub use config::{MotionPreference, TransitionConfig};
pub use easing::{ease_in_cubic, ease_in_out_cubic, ease_out_cubic, linear, Easing, Interpolation};
pub use error::{Result, SequencerError};
pub use machine::{
    CompletionCallback, ListenerId, RunId, StateListener, TransitionRunState,
    TransitionStateMachine,
};
pub use registry::{Game, GameId, GameRegistry};
pub use state::{is_valid_transition, AnimationState};
pub use timeline::{PhaseWindow, TransitionTimeline, FADE_OFFSET, HAND_EMERGE_OFFSET};
