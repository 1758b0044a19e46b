// SPDX-License-Identifier: MIT OR Apache-2.0
//! Door interaction: the three-knock gesture and its accessibility surface.
//!
//! This module handles:
//! - Counting knocks (clicks, or Enter/Space while focused) inside a
//!   rolling window
//! - Arming the cinematic on the third knock
//! - Ignoring input while the door is animating
//! - Per-phase labels for assistive technology

use hauntedhub_sequencer::AnimationState;
use std::time::Duration;

/// Knocks needed to open the door
pub const REQUIRED_KNOCKS: u8 = 3;

/// Key pressed while the door has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorKey {
    /// Enter / Return
    Enter,
    /// Space bar
    Space,
    /// Anything else
    Other,
}

/// Input event on the door surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorInput {
    /// Click or tap
    Click,
    /// Key press
    Key(DoorKey),
}

/// What a knock attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnockOutcome {
    /// Input not accepted
    Ignored,
    /// Knock counted; holds the new count
    Counted(u8),
    /// Third knock: the cinematic should start
    Armed,
}

/// Knock counter state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorKnockState {
    /// Knocks in the current window (0..=3)
    pub knock_count: u8,
    /// Whether knocks are accepted
    pub is_listening: bool,
    /// Clock time (seconds) at which the count lapses
    pub reset_deadline: Option<f64>,
}

impl Default for DoorKnockState {
    fn default() -> Self {
        Self {
            knock_count: 0,
            is_listening: true,
            reset_deadline: None,
        }
    }
}

/// Input handling for the hub's door
#[derive(Debug)]
pub struct DoorInteractionController {
    state: DoorKnockState,
    window: Duration,
    focused: bool,
    hovered: bool,
    phase: AnimationState,
}

impl DoorInteractionController {
    /// Create a controller with the given knock window
    pub fn new(window: Duration) -> Self {
        Self {
            state: DoorKnockState::default(),
            window,
            focused: false,
            hovered: false,
            phase: AnimationState::Idle,
        }
    }

    /// Current knock state
    pub fn state(&self) -> &DoorKnockState {
        &self.state
    }

    /// Knocks counted so far
    pub fn knock_count(&self) -> u8 {
        self.state.knock_count
    }

    /// Whether the third knock is waiting for the cinematic to finish
    pub fn is_armed(&self) -> bool {
        self.state.knock_count >= REQUIRED_KNOCKS
    }

    /// Keyboard focus gained
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Keyboard focus lost
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether the door has keyboard focus
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Pointer entered or left the door
    pub fn set_hovered(&mut self, hovered: bool) {
        self.hovered = hovered;
    }

    /// Whether the pointer is over the door (and it would react)
    pub fn is_highlighted(&self) -> bool {
        self.hovered && self.is_interactive()
    }

    /// Track the sequencer's phase
    pub fn set_phase(&mut self, phase: AnimationState) {
        self.phase = phase;
    }

    /// Whether the door accepts knocks right now
    pub fn is_interactive(&self) -> bool {
        self.state.is_listening && !self.phase.is_active()
    }

    /// Route an input event. Keys only count while focused.
    pub fn handle_input(&mut self, input: DoorInput, now: f64) -> KnockOutcome {
        match input {
            DoorInput::Click => self.knock(now),
            DoorInput::Key(DoorKey::Enter | DoorKey::Space) if self.focused => self.knock(now),
            DoorInput::Key(_) => KnockOutcome::Ignored,
        }
    }

    /// Register one knock at clock time `now` (seconds)
    pub fn knock(&mut self, now: f64) -> KnockOutcome {
        if !self.is_interactive() {
            return KnockOutcome::Ignored;
        }

        self.update(now);
        self.state.knock_count += 1;

        if self.state.knock_count >= REQUIRED_KNOCKS {
            self.state.knock_count = REQUIRED_KNOCKS;
            self.state.is_listening = false;
            self.state.reset_deadline = None;
            tracing::info!("Third knock: door armed");
            return KnockOutcome::Armed;
        }

        self.state.reset_deadline = Some(now + self.window.as_secs_f64());
        tracing::debug!("Knock {} of {}", self.state.knock_count, REQUIRED_KNOCKS);
        KnockOutcome::Counted(self.state.knock_count)
    }

    /// Lapse the count if the window has passed without a knock
    pub fn update(&mut self, now: f64) {
        if let Some(deadline) = self.state.reset_deadline {
            if now >= deadline {
                tracing::debug!("Knock window lapsed at {} knocks", self.state.knock_count);
                self.state.knock_count = 0;
                self.state.reset_deadline = None;
            }
        }
    }

    /// Called once navigation happens: clear the count and listen again
    pub fn complete(&mut self) {
        self.state = DoorKnockState::default();
        self.phase = AnimationState::Idle;
    }

    /// Accessible label describing the door right now
    pub fn label(&self) -> String {
        match self.phase {
            AnimationState::Idle if self.is_armed() => "The door is about to open".to_string(),
            AnimationState::Idle => format!(
                "Haunted door: knock {} times to enter ({} of {})",
                REQUIRED_KNOCKS, self.state.knock_count, REQUIRED_KNOCKS
            ),
            AnimationState::DoorOpening => "The door is creaking open".to_string(),
            AnimationState::HandEmerging => "A hand reaches out of the darkness".to_string(),
            AnimationState::HandPaused => "The hand beckons you inside".to_string(),
            AnimationState::Dragging => "You are being pulled through the door".to_string(),
            AnimationState::Fading => "Everything fades to black".to_string(),
            AnimationState::Navigating => "Entering a mini-game".to_string(),
            AnimationState::Resetting => "The door slams shut".to_string(),
        }
    }
}

impl Default for DoorInteractionController {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::settings::DEFAULT_KNOCK_WINDOW_MS))
    }
}
