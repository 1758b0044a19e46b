// SPDX-License-Identifier: MIT OR Apache-2.0
//! Absolute phase windows derived from a [`TransitionConfig`].

use crate::config::TransitionConfig;
use crate::state::AnimationState;
use serde::{Deserialize, Serialize};

/// Fraction of the door swing after which the hand starts to emerge
pub const HAND_EMERGE_OFFSET: f32 = 0.8;

/// Fraction of the drag after which the fade starts
pub const FADE_OFFSET: f32 = 0.7;

/// Half-open `[start, end)` window in seconds from transition start
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseWindow {
    /// Start time
    pub start: f32,
    /// End time
    pub end: f32,
}

impl PhaseWindow {
    /// Create a window from a start time and a duration
    pub fn new(start: f32, duration: f32) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Window length
    pub fn duration(&self) -> f32 {
        self.end - self.start
    }

    /// Whether `time` lies in `[start, end)`
    pub fn contains(&self, time: f32) -> bool {
        time >= self.start && time < self.end
    }

    /// Progress of `time` through the window, clamped to `[0, 1]`.
    /// A zero-length window is complete as soon as it starts.
    pub fn progress(&self, time: f32) -> f32 {
        let duration = self.duration();
        if duration <= 0.0 {
            return if time >= self.start { 1.0 } else { 0.0 };
        }
        ((time - self.start) / duration).clamp(0.0, 1.0)
    }
}

/// Start/end windows for every timed phase of one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionTimeline {
    /// Door rotation
    pub door_open: PhaseWindow,
    /// Hand emergence, starting inside `door_open`
    pub hand_emerge: PhaseWindow,
    /// Hold after the hand is out
    pub hand_pause: PhaseWindow,
    /// Camera drag
    pub drag: PhaseWindow,
    /// Fade, starting inside `drag`
    pub fade: PhaseWindow,
    /// Navigation start (zero-length window at `fade.end`)
    pub navigate: PhaseWindow,
}

impl TransitionTimeline {
    /// Lay out the phase windows for a config
    pub fn calculate(config: &TransitionConfig) -> Self {
        let door_open = PhaseWindow::new(0.0, config.door_duration);
        let hand_emerge =
            PhaseWindow::new(config.door_duration * HAND_EMERGE_OFFSET, config.hand_duration);
        let hand_pause = PhaseWindow::new(hand_emerge.end, config.pause_duration);
        let drag = PhaseWindow::new(hand_pause.end, config.drag_duration);
        let fade = PhaseWindow::new(
            hand_pause.end + config.drag_duration * FADE_OFFSET,
            config.fade_duration,
        );
        let navigate = PhaseWindow::new(fade.end, 0.0);

        Self {
            door_open,
            hand_emerge,
            hand_pause,
            drag,
            fade,
            navigate,
        }
    }

    /// Window for a timed phase; `None` for `Idle` and `Resetting`
    pub fn window(&self, state: AnimationState) -> Option<PhaseWindow> {
        match state {
            AnimationState::DoorOpening => Some(self.door_open),
            AnimationState::HandEmerging => Some(self.hand_emerge),
            AnimationState::HandPaused => Some(self.hand_pause),
            AnimationState::Dragging => Some(self.drag),
            AnimationState::Fading => Some(self.fade),
            AnimationState::Navigating => Some(self.navigate),
            AnimationState::Idle | AnimationState::Resetting => None,
        }
    }

    /// The latest timed phase whose window has started by `elapsed`.
    ///
    /// Windows overlap (hand/door, fade/drag), so the later phase wins as
    /// soon as it begins.
    pub fn phase_at(&self, elapsed: f32) -> AnimationState {
        AnimationState::TIMED
            .iter()
            .rev()
            .copied()
            .find(|state| {
                self.window(*state)
                    .is_some_and(|window| elapsed >= window.start)
            })
            .unwrap_or(AnimationState::DoorOpening)
    }

    /// Time from start until navigation begins
    pub fn total_duration(&self) -> f32 {
        self.navigate.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.001;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_default_timeline() {
        let timeline = TransitionTimeline::calculate(&TransitionConfig::default());

        assert!(approx(timeline.door_open.start, 0.0));
        assert!(approx(timeline.door_open.end, 1.2));
        assert!(approx(timeline.hand_emerge.start, 0.96));
        assert!(approx(timeline.hand_emerge.end, 1.76));
        assert!(approx(timeline.hand_pause.start, 1.76));
        assert!(approx(timeline.hand_pause.end, 2.06));
        assert!(approx(timeline.drag.start, 2.06));
        assert!(approx(timeline.drag.end, 3.06));
        assert!(approx(timeline.fade.start, 2.76));
        assert!(approx(timeline.fade.end, 3.26));
        assert!(approx(timeline.navigate.start, 3.26));
        assert!(approx(timeline.total_duration(), 3.26));
    }

    #[test]
    fn test_phase_at() {
        let timeline = TransitionTimeline::calculate(&TransitionConfig::default());

        assert_eq!(timeline.phase_at(0.0), AnimationState::DoorOpening);
        assert_eq!(timeline.phase_at(0.95), AnimationState::DoorOpening);
        assert_eq!(timeline.phase_at(1.0), AnimationState::HandEmerging);
        assert_eq!(timeline.phase_at(1.5), AnimationState::HandEmerging);
        assert_eq!(timeline.phase_at(1.8), AnimationState::HandPaused);
        assert_eq!(timeline.phase_at(2.5), AnimationState::Dragging);
        assert_eq!(timeline.phase_at(3.0), AnimationState::Fading);
        assert_eq!(timeline.phase_at(4.0), AnimationState::Navigating);
        assert_eq!(timeline.phase_at(-1.0), AnimationState::DoorOpening);
    }

    #[test]
    fn test_window_progress() {
        let window = PhaseWindow::new(1.0, 2.0);
        assert_eq!(window.progress(0.0), 0.0);
        assert!(approx(window.progress(2.0), 0.5));
        assert_eq!(window.progress(10.0), 1.0);
        assert!(window.contains(1.0));
        assert!(!window.contains(3.0));

        let instant = PhaseWindow::new(3.0, 0.0);
        assert_eq!(instant.progress(2.9), 0.0);
        assert_eq!(instant.progress(3.0), 1.0);
    }

    #[test]
    fn test_reduced_motion_timeline() {
        let timeline = TransitionTimeline::calculate(&TransitionConfig::reduced_motion());
        assert!(approx(timeline.hand_emerge.start, 0.24));
        assert!(approx(timeline.drag.start, 0.54));
        assert!(approx(timeline.fade.start, 0.75));
        assert!(approx(timeline.navigate.start, 1.05));
    }
}
