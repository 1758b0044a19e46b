// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tests for timeline arithmetic, easing curves and run sequencing.

use hauntedhub_sequencer::{
    ease_in_cubic, ease_in_out_cubic, ease_out_cubic, AnimationState, Easing, TransitionConfig,
    TransitionStateMachine, TransitionTimeline,
};
use proptest::prelude::*;

const EPSILON: f32 = 0.001;

fn config_strategy() -> impl Strategy<Value = TransitionConfig> {
    (0.05f32..5.0, 0.05f32..5.0, 0.05f32..5.0, 0.05f32..5.0, 0.05f32..5.0).prop_map(
        |(door, hand, pause, drag, fade)| TransitionConfig {
            door_duration: door,
            hand_duration: hand,
            pause_duration: pause,
            drag_duration: drag,
            fade_duration: fade,
        },
    )
}

proptest! {
    #[test]
    fn durations_round_trip(config in config_strategy()) {
        let timeline = TransitionTimeline::calculate(&config);

        prop_assert!((timeline.door_open.duration() - config.door_duration).abs() < EPSILON);
        prop_assert!((timeline.hand_emerge.duration() - config.hand_duration).abs() < EPSILON);
        prop_assert!((timeline.hand_pause.duration() - config.pause_duration).abs() < EPSILON);
        prop_assert!((timeline.drag.duration() - config.drag_duration).abs() < EPSILON);
        prop_assert!((timeline.fade.duration() - config.fade_duration).abs() < EPSILON);

        prop_assert!((timeline.hand_emerge.start - 0.8 * config.door_duration).abs() < EPSILON);
        prop_assert!(
            (timeline.fade.start - (timeline.hand_pause.end + 0.7 * config.drag_duration)).abs()
                < EPSILON
        );
    }

    #[test]
    fn phases_are_ordered(config in config_strategy()) {
        let timeline = TransitionTimeline::calculate(&config);

        prop_assert_eq!(timeline.door_open.start, 0.0);
        prop_assert!(timeline.door_open.start < timeline.hand_emerge.start);
        prop_assert!(timeline.hand_emerge.start < timeline.door_open.end);
        prop_assert_eq!(timeline.hand_pause.start, timeline.hand_emerge.end);
        prop_assert_eq!(timeline.drag.start, timeline.hand_pause.end);
        prop_assert!(timeline.drag.contains(timeline.fade.start));
        prop_assert_eq!(timeline.navigate.start, timeline.fade.end);
    }

    #[test]
    fn phase_at_is_monotonic(config in config_strategy(), a in 0.0f32..30.0, b in 0.0f32..30.0) {
        let timeline = TransitionTimeline::calculate(&config);
        let (early, late) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(timeline.phase_at(early) <= timeline.phase_at(late));
    }

    #[test]
    fn easing_stays_in_unit_range(t in 0.0f32..=1.0) {
        for easing in Easing::ALL {
            let value = easing.apply(t);
            prop_assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn easing_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        for easing in Easing::ALL {
            prop_assert!(easing.apply(low) <= easing.apply(high) + 1e-6);
        }
    }

    #[test]
    fn cubic_curves_bracket_linear(t in 0.01f32..0.99) {
        prop_assert!(ease_in_cubic(t) < t);
        prop_assert!(ease_out_cubic(t) > t);
        prop_assert!((ease_in_out_cubic(1.0 - t) - (1.0 - ease_in_out_cubic(t))).abs() < 1e-5);
    }

    #[test]
    fn random_ticks_never_reenter_a_phase(
        config in config_strategy(),
        steps in prop::collection::vec(0.0f32..0.5, 1..200),
    ) {
        let mut machine = TransitionStateMachine::new(config, Default::default())
            .unwrap()
            .with_seed(3);
        machine.start(0.0);

        let mut elapsed = 0.0;
        let mut previous = machine.state();
        for step in steps {
            elapsed += step;
            machine.advance_to(elapsed);
            let current = machine.state();
            prop_assert!(current >= previous);
            prop_assert!((0.0..=1.0).contains(&machine.progress()));
            previous = current;
        }

        if elapsed >= machine.timeline().total_duration() {
            prop_assert_eq!(machine.state(), AnimationState::Navigating);
            prop_assert!(machine.selected_game().is_some());
        }
    }
}
