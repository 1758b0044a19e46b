// SPDX-License-Identifier: MIT OR Apache-2.0
//! Frame-driven state machine sequencing the door cinematic.
//!
//! The machine owns one [`TransitionRunState`] and mutates it only from
//! [`TransitionStateMachine::start`], the frame tick
//! ([`TransitionStateMachine::update`] / [`TransitionStateMachine::advance_to`]),
//! [`TransitionStateMachine::transition_to`] and
//! [`TransitionStateMachine::reset`]. Collaborators observe discrete phase
//! changes through listeners instead of polling per-frame state.

use crate::config::TransitionConfig;
use crate::error::Result;
use crate::registry::{Game, GameRegistry};
use crate::state::{is_valid_transition, AnimationState};
use crate::timeline::TransitionTimeline;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::panic::{self, AssertUnwindSafe};
use uuid::Uuid;

/// Unique identifier for one run of the cinematic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

impl RunId {
    /// Create a new random run ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`TransitionStateMachine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// State-change listener, called with `(new_state, old_state)`
pub type StateListener = Box<dyn FnMut(AnimationState, AnimationState)>;

/// Completion callback, called with the selected game on entry to `Navigating`
pub type CompletionCallback = Box<dyn FnMut(&Game)>;

/// Mutable record of the current run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransitionRunState {
    /// Run in progress, if any
    pub run_id: Option<RunId>,
    /// Active state
    pub current_state: AnimationState,
    /// Progress through the active phase (0..1)
    pub progress: f32,
    /// Seconds since the run started
    pub total_elapsed: f32,
    /// Game chosen when the drag began
    pub selected_game: Option<Game>,
}

/// The door cinematic sequencer
pub struct TransitionStateMachine {
    config: TransitionConfig,
    timeline: TransitionTimeline,
    registry: GameRegistry,
    run: TransitionRunState,
    /// Clock reading captured by `start`
    start_time: Option<f64>,
    /// Whether the frame tick advances the run
    running: bool,
    listeners: Vec<(ListenerId, StateListener)>,
    next_listener_id: u64,
    on_complete: Option<CompletionCallback>,
    rng: SmallRng,
}

impl TransitionStateMachine {
    /// Create a machine for a validated config and registry
    pub fn new(config: TransitionConfig, registry: GameRegistry) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            timeline: TransitionTimeline::calculate(&config),
            registry,
            run: TransitionRunState::default(),
            start_time: None,
            running: false,
            listeners: Vec::new(),
            next_listener_id: 0,
            on_complete: None,
            rng: SmallRng::from_os_rng(),
        })
    }

    /// Use a fixed seed for game selection
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = SmallRng::seed_from_u64(seed);
        self
    }

    /// Replace the config. Takes effect at the next `start`.
    pub fn set_config(&mut self, config: TransitionConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// Current config
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Timeline of the current (or last) run
    pub fn timeline(&self) -> &TransitionTimeline {
        &self.timeline
    }

    /// Registered mini-games
    pub fn registry(&self) -> &GameRegistry {
        &self.registry
    }

    /// Read-only view of the run state
    pub fn run_state(&self) -> &TransitionRunState {
        &self.run
    }

    /// Active state
    pub fn state(&self) -> AnimationState {
        self.run.current_state
    }

    /// Progress through the active phase
    pub fn progress(&self) -> f32 {
        self.run.progress
    }

    /// Game selected for this run
    pub fn selected_game(&self) -> Option<&Game> {
        self.run.selected_game.as_ref()
    }

    /// Whether the frame tick is advancing a run
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether `to` is reachable from the active state
    pub fn can_transition_to(&self, to: AnimationState) -> bool {
        is_valid_transition(self.run.current_state, to)
    }

    /// Register a state-change listener
    pub fn subscribe(
        &mut self,
        listener: impl FnMut(AnimationState, AnimationState) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Set the callback fired on entry to `Navigating`
    pub fn set_on_complete(&mut self, callback: impl FnMut(&Game) + 'static) {
        self.on_complete = Some(Box::new(callback));
    }

    /// Start a run at clock time `now` (seconds).
    /// Returns false if a run is already in progress.
    pub fn start(&mut self, now: f64) -> bool {
        if self.running || self.run.current_state != AnimationState::Idle {
            tracing::debug!(
                "Start rejected: sequencer is {} (running: {})",
                self.run.current_state,
                self.running
            );
            return false;
        }

        self.timeline = TransitionTimeline::calculate(&self.config);
        self.start_time = Some(now);
        self.running = true;
        self.run = TransitionRunState {
            run_id: Some(RunId::new()),
            ..TransitionRunState::default()
        };

        tracing::info!(
            "Transition run {:?} started ({:.2}s to navigation)",
            self.run.run_id,
            self.timeline.total_duration()
        );

        self.enter(AnimationState::DoorOpening);
        true
    }

    /// Frame tick: advance the run to clock time `now` (seconds)
    pub fn update(&mut self, now: f64) {
        if let Some(start_time) = self.start_time {
            self.advance_to((now - start_time) as f32);
        }
    }

    /// Frame tick with the elapsed time since `start`.
    ///
    /// Performs at most one state change per call. After a stall the
    /// machine jumps straight to the phase indicated by `elapsed`.
    pub fn advance_to(&mut self, elapsed: f32) {
        if !self.running {
            return;
        }

        let elapsed = elapsed.max(0.0);
        self.run.total_elapsed = elapsed;

        let target = self.timeline.phase_at(elapsed);
        let current = self.run.current_state;
        if target > current {
            if target.index() - current.index() > 1 {
                tracing::debug!(
                    "Frame stall at {:.3}s: jumping {} -> {}",
                    elapsed,
                    current,
                    target
                );
            }
            self.enter(target);
        }

        if let Some(window) = self.timeline.window(self.run.current_state) {
            self.run.progress = window.progress(elapsed);
        }
    }

    /// Request a transition along the adjacency table.
    /// Rejected transitions return false and leave the state untouched.
    pub fn transition_to(&mut self, to: AnimationState) -> bool {
        let from = self.run.current_state;
        if !is_valid_transition(from, to) {
            tracing::debug!("Rejected transition {} -> {}", from, to);
            return false;
        }

        self.enter(to);
        true
    }

    /// Abort any run and return to `Idle`. Safe to call from any state,
    /// any number of times.
    pub fn reset(&mut self) {
        let state = self.run.current_state;
        if state != AnimationState::Idle && state != AnimationState::Resetting {
            self.enter(AnimationState::Resetting);
        }
        if self.run.current_state == AnimationState::Resetting {
            self.enter(AnimationState::Idle);
        }

        self.running = false;
        self.start_time = None;
        self.run = TransitionRunState::default();
    }

    /// Switch state, run entry actions and notify listeners
    fn enter(&mut self, to: AnimationState) {
        let from = self.run.current_state;
        self.run.current_state = to;
        self.run.progress = 0.0;

        tracing::debug!(
            "Run {:?}: {} -> {} at {:.3}s",
            self.run.run_id,
            from,
            to,
            self.run.total_elapsed
        );

        match to {
            AnimationState::Dragging | AnimationState::Fading | AnimationState::Navigating => {
                self.select_game();
            }
            AnimationState::Resetting => {
                self.running = false;
                self.start_time = None;
                self.run.total_elapsed = 0.0;
                self.run.selected_game = None;
            }
            AnimationState::Idle => {
                self.run = TransitionRunState::default();
            }
            _ => {}
        }

        self.notify(to, from);

        if to == AnimationState::Navigating {
            self.complete();
        }
    }

    /// Pick the run's game. Only the first call in a run has an effect.
    fn select_game(&mut self) {
        if self.run.selected_game.is_some() {
            return;
        }
        let game = self.registry.choose(&mut self.rng).clone();
        tracing::info!("Selected mini-game {} ({})", game.id, game.display_name);
        self.run.selected_game = Some(game);
    }

    /// Stop ticking and hand the selected game to the completion callback
    fn complete(&mut self) {
        self.running = false;
        self.run.progress = 1.0;

        let Some(game) = self.run.selected_game.as_ref() else {
            tracing::warn!("Navigation reached without a selected game");
            return;
        };

        tracing::info!("Transition run {:?} complete -> {}", self.run.run_id, game.route());

        if let Some(callback) = self.on_complete.as_mut() {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(game))).is_err() {
                tracing::error!("Completion callback panicked");
            }
        }
    }

    fn notify(&mut self, new_state: AnimationState, old_state: AnimationState) {
        for (id, listener) in self.listeners.iter_mut() {
            if panic::catch_unwind(AssertUnwindSafe(|| listener(new_state, old_state))).is_err() {
                tracing::error!(
                    "State listener {:?} panicked on {} -> {}",
                    id,
                    old_state,
                    new_state
                );
            }
        }
    }
}

impl Default for TransitionStateMachine {
    fn default() -> Self {
        let config = TransitionConfig::default();
        Self {
            config,
            timeline: TransitionTimeline::calculate(&config),
            registry: GameRegistry::default(),
            run: TransitionRunState::default(),
            start_time: None,
            running: false,
            listeners: Vec::new(),
            next_listener_id: 0,
            on_complete: None,
            rng: SmallRng::from_os_rng(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use AnimationState::*;

    fn machine() -> TransitionStateMachine {
        TransitionStateMachine::default().with_seed(42)
    }

    fn record(
        machine: &mut TransitionStateMachine,
    ) -> Rc<RefCell<Vec<(AnimationState, AnimationState)>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        machine.subscribe(move |new, old| sink.borrow_mut().push((new, old)));
        log
    }

    #[test]
    fn test_start_enters_door_opening() {
        let mut machine = machine();
        let log = record(&mut machine);

        assert!(machine.start(10.0));
        assert_eq!(machine.state(), DoorOpening);
        assert_eq!(machine.progress(), 0.0);
        assert!(machine.is_running());
        assert!(machine.run_state().run_id.is_some());
        assert_eq!(*log.borrow(), vec![(DoorOpening, Idle)]);
    }

    #[test]
    fn test_double_start_is_rejected() {
        let mut machine = machine();
        assert!(machine.start(0.0));
        machine.advance_to(0.5);
        let before = machine.run_state().clone();

        assert!(!machine.start(0.3));
        assert_eq!(machine.run_state(), &before);
    }

    #[test]
    fn test_end_to_end_default_config() {
        let mut machine = machine();
        let completed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&completed);
        machine.set_on_complete(move |game| sink.borrow_mut().push(game.clone()));

        machine.start(0.0);
        machine.advance_to(1.5);
        assert_eq!(machine.state(), HandEmerging);
        assert!((machine.progress() - (1.5 - 0.96) / 0.8).abs() < 0.001);

        machine.advance_to(4.0);
        assert_eq!(machine.state(), Navigating);
        assert!(!machine.is_running());
        assert_eq!(completed.borrow().len(), 1);
        assert_eq!(Some(&completed.borrow()[0]), machine.selected_game());

        // Terminal until reset
        machine.advance_to(5.0);
        assert_eq!(machine.state(), Navigating);
        assert_eq!(completed.borrow().len(), 1);
    }

    #[test]
    fn test_update_uses_clock_offset() {
        let mut machine = machine();
        machine.start(100.0);
        machine.update(101.0);
        assert_eq!(machine.state(), HandEmerging);
        assert!((machine.run_state().total_elapsed - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_frame_by_frame_visits_every_phase_once() {
        let mut machine = machine();
        let log = record(&mut machine);

        machine.start(0.0);
        let mut t = 0.0;
        while machine.is_running() {
            t += 1.0 / 60.0;
            machine.advance_to(t);
        }

        let entered: Vec<_> = log.borrow().iter().map(|(new, _)| *new).collect();
        assert_eq!(
            entered,
            vec![DoorOpening, HandEmerging, HandPaused, Dragging, Fading, Navigating]
        );
    }

    #[test]
    fn test_stall_jumps_with_single_event() {
        let mut machine = machine();
        let log = record(&mut machine);

        machine.start(0.0);
        machine.advance_to(2.5);
        assert_eq!(machine.state(), Dragging);
        assert_eq!(log.borrow().last(), Some(&(Dragging, DoorOpening)));
        assert_eq!(log.borrow().len(), 2);
        assert!(machine.selected_game().is_some());
    }

    #[test]
    fn test_game_selected_once_at_dragging() {
        let mut machine = machine();
        let mut selections = Vec::new();

        machine.start(0.0);
        let mut t = 0.0;
        let mut last = None;
        while machine.is_running() {
            t += 1.0 / 60.0;
            machine.advance_to(t);
            let current = machine.selected_game().cloned();
            if current != last {
                selections.push((machine.state(), current.clone()));
                last = current;
            }
        }

        assert_eq!(selections.len(), 1);
        assert_eq!(selections[0].0, Dragging);
        assert!(selections[0].1.is_some());
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut machine = machine();
        machine.start(0.0);
        machine.advance_to(2.5);

        for _ in 0..10 {
            machine.reset();
            let run = machine.run_state();
            assert_eq!(run.current_state, Idle);
            assert_eq!(run.progress, 0.0);
            assert_eq!(run.total_elapsed, 0.0);
            assert_eq!(run.selected_game, None);
            assert!(!machine.is_running());
        }

        assert!(machine.start(3.0));
    }

    #[test]
    fn test_reset_notifies_resetting_then_idle() {
        let mut machine = machine();
        machine.start(0.0);
        machine.advance_to(1.0);
        let log = record(&mut machine);

        machine.reset();
        assert_eq!(*log.borrow(), vec![(Resetting, HandEmerging), (Idle, Resetting)]);

        machine.reset();
        assert_eq!(log.borrow().len(), 2);
    }

    #[test]
    fn test_invalid_transition_does_not_mutate() {
        let mut machine = machine();
        assert!(!machine.transition_to(Dragging));
        assert_eq!(machine.state(), Idle);

        assert!(machine.transition_to(DoorOpening));
        assert!(!machine.transition_to(Navigating));
        assert_eq!(machine.state(), DoorOpening);
        assert!(machine.transition_to(Resetting));
        assert!(!machine.transition_to(DoorOpening));
        assert!(machine.transition_to(Idle));
    }

    #[test]
    fn test_manual_drive_completes() {
        let mut machine = machine();
        let completions = Rc::new(RefCell::new(0));
        let count = Rc::clone(&completions);
        machine.set_on_complete(move |_| *count.borrow_mut() += 1);

        for state in [DoorOpening, HandEmerging, HandPaused, Dragging, Fading, Navigating] {
            assert!(machine.transition_to(state));
        }
        assert_eq!(*completions.borrow(), 1);
        assert!(machine.selected_game().is_some());
    }

    #[test]
    fn test_panicking_listener_is_isolated() {
        let mut machine = machine();
        machine.subscribe(|new, _| {
            if new == HandEmerging {
                panic!("listener failure");
            }
        });
        let log = record(&mut machine);

        machine.start(0.0);
        machine.advance_to(1.0);
        machine.advance_to(1.8);

        assert_eq!(machine.state(), HandPaused);
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_panicking_completion_is_isolated() {
        let mut machine = machine();
        machine.set_on_complete(|_| panic!("completion failure"));
        let log = record(&mut machine);

        machine.start(0.0);
        machine.advance_to(2.5);
        machine.advance_to(4.0);

        assert_eq!(machine.state(), Navigating);
        assert!(!machine.is_running());
        assert!(machine.selected_game().is_some());
        assert_eq!(log.borrow().last(), Some(&(Navigating, Dragging)));

        machine.reset();
        assert!(machine.start(5.0));
        assert_eq!(machine.state(), DoorOpening);
    }

    #[test]
    fn test_each_run_gets_fresh_id() {
        let mut machine = machine();
        machine.start(0.0);
        let first = machine.run_state().run_id;
        assert!(first.is_some());

        machine.reset();
        assert_eq!(machine.run_state().run_id, None);

        machine.start(1.0);
        let second = machine.run_state().run_id;
        assert!(second.is_some());
        assert_ne!(first, second);
    }

    #[test]
    fn test_unsubscribe_leaves_others() {
        let mut machine = machine();
        let first = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&first);
        let id = machine.subscribe(move |_, _| *counter.borrow_mut() += 1);
        let log = record(&mut machine);

        assert!(machine.unsubscribe(id));
        assert!(!machine.unsubscribe(id));

        machine.start(0.0);
        assert_eq!(*first.borrow(), 0);
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn test_config_change_applies_next_run() {
        let mut machine = machine();
        machine.start(0.0);
        machine
            .set_config(TransitionConfig::reduced_motion())
            .unwrap();
        assert!((machine.timeline().total_duration() - 3.26).abs() < 0.001);

        machine.reset();
        machine.start(0.0);
        assert!((machine.timeline().total_duration() - 1.05).abs() < 0.001);

        let invalid = TransitionConfig {
            fade_duration: -0.5,
            ..TransitionConfig::default()
        };
        assert!(machine.set_config(invalid).is_err());
    }
}
