// SPDX-License-Identifier: MIT OR Apache-2.0
//! Hub orchestration.
//!
//! The [`Hub`] owns the sequencer and its collaborators and drives them
//! once per frame. Collaborators react to phase changes through sequencer
//! listeners; the door, audio and navigation handles are passed in, never
//! reached through globals.

use crate::assets::{AssetSlot, AssetStatus, HandModel, HandVisual, LoadTicket};
use crate::audio::{AudioCoordinator, DOOR_CREAK, DRAG_WHOOSH, HAND_EMERGE};
use crate::camera::{CameraControl, CameraDrive, CameraPose, CameraTransitionDriver};
use crate::door::{DoorInput, DoorInteractionController, KnockOutcome};
use crate::error::Result;
use crate::navigation::Navigator;
use crate::settings::HubSettings;
use crate::DOOR_POSITION;
use hauntedhub_sequencer::{
    AnimationState, Game, GameRegistry, MotionPreference, TransitionConfig, TransitionStateMachine,
};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::rc::Rc;

/// Audio reaction to entering a phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    /// Play a sound, at the door if `spatial`
    Play {
        /// Sound name
        name: &'static str,
        /// Emit from [`DOOR_POSITION`]
        spatial: bool,
    },
    /// Fade a sound out over the configured fade duration
    FadeOut {
        /// Sound name
        name: &'static str,
    },
    /// Silence everything
    StopAll,
}

/// Sound cue for a phase, if it has one
pub fn sound_cue(state: AnimationState) -> Option<SoundCue> {
    match state {
        AnimationState::DoorOpening => Some(SoundCue::Play {
            name: DOOR_CREAK,
            spatial: true,
        }),
        AnimationState::HandEmerging => Some(SoundCue::Play {
            name: HAND_EMERGE,
            spatial: true,
        }),
        AnimationState::Dragging => Some(SoundCue::Play {
            name: DRAG_WHOOSH,
            spatial: false,
        }),
        AnimationState::Fading => Some(SoundCue::FadeOut { name: DRAG_WHOOSH }),
        AnimationState::Resetting => Some(SoundCue::StopAll),
        AnimationState::Idle | AnimationState::HandPaused | AnimationState::Navigating => None,
    }
}

fn fade_millis(config: &TransitionConfig) -> u64 {
    (config.fade_duration * 1000.0).round() as u64
}

/// The hub scene's transition subsystem
pub struct Hub {
    machine: TransitionStateMachine,
    door: Rc<RefCell<DoorInteractionController>>,
    audio: Rc<RefCell<AudioCoordinator>>,
    fade_ms: Rc<Cell<u64>>,
    pending_navigation: Rc<RefCell<Option<Game>>>,
    navigator: Box<dyn Navigator>,
    camera_driver: CameraTransitionDriver,
    camera: CameraPose,
    camera_control: CameraControl,
    hand: AssetSlot<HandModel>,
    last_frame: Option<f64>,
}

impl Hub {
    /// Wire a sequencer to its collaborators
    pub fn new(
        mut machine: TransitionStateMachine,
        door: DoorInteractionController,
        audio: AudioCoordinator,
        navigator: Box<dyn Navigator>,
    ) -> Self {
        let door = Rc::new(RefCell::new(door));
        let audio = Rc::new(RefCell::new(audio));
        let fade_ms = Rc::new(Cell::new(fade_millis(machine.config())));
        let pending_navigation = Rc::new(RefCell::new(None));

        let door_phase = Rc::clone(&door);
        machine.subscribe(move |new, _| door_phase.borrow_mut().set_phase(new));

        let cue_audio = Rc::clone(&audio);
        let cue_fade = Rc::clone(&fade_ms);
        machine.subscribe(move |new, _| {
            let Some(cue) = sound_cue(new) else {
                return;
            };
            let mut audio = cue_audio.borrow_mut();
            match cue {
                SoundCue::Play { name, spatial } => {
                    audio.play(name, spatial.then_some(DOOR_POSITION));
                }
                SoundCue::FadeOut { name } => audio.fade_out(name, cue_fade.get()),
                SoundCue::StopAll => audio.stop_all(),
            }
        });

        let completed = Rc::clone(&pending_navigation);
        machine.set_on_complete(move |game| {
            *completed.borrow_mut() = Some(game.clone());
        });

        Self {
            machine,
            door,
            audio,
            fade_ms,
            pending_navigation,
            navigator,
            camera_driver: CameraTransitionDriver::new(),
            camera: CameraPose::default(),
            camera_control: CameraControl::Orbit,
            hand: AssetSlot::new(),
            last_frame: None,
        }
    }

    /// Build a hub from settings with the default mini-game registry
    pub fn from_settings(
        settings: &HubSettings,
        audio: AudioCoordinator,
        navigator: Box<dyn Navigator>,
    ) -> Result<Self> {
        let machine =
            TransitionStateMachine::new(settings.transition_config()?, GameRegistry::default())?;
        let door = DoorInteractionController::new(settings.knock_window());
        Ok(Self::new(machine, door, audio, navigator))
    }

    /// Switch duration preset; applies from the next run
    pub fn set_motion_preference(&mut self, preference: MotionPreference) -> Result<()> {
        let config = TransitionConfig::for_motion_preference(preference);
        self.machine.set_config(config)?;
        Ok(())
    }

    /// Feed a door input at clock time `now`. Starts the cinematic on the
    /// third knock.
    pub fn handle_input(&mut self, input: DoorInput, now: f64) -> KnockOutcome {
        let outcome = self.door.borrow_mut().handle_input(input, now);
        if outcome != KnockOutcome::Armed {
            return outcome;
        }

        // The fade cue follows the config the run was started with
        self.fade_ms.set(fade_millis(self.machine.config()));
        if !self.machine.start(now) {
            tracing::warn!("Door armed while a run is in progress");
        }
        outcome
    }

    /// Advance everything to clock time `now`. Returns the game navigated
    /// to, if the cinematic finished this frame.
    pub fn frame(&mut self, now: f64) -> Option<Game> {
        let delta = self
            .last_frame
            .map_or(0.0, |last| (now - last).max(0.0) as f32);
        self.last_frame = Some(now);

        self.door.borrow_mut().update(now);
        self.machine.update(now);
        self.audio.borrow_mut().update(delta);
        self.drive_camera();

        let finished = self.pending_navigation.borrow_mut().take();
        let game = finished?;

        self.navigator.navigate(&game.route());
        self.door.borrow_mut().complete();
        self.machine.reset();
        self.drive_camera();
        Some(game)
    }

    /// Abort the cinematic (e.g. the hub is being torn down)
    pub fn cancel(&mut self) {
        tracing::info!("Transition cancelled in {}", self.machine.state());
        self.machine.reset();
        self.pending_navigation.borrow_mut().take();
        self.door.borrow_mut().complete();
        self.drive_camera();
    }

    /// Release audio and orphan in-flight asset loads
    pub fn shutdown(&mut self) {
        self.cancel();
        self.hand.invalidate();
        self.audio.borrow_mut().dispose();
    }

    fn drive_camera(&mut self) {
        let run = self.machine.run_state();
        let drive = CameraDrive {
            is_active: matches!(
                run.current_state,
                AnimationState::Dragging | AnimationState::Fading | AnimationState::Navigating
            ),
            progress: self.machine.timeline().drag.progress(run.total_elapsed),
            target: DOOR_POSITION,
        };

        self.camera_control = self.camera_driver.update(&mut self.camera, drive);
        self.audio.borrow_mut().set_listener_position(self.camera.position);
    }

    /// Begin loading the hand model
    pub fn begin_hand_load(&mut self) -> LoadTicket {
        self.hand.begin()
    }

    /// Store a hand model load result; stale results are dropped
    pub fn finish_hand_load(&mut self, ticket: LoadTicket, status: AssetStatus<HandModel>) -> bool {
        self.hand.complete(ticket, status)
    }

    /// What the renderer should draw for the hand
    pub fn hand_visual(&self) -> HandVisual {
        HandVisual::for_status(self.hand.status())
    }

    /// The sequencer
    pub fn machine(&self) -> &TransitionStateMachine {
        &self.machine
    }

    /// Active phase
    pub fn state(&self) -> AnimationState {
        self.machine.state()
    }

    /// Door accessibility label
    pub fn door_label(&self) -> String {
        self.door.borrow().label()
    }

    /// Door controller
    pub fn door(&self) -> Ref<'_, DoorInteractionController> {
        self.door.borrow()
    }

    /// Audio coordinator
    pub fn audio(&self) -> Ref<'_, AudioCoordinator> {
        self.audio.borrow()
    }

    /// Audio coordinator, mutably (for loading)
    pub fn audio_mut(&self) -> RefMut<'_, AudioCoordinator> {
        self.audio.borrow_mut()
    }

    /// Camera pose after the last frame
    pub fn camera(&self) -> CameraPose {
        self.camera
    }

    /// Set the camera (user orbit). Ignored while the driver owns it.
    pub fn set_camera(&mut self, pose: CameraPose) {
        if self.camera_control == CameraControl::Orbit {
            self.camera = pose;
        }
    }

    /// Who controlled the camera on the last frame
    pub fn camera_control(&self) -> CameraControl {
        self.camera_control
    }
}
