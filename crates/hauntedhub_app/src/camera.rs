// SPDX-License-Identifier: MIT OR Apache-2.0
//! Camera drag into the doorway.

use hauntedhub_sequencer::{ease_in_cubic, Interpolation};

/// How far below the target's Y the drag ends
pub const DRAG_DROP: f32 = 0.5;

/// Downward pitch (radians) reached at the end of the drag
pub const DRAG_PITCH: f32 = 0.3;

/// Camera position and Euler rotation (pitch, yaw, roll in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// World position
    pub position: [f32; 3],
    /// Euler angles
    pub rotation: [f32; 3],
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: [0.0, 1.6, 6.0],
            rotation: [0.0, 0.0, 0.0],
        }
    }
}

/// Who moves the camera this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CameraControl {
    /// Free orbit controls driven by the user
    #[default]
    Orbit,
    /// The transition driver
    Driven,
}

/// Per-frame input for the driver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraDrive {
    /// Whether the drag is in effect
    pub is_active: bool,
    /// Drag progress (0..1)
    pub progress: f32,
    /// Point the camera is dragged to
    pub target: [f32; 3],
}

/// Interpolates the camera from its pose at activation towards the target
#[derive(Debug, Default)]
pub struct CameraTransitionDriver {
    /// Pose captured when the drive became active
    initial: Option<CameraPose>,
}

impl CameraTransitionDriver {
    /// Create an idle driver
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame of the drive to `camera` and report who owns it.
    ///
    /// The first active frame captures the starting pose; the first
    /// inactive frame restores it and clears the capture.
    pub fn update(&mut self, camera: &mut CameraPose, drive: CameraDrive) -> CameraControl {
        if !drive.is_active {
            if let Some(initial) = self.initial.take() {
                *camera = initial;
                tracing::debug!("Camera restored to {:?}", initial.position);
            }
            return CameraControl::Orbit;
        }

        let initial = *self.initial.get_or_insert(*camera);
        let eased = ease_in_cubic(drive.progress);
        let [x, y, z] = drive.target;
        let target = [x, y - DRAG_DROP * eased, z];

        camera.position = Interpolation::lerp_vec3(initial.position, target, eased);
        camera.rotation = [
            initial.rotation[0] - DRAG_PITCH * eased,
            initial.rotation[1],
            initial.rotation[2],
        ];

        CameraControl::Driven
    }

    /// Whether a starting pose is captured
    pub fn is_driving(&self) -> bool {
        self.initial.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: [f32; 3] = [0.0, 1.0, -4.0];

    fn drive(is_active: bool, progress: f32) -> CameraDrive {
        CameraDrive {
            is_active,
            progress,
            target: TARGET,
        }
    }

    #[test]
    fn test_starts_at_captured_pose() {
        let mut driver = CameraTransitionDriver::new();
        let mut camera = CameraPose::default();
        let start = camera;

        assert_eq!(driver.update(&mut camera, drive(true, 0.0)), CameraControl::Driven);
        assert_eq!(camera, start);
        assert!(driver.is_driving());
    }

    #[test]
    fn test_reaches_offset_target() {
        let mut driver = CameraTransitionDriver::new();
        let mut camera = CameraPose::default();

        driver.update(&mut camera, drive(true, 0.0));
        driver.update(&mut camera, drive(true, 1.0));

        assert!((camera.position[1] - (TARGET[1] - DRAG_DROP)).abs() < 1e-5);
        assert!((camera.position[2] - TARGET[2]).abs() < 1e-5);
        assert!((camera.rotation[0] + DRAG_PITCH).abs() < 1e-5);
    }

    #[test]
    fn test_eases_in() {
        let mut driver = CameraTransitionDriver::new();
        let mut camera = CameraPose::default();
        let start_z = camera.position[2];

        driver.update(&mut camera, drive(true, 0.5));
        let travelled = (start_z - camera.position[2]) / (start_z - TARGET[2]);
        assert!((travelled - 0.125).abs() < 1e-5);
    }

    #[test]
    fn test_deactivation_restores_and_recaptures() {
        let mut driver = CameraTransitionDriver::new();
        let mut camera = CameraPose::default();
        let start = camera;

        driver.update(&mut camera, drive(true, 0.7));
        assert_ne!(camera, start);

        assert_eq!(driver.update(&mut camera, drive(false, 0.0)), CameraControl::Orbit);
        assert_eq!(camera, start);
        assert!(!driver.is_driving());

        // User orbits, then a new drag captures the new pose
        camera.position = [2.0, 2.0, 5.0];
        let moved = camera;
        driver.update(&mut camera, drive(true, 0.0));
        driver.update(&mut camera, drive(false, 0.0));
        assert_eq!(camera, moved);
    }
}
