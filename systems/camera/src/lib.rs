#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! First-person mouse-look camera and view heading classification.
//!
//! The camera sits on the player with Z pointing up. Mouse deltas turn it, and
//! the horizontal part of its forward vector decides which absolute direction
//! the player is looking toward. Movement keys are interpreted relative to
//! that heading.

use glam::{Mat4, Vec2, Vec3};
use maze_chase_core::{Command, Direction, WorldPoint};
use tracing::debug;

/// Half width of the band a forward component must fall inside to count as
/// aligned with the other axis.
pub const HEADING_BAND: f32 = 0.5;

/// Pitch limit in degrees, both up and down.
pub const PITCH_LIMIT_DEGREES: f32 = 89.0;

/// Tunables for the first-person camera.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraSettings {
    /// Degrees turned per unit of mouse movement.
    pub sensitivity: f32,
    /// Yaw at round start, in degrees. Ninety looks toward +Y.
    pub initial_yaw_degrees: f32,
    /// Pitch at round start, in degrees.
    pub initial_pitch_degrees: f32,
    /// Height of the eye above the maze floor.
    pub eye_height: f32,
    /// Vertical field of view, in degrees.
    pub fov_y_degrees: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            sensitivity: 0.1,
            initial_yaw_degrees: 90.0,
            initial_pitch_degrees: 0.0,
            eye_height: 1.0,
            fov_y_degrees: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Yaw/pitch camera driven by relative mouse motion.
#[derive(Clone, Debug, PartialEq)]
pub struct FirstPersonCamera {
    yaw: f32,
    pitch: f32,
    settings: CameraSettings,
}

impl FirstPersonCamera {
    /// Creates a camera at the configured initial orientation.
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            yaw: settings.initial_yaw_degrees,
            pitch: settings
                .initial_pitch_degrees
                .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES),
            settings,
        }
    }

    /// Turns the camera by a mouse delta in screen pixels.
    ///
    /// Screen Y grows downward, so moving the mouse down lowers the pitch.
    pub fn apply_mouse_delta(&mut self, delta: Vec2) {
        self.yaw += delta.x * self.settings.sensitivity;
        self.pitch = (self.pitch - delta.y * self.settings.sensitivity)
            .clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }

    /// Current yaw in degrees.
    #[must_use]
    pub fn yaw_degrees(&self) -> f32 {
        self.yaw
    }

    /// Current pitch in degrees.
    #[must_use]
    pub fn pitch_degrees(&self) -> f32 {
        self.pitch
    }

    /// Unit vector the camera looks along.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        Vec3::new(
            -yaw.cos() * pitch.cos(),
            yaw.sin() * pitch.cos(),
            pitch.sin(),
        )
        .normalize()
    }

    /// Eye position for a player standing at `position`.
    #[must_use]
    pub fn eye(&self, position: WorldPoint) -> Vec3 {
        Vec3::new(position.x(), position.y(), self.settings.eye_height)
    }

    /// World-to-view transform for a player standing at `position`.
    #[must_use]
    pub fn view_matrix(&self, position: WorldPoint) -> Mat4 {
        let eye = self.eye(position);
        Mat4::look_at_rh(eye, eye + self.forward(), Vec3::Z)
    }

    /// Perspective projection for a viewport of the given aspect ratio.
    #[must_use]
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.settings.fov_y_degrees.to_radians(),
            aspect,
            self.settings.near,
            self.settings.far,
        )
    }
}

/// Classifies a forward vector into the absolute heading it looks toward.
///
/// A heading is reported only when one horizontal component sits strictly
/// inside [`HEADING_BAND`]. Diagonal views fall in a dead zone that keeps
/// `previous`.
#[must_use]
pub fn find_camera_direction(forward: Vec3, previous: Option<Direction>) -> Option<Direction> {
    let in_band = |component: f32| component > -HEADING_BAND && component < HEADING_BAND;

    if in_band(forward.x) && forward.y < 0.0 {
        Some(Direction::Down)
    } else if in_band(forward.x) && forward.y > 0.0 {
        Some(Direction::Up)
    } else if in_band(forward.y) && forward.x > 0.0 {
        Some(Direction::Right)
    } else if in_band(forward.y) && forward.x < 0.0 {
        Some(Direction::Left)
    } else {
        previous
    }
}

/// Pure system that turns mouse motion into view heading commands.
#[derive(Debug)]
pub struct CameraDirector {
    camera: FirstPersonCamera,
    view: Option<Direction>,
}

impl CameraDirector {
    /// Creates a director around a freshly configured camera.
    #[must_use]
    pub fn new(settings: CameraSettings) -> Self {
        Self {
            camera: FirstPersonCamera::new(settings),
            view: None,
        }
    }

    /// Applies the frame's mouse delta and emits the heading when it changes.
    pub fn handle(&mut self, mouse_delta: Vec2, out: &mut Vec<Command>) {
        if mouse_delta != Vec2::ZERO {
            self.camera.apply_mouse_delta(mouse_delta);
        }

        let view = find_camera_direction(self.camera.forward(), self.view);
        if view != self.view {
            debug!(
                ?view,
                yaw = self.camera.yaw_degrees(),
                pitch = self.camera.pitch_degrees(),
                "camera_heading_changed"
            );
            self.view = view;
            if let Some(view) = view {
                out.push(Command::SetViewFacing { view });
            }
        }
    }

    /// Camera driven by this director.
    #[must_use]
    pub fn camera(&self) -> &FirstPersonCamera {
        &self.camera
    }

    /// Most recent heading, once the camera left the dead zone.
    #[must_use]
    pub fn view(&self) -> Option<Direction> {
        self.view
    }
}
