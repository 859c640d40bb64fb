#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Maze Chase adapters.
//!
//! The simulation never talks to a graphics API directly. It hands meshes and
//! per-entity transforms to a [`RenderCollaborator`] and reads movement keys
//! and mouse motion from an [`InputCollaborator`]. Backends implement both and
//! drive the frame loop through [`RenderingBackend`].

mod geometry;
mod presenter;

use std::time::Duration;

use anyhow::Result as AnyResult;
use glam::{Mat4, Vec2, Vec3};
use maze_chase_core::LogicalKey;
use maze_chase_system_round::FrameInput;
use thiserror::Error;

pub use geometry::{
    pellet_mesh, sprite_quad, wall_mesh, PELLET_HEIGHT, SHEET_COLUMNS, SHEET_ROWS, WALL_HEIGHT,
};
pub use presenter::FramePresenter;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Single vertex of an uploaded mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vertex {
    /// Position in model space. Z points up.
    pub position: Vec3,
    /// Texture coordinate on the sprite sheet or wall texture.
    pub uv: Vec2,
    /// Vertex color, used as a tint when textured.
    pub color: Color,
}

/// How the indices of a mesh are assembled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Primitive {
    /// Every three indices form a triangle.
    Triangles,
    /// Every index is a point.
    Points,
}

/// Geometry handed to a render collaborator.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    /// Assembly of the index list.
    pub primitive: Primitive,
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of primitives the index list describes.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match self.primitive {
            Primitive::Triangles => self.indices.len() / 3,
            Primitive::Points => self.indices.len(),
        }
    }

    /// Reports whether the mesh draws nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Opaque identifier of geometry uploaded to a collaborator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(u32);

impl GeometryHandle {
    /// Creates a handle with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Failures reported by render collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RenderError {
    /// The mesh holds more vertices than the backend can index.
    #[error("mesh with {vertices} vertices exceeds the backend index range")]
    IndexOverflow {
        /// Vertex count of the rejected mesh.
        vertices: usize,
    },
    /// The handle does not name live geometry.
    #[error("unknown geometry handle {handle:?}")]
    UnknownHandle {
        /// Handle passed by the caller.
        handle: GeometryHandle,
    },
    /// The backend could not accept the geometry.
    #[error("geometry upload failed: {reason}")]
    UploadFailed {
        /// Backend-specific description.
        reason: String,
    },
}

/// Graphics services the presenter relies on.
///
/// The presenter only pushes data; it never reads anything back.
pub trait RenderCollaborator {
    /// Stores a mesh and returns a handle for drawing it.
    fn upload_geometry(&mut self, mesh: &Mesh) -> Result<GeometryHandle, RenderError>;

    /// Draws `primitive_count` primitives of previously uploaded geometry.
    fn bind_and_draw(
        &mut self,
        handle: GeometryHandle,
        primitive_count: usize,
    ) -> Result<(), RenderError>;

    /// Places the geometry for the following draw: a translation on the
    /// maze plane and a rotation about the vertical axis, in radians.
    fn set_entity_transform(&mut self, handle: GeometryHandle, offset: Vec2, rotation: f32);

    /// Sets the camera used for subsequent draws.
    fn set_camera_matrices(&mut self, view: Mat4, projection: Mat4);

    /// Frees geometry that will not be drawn again.
    fn release_geometry(&mut self, handle: GeometryHandle);
}

/// Input services the frame loop relies on.
pub trait InputCollaborator {
    /// Reports whether the key bound to the logical key is held.
    fn is_key_down(&self, key: LogicalKey) -> bool;

    /// Mouse motion since the previous call, in screen pixels.
    fn take_mouse_delta(&mut self) -> Vec2;
}

/// Folds the collaborator's current state into a frame input.
pub fn poll_input<I>(input: &mut I, dt: Duration) -> FrameInput
where
    I: InputCollaborator + ?Sized,
{
    let pressed = LogicalKey::PROCESSING_ORDER
        .into_iter()
        .filter(|key| input.is_key_down(*key))
        .collect();
    FrameInput {
        pressed,
        mouse_delta: input.take_mouse_delta(),
        dt,
    }
}

/// Whether the frame loop should keep running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    /// Present another frame.
    Continue,
    /// Close the window and return.
    Exit,
}

/// Window description consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Requested window width in pixels.
    pub width: u32,
    /// Requested window height in pixels.
    pub height: u32,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, width: u32, height: u32) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            width,
            height,
        }
    }

    /// Width over height of the requested window.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// Callback invoked once per frame by a backend.
///
/// It receives the frame delta, the backend as input and render collaborator,
/// and the current viewport aspect ratio.
pub type FrameCallback = Box<
    dyn FnMut(Duration, &mut dyn InputCollaborator, &mut dyn RenderCollaborator, f32) -> LoopControl,
>;

/// Rendering backend capable of presenting Maze Chase rounds.
pub trait RenderingBackend {
    /// Runs the backend until the callback or the user requests an exit.
    fn run(self, presentation: Presentation, frame: FrameCallback) -> AnyResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_chase_core::PressedKeys;

    struct Scripted {
        held: Vec<LogicalKey>,
        delta: Vec2,
    }

    impl InputCollaborator for Scripted {
        fn is_key_down(&self, key: LogicalKey) -> bool {
            self.held.contains(&key)
        }

        fn take_mouse_delta(&mut self) -> Vec2 {
            std::mem::take(&mut self.delta)
        }
    }

    #[test]
    fn poll_input_collects_keys_and_drains_mouse() {
        let mut input = Scripted {
            held: vec![LogicalKey::StrafeLeft, LogicalKey::Forward],
            delta: Vec2::new(3.0, -2.0),
        };
        let frame = poll_input(&mut input, Duration::from_millis(16));
        let expected: PressedKeys = [LogicalKey::Forward, LogicalKey::StrafeLeft]
            .into_iter()
            .collect();
        assert_eq!(frame.pressed, expected);
        assert_eq!(frame.mouse_delta, Vec2::new(3.0, -2.0));

        let next = poll_input(&mut input, Duration::from_millis(16));
        assert_eq!(next.mouse_delta, Vec2::ZERO);
    }

    #[test]
    fn primitive_count_follows_assembly() {
        let vertex = Vertex {
            position: Vec3::ZERO,
            uv: Vec2::ZERO,
            color: Color::from_rgb_u8(255, 255, 0),
        };
        let points = Mesh {
            primitive: Primitive::Points,
            vertices: vec![vertex; 2],
            indices: vec![0, 1],
        };
        assert_eq!(points.primitive_count(), 2);
        let triangles = Mesh {
            primitive: Primitive::Triangles,
            vertices: vec![vertex; 4],
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        assert_eq!(triangles.primitive_count(), 2);
    }

    #[test]
    fn aspect_guards_zero_height() {
        let presentation = Presentation::new("maze", Color::new(0.0, 0.0, 0.0, 1.0), 640, 0);
        assert_eq!(presentation.aspect(), 640.0);
    }
}
