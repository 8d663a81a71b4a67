//! External collaborators consumed by the core.
//!
//! The core never owns a window, a GPU or an input device. Everything it needs
//! from the outside world goes through these traits, bundled in [`Host`] and
//! handed to [`crate::App::new`]. The submodules hold reference
//! implementations used by headless runs and tests.

pub mod debug_queue;
pub mod headless;
pub mod input;

use glam::{IVec2, Mat4, Vec2, Vec3};

use crate::camera::Camera;
use crate::debug::DebugRequest;
use crate::math::{Rgba8, Vertex};

pub use debug_queue::{DebugQueue, SharedDebugQueue, VisibleRequest};
pub use headless::{HeadlessConsole, HeadlessHandles, HeadlessWindow, NullRenderer, PlaceholderMeshBuilder, RenderStats};
pub use input::{ControllerButton, ControllerState, InputState, Key, SharedInput};

/// Opaque texture handle; the texture cache lives in the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}

    fn clear_screen(&mut self, color: Rgba8);
    fn begin_camera(&mut self, camera: &Camera);
    fn end_camera(&mut self, camera: &Camera);

    fn bind_texture(&mut self, texture: Option<TextureId>);
    fn set_model_constants(&mut self, model: Mat4, tint: Rgba8);
    fn draw_vertices(&mut self, vertices: &[Vertex]);

    /// Texture cache lookup; `None` when the file cannot be provided.
    fn create_or_get_texture(&mut self, path: &str) -> Option<TextureId>;
}

/// Sink for [`DebugRequest`]s. Owns storage and expiry.
pub trait DebugDraw {
    /// `delta_seconds` is the root clock delta used to age timed requests.
    fn begin_frame(&mut self, delta_seconds: f32);
    fn end_frame(&mut self);

    fn add(&mut self, request: DebugRequest);
    fn clear(&mut self);

    fn render_world(&mut self, camera: &Camera);
    fn render_screen(&mut self, camera: &Camera);
}

pub trait Input {
    /// Refreshes the per-frame snapshot (latches cursor motion).
    fn begin_frame(&mut self) {}
    /// Retires edge state (just-pressed keys and buttons, cursor delta).
    fn end_frame(&mut self) {}

    fn is_key_down(&self, key: Key) -> bool;
    fn was_key_just_pressed(&self, key: Key) -> bool;
    fn controller(&self, index: usize) -> ControllerState;
    fn cursor_client_delta(&self) -> IVec2;
    fn set_cursor_mode(&mut self, hidden: bool, relative: bool);
}

pub trait WindowHost {
    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}

    fn has_focus(&self) -> bool;
    fn client_aspect(&self) -> f32;
}

/// Interactive developer console.
pub trait Console {
    fn begin_frame(&mut self) {}
    fn end_frame(&mut self) {}

    fn is_open(&self) -> bool;
    fn render(&mut self, camera: &Camera);

    /// Appends a line to the scrollback.
    fn add_line(&mut self, _color: Rgba8, _text: &str) {}
}

/// Procedural vertex generation. Every mesh is local-space.
pub trait MeshBuilder {
    /// Axis-aligned box centered at the origin; faces in +x, -x, +y, -y, +z, -z order.
    fn cube(&self, half_extents: Vec3, face_colors: [Rgba8; 6]) -> Vec<Vertex>;
    fn uv_sphere(&self, radius: f32, color: Rgba8, slices: u32) -> Vec<Vertex>;
    fn aabb3(&self, mins: Vec3, maxs: Vec3, color: Rgba8) -> Vec<Vertex>;
    fn aabb2(&self, mins: Vec2, maxs: Vec2, color: Rgba8) -> Vec<Vertex>;
    fn ring2d(&self, center: Vec2, radius: f32, thickness: f32, color: Rgba8) -> Vec<Vertex>;
}

/// Context object carrying every collaborator.
pub struct Host {
    /// `None` means rendering is unavailable; the Render phase becomes a no-op.
    pub renderer: Option<Box<dyn Renderer>>,
    pub debug: Box<dyn DebugDraw>,
    pub input: Box<dyn Input>,
    pub window: Box<dyn WindowHost>,
    pub console: Box<dyn Console>,
    pub meshes: Box<dyn MeshBuilder>,
}
