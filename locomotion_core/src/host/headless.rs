//! Collaborators for running the core without a window or GPU.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use glam::{Mat4, Vec2, Vec3};

use crate::camera::Camera;
use crate::math::{Rgba8, Vertex};

use super::{
    Console, DebugDraw, Host, Input, MeshBuilder, Renderer, SharedDebugQueue, SharedInput, TextureId, WindowHost,
};

/// Counters accumulated by [`NullRenderer`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderStats {
    pub frames: u64,
    pub clears: u64,
    pub last_clear: Option<Rgba8>,
    pub cameras: u64,
    pub draw_calls: u64,
    pub vertices: u64,
    pub textures_bound: u64,
    pub last_model: Option<Mat4>,
}

/// Renderer that records what it was asked to do and draws nothing.
#[derive(Debug, Clone, Default)]
pub struct NullRenderer {
    stats: Rc<RefCell<RenderStats>>,
    textures: HashMap<String, TextureId>,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared view of the counters; stays valid after the renderer is boxed.
    #[inline]
    pub fn stats(&self) -> Rc<RefCell<RenderStats>> {
        Rc::clone(&self.stats)
    }
}

impl Renderer for NullRenderer {
    fn begin_frame(&mut self) {
        self.stats.borrow_mut().frames += 1;
    }

    fn clear_screen(&mut self, color: Rgba8) {
        let mut s = self.stats.borrow_mut();
        s.clears += 1;
        s.last_clear = Some(color);
    }

    fn begin_camera(&mut self, _camera: &Camera) {
        self.stats.borrow_mut().cameras += 1;
    }

    fn end_camera(&mut self, _camera: &Camera) {}

    fn bind_texture(&mut self, texture: Option<TextureId>) {
        if texture.is_some() {
            self.stats.borrow_mut().textures_bound += 1;
        }
    }

    fn set_model_constants(&mut self, model: Mat4, _tint: Rgba8) {
        self.stats.borrow_mut().last_model = Some(model);
    }

    fn draw_vertices(&mut self, vertices: &[Vertex]) {
        let mut s = self.stats.borrow_mut();
        s.draw_calls += 1;
        s.vertices += vertices.len() as u64;
    }

    fn create_or_get_texture(&mut self, path: &str) -> Option<TextureId> {
        let next = TextureId(self.textures.len() as u32 + 1);
        Some(*self.textures.entry(path.to_owned()).or_insert(next))
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessWindow {
    focus: Rc<Cell<bool>>,
    aspect: f32,
}

impl HeadlessWindow {
    pub fn new(aspect: f32) -> Self {
        Self {
            focus: Rc::new(Cell::new(true)),
            aspect,
        }
    }

    #[inline]
    pub fn focus_handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.focus)
    }
}

impl WindowHost for HeadlessWindow {
    fn has_focus(&self) -> bool {
        self.focus.get()
    }

    fn client_aspect(&self) -> f32 {
        self.aspect
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessConsole {
    open: Rc<Cell<bool>>,
    renders: Rc<Cell<u64>>,
    lines: Rc<RefCell<Vec<String>>>,
}

impl HeadlessConsole {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn open_handle(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.open)
    }

    #[inline]
    pub fn render_count(&self) -> Rc<Cell<u64>> {
        Rc::clone(&self.renders)
    }

    #[inline]
    pub fn lines(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.lines)
    }
}

impl Console for HeadlessConsole {
    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn render(&mut self, _camera: &Camera) {
        self.renders.set(self.renders.get() + 1);
    }

    fn add_line(&mut self, _color: Rgba8, text: &str) {
        self.lines.borrow_mut().push(text.to_owned());
    }
}

/// Emits only the bounding corners of each shape.
///
/// Enough to exercise the draw path; real triangulation lives with the
/// platform front end.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderMeshBuilder;

fn corners(mins: Vec3, maxs: Vec3, color: Rgba8) -> Vec<Vertex> {
    vec![
        Vertex::new(mins, color, Vec2::ZERO),
        Vertex::new(Vec3::new(maxs.x, mins.y, mins.z), color, Vec2::X),
        Vertex::new(maxs, color, Vec2::ONE),
    ]
}

impl MeshBuilder for PlaceholderMeshBuilder {
    fn cube(&self, half_extents: Vec3, face_colors: [Rgba8; 6]) -> Vec<Vertex> {
        face_colors
            .iter()
            .flat_map(|&c| corners(-half_extents, half_extents, c))
            .collect()
    }

    fn uv_sphere(&self, radius: f32, color: Rgba8, _slices: u32) -> Vec<Vertex> {
        corners(Vec3::splat(-radius), Vec3::splat(radius), color)
    }

    fn aabb3(&self, mins: Vec3, maxs: Vec3, color: Rgba8) -> Vec<Vertex> {
        corners(mins, maxs, color)
    }

    fn aabb2(&self, mins: Vec2, maxs: Vec2, color: Rgba8) -> Vec<Vertex> {
        corners(mins.extend(0.0), maxs.extend(0.0), color)
    }

    fn ring2d(&self, center: Vec2, radius: f32, thickness: f32, color: Rgba8) -> Vec<Vertex> {
        let outer = radius + thickness * 0.5;
        corners((center - outer).extend(0.0), (center + outer).extend(0.0), color)
    }
}

/// Outside handles to a headless [`Host`].
#[derive(Debug, Clone)]
pub struct HeadlessHandles {
    pub input: SharedInput,
    pub debug: SharedDebugQueue,
    pub render: Rc<RefCell<RenderStats>>,
    pub focus: Rc<Cell<bool>>,
    pub console_open: Rc<Cell<bool>>,
    pub console_renders: Rc<Cell<u64>>,
    pub console_lines: Rc<RefCell<Vec<String>>>,
}

impl Host {
    /// A complete host with no platform attached, plus the handles to drive it.
    pub fn headless(client_aspect: f32) -> (Self, HeadlessHandles) {
        let input = SharedInput::new();
        let debug = SharedDebugQueue::new();
        let renderer = NullRenderer::new();
        let window = HeadlessWindow::new(client_aspect);
        let console = HeadlessConsole::new();

        let handles = HeadlessHandles {
            input: input.clone(),
            debug: debug.clone(),
            render: renderer.stats(),
            focus: window.focus_handle(),
            console_open: console.open_handle(),
            console_renders: console.render_count(),
            console_lines: console.lines(),
        };

        let host = Host {
            renderer: Some(Box::new(renderer) as Box<dyn Renderer>),
            debug: Box::new(debug) as Box<dyn DebugDraw>,
            input: Box::new(input) as Box<dyn Input>,
            window: Box::new(window),
            console: Box::new(console),
            meshes: Box::new(PlaceholderMeshBuilder),
        };
        (host, handles)
    }

    /// Same as [`Host::headless`] but without a renderer.
    pub fn headless_without_renderer(client_aspect: f32) -> (Self, HeadlessHandles) {
        let (mut host, handles) = Self::headless(client_aspect);
        host.renderer = None;
        (host, handles)
    }
}
