use std::cell::RefCell;
use std::rc::Rc;

use crate::camera::Camera;
use crate::debug::{DebugRequest, DebugShape};
use crate::math::Rgba8;

use super::DebugDraw;

#[derive(Debug, Clone)]
struct Entry {
    request: DebugRequest,
    remaining: f32,
}

impl Entry {
    /// Current color: start at spawn, end at expiry.
    fn color(&self) -> Rgba8 {
        let r = &self.request;
        if r.duration <= 0.0 {
            return r.start_color;
        }
        let t = 1.0 - (self.remaining / r.duration);
        r.start_color.lerp(r.end_color, t)
    }
}

/// A request as it would be drawn this frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibleRequest {
    pub shape: DebugShape,
    pub color: Rgba8,
}

/// Reference storage for debug annotations.
///
/// * duration `== 0`: visible for exactly one rendered frame, dropped at
///   [`DebugQueue::end_frame`].
/// * duration `< 0`: kept until [`DebugQueue::clear`].
/// * duration `> 0`: aged by the delta passed to
///   [`DebugQueue::begin_frame`], dropped once the remaining time is `<= 0`.
#[derive(Debug, Default)]
pub struct DebugQueue {
    entries: Vec<Entry>,
    last_world: Vec<VisibleRequest>,
    last_screen: Vec<VisibleRequest>,
}

impl DebugQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_frame(&mut self, delta_seconds: f32) {
        let dt = delta_seconds.max(0.0);
        for e in &mut self.entries {
            if e.request.duration > 0.0 {
                e.remaining -= dt;
            }
        }
        self.entries
            .retain(|e| e.request.duration <= 0.0 || e.remaining > 0.0);
    }

    pub fn end_frame(&mut self) {
        // A zero-duration request lives through one render; if no render
        // happened (no renderer, quitting) it still dies here.
        self.entries.retain(|e| e.request.duration != 0.0);
    }

    pub fn add(&mut self, request: DebugRequest) {
        let remaining = request.duration;
        self.entries.push(Entry { request, remaining });
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn requests(&self) -> impl Iterator<Item = &DebugRequest> {
        self.entries.iter().map(|e| &e.request)
    }

    /// World-space requests seen by the most recent world pass.
    #[inline]
    pub fn last_world(&self) -> &[VisibleRequest] {
        &self.last_world
    }

    /// Screen-space requests seen by the most recent screen pass.
    #[inline]
    pub fn last_screen(&self) -> &[VisibleRequest] {
        &self.last_screen
    }

    pub fn render_world(&mut self, _camera: &Camera) {
        self.last_world = self.collect(false);
    }

    pub fn render_screen(&mut self, _camera: &Camera) {
        self.last_screen = self.collect(true);
    }

    fn collect(&self, screen: bool) -> Vec<VisibleRequest> {
        self.entries
            .iter()
            .filter(|e| e.request.shape.is_screen_space() == screen)
            .map(|e| VisibleRequest {
                shape: e.request.shape.clone(),
                color: e.color(),
            })
            .collect()
    }
}

/// [`DebugDraw`] over a shared [`DebugQueue`]; clones observe the same queue.
#[derive(Debug, Clone, Default)]
pub struct SharedDebugQueue(Rc<RefCell<DebugQueue>>);

impl SharedDebugQueue {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&DebugQueue) -> R) -> R {
        f(&self.0.borrow())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

impl DebugDraw for SharedDebugQueue {
    fn begin_frame(&mut self, delta_seconds: f32) {
        self.0.borrow_mut().begin_frame(delta_seconds);
    }

    fn end_frame(&mut self) {
        self.0.borrow_mut().end_frame();
    }

    fn add(&mut self, request: DebugRequest) {
        self.0.borrow_mut().add(request);
    }

    fn clear(&mut self) {
        self.0.borrow_mut().clear();
    }

    fn render_world(&mut self, camera: &Camera) {
        self.0.borrow_mut().render_world(camera);
    }

    fn render_screen(&mut self, camera: &Camera) {
        self.0.borrow_mut().render_screen(camera);
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec3};

    use super::*;
    use crate::debug::DepthMode;

    fn sphere(duration: f32) -> DebugRequest {
        DebugRequest::wire_sphere(Vec3::ZERO, 0.5, duration, Rgba8::GREEN, Rgba8::RED, DepthMode::UseDepth)
    }

    fn cam() -> Camera {
        Camera::orthographic(Vec2::ZERO, Vec2::new(1600.0, 800.0))
    }

    /// One full frame: age, render both passes, retire.
    fn frame(q: &mut DebugQueue, dt: f32) {
        q.begin_frame(dt);
        q.render_world(&cam());
        q.render_screen(&cam());
        q.end_frame();
    }

    #[test]
    fn one_frame_request_renders_once() {
        let mut q = DebugQueue::new();
        q.begin_frame(0.016);
        q.add(sphere(0.0));
        q.render_world(&cam());
        assert_eq!(q.last_world().len(), 1);
        q.end_frame();
        assert!(q.is_empty());

        frame(&mut q, 0.016);
        assert!(q.last_world().is_empty());
    }

    #[test]
    fn timed_request_expires_after_its_duration() {
        let mut q = DebugQueue::new();
        q.add(sphere(5.0));
        for _ in 0..4 {
            frame(&mut q, 1.0);
        }
        assert_eq!(q.len(), 1);
        frame(&mut q, 1.0);
        assert!(q.is_empty());
    }

    #[test]
    fn persistent_request_survives_until_clear() {
        let mut q = DebugQueue::new();
        q.add(sphere(-1.0));
        for _ in 0..100 {
            frame(&mut q, 1.0);
        }
        assert_eq!(q.len(), 1);
        q.clear();
        assert!(q.is_empty());
    }

    #[test]
    fn color_moves_from_start_to_end() {
        let mut q = DebugQueue::new();
        q.add(sphere(2.0));
        q.begin_frame(0.0);
        q.render_world(&cam());
        assert_eq!(q.last_world()[0].color, Rgba8::GREEN);
        q.end_frame();

        q.begin_frame(1.0);
        q.render_world(&cam());
        let halfway = q.last_world()[0].color;
        assert!(halfway.r > 100 && halfway.g > 100);
    }

    #[test]
    fn screen_and_world_passes_split_by_shape() {
        let mut q = DebugQueue::new();
        q.begin_frame(0.0);
        q.add(sphere(0.0));
        q.add(DebugRequest::screen_text("hud", Vec2::ZERO, 15.0, Vec2::ZERO, 0.0));
        q.add(DebugRequest::message("hello", 5.0, Rgba8::WHITE, Rgba8::RED));
        q.render_world(&cam());
        q.render_screen(&cam());
        assert_eq!(q.last_world().len(), 1);
        assert_eq!(q.last_screen().len(), 2);
        q.end_frame();
        assert_eq!(q.len(), 1);
    }
}
