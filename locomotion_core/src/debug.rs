//! Debug annotation requests.
//!
//! The core only builds these and hands them to a [`DebugDraw`] sink within
//! the Update phase. Storage, aging and culling belong to the sink; see
//! [`crate::host::DebugQueue`] for the reference behavior.
//!
//! Duration contract: `0.0` means "this frame only", a positive value is a
//! lifetime in seconds, a negative value means "until cleared". The core
//! itself never emits negative durations.
//!
//! [`DebugDraw`]: crate::host::DebugDraw

use glam::{Mat4, Vec2, Vec3};

use crate::math::Rgba8;

pub const ONE_FRAME: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepthMode {
    UseDepth,
    /// Always visible, drawn through geometry.
    XRay,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DebugShape {
    Point { position: Vec3, radius: f32 },
    Line { start: Vec3, end: Vec3, radius: f32 },
    WireSphere { center: Vec3, radius: f32 },
    WireCylinder { base: Vec3, top: Vec3, radius: f32 },
    Arrow { start: Vec3, end: Vec3, radius: f32 },
    WorldText { text: String, transform: Mat4, height: f32, alignment: Vec2 },
    BillboardText { text: String, origin: Vec3, height: f32, alignment: Vec2 },
    ScreenText { text: String, position: Vec2, size: f32, alignment: Vec2 },
    /// Line in the screen message log.
    Message { text: String },
}

impl DebugShape {
    #[inline]
    pub fn is_screen_space(&self) -> bool {
        matches!(self, DebugShape::ScreenText { .. } | DebugShape::Message { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DebugShape::Point { .. } => "point",
            DebugShape::Line { .. } => "line",
            DebugShape::WireSphere { .. } => "wire-sphere",
            DebugShape::WireCylinder { .. } => "wire-cylinder",
            DebugShape::Arrow { .. } => "arrow",
            DebugShape::WorldText { .. } => "world-text",
            DebugShape::BillboardText { .. } => "billboard-text",
            DebugShape::ScreenText { .. } => "screen-text",
            DebugShape::Message { .. } => "message",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DebugRequest {
    pub shape: DebugShape,
    pub duration: f32,
    pub start_color: Rgba8,
    pub end_color: Rgba8,
    pub mode: DepthMode,
}

impl DebugRequest {
    #[inline]
    pub fn new(shape: DebugShape, duration: f32, start_color: Rgba8, end_color: Rgba8, mode: DepthMode) -> Self {
        Self {
            shape,
            duration,
            start_color,
            end_color,
            mode,
        }
    }

    pub fn point(position: Vec3, radius: f32, duration: f32, start: Rgba8, end: Rgba8, mode: DepthMode) -> Self {
        Self::new(DebugShape::Point { position, radius }, duration, start, end, mode)
    }

    pub fn line(start: Vec3, end: Vec3, radius: f32, duration: f32, c0: Rgba8, c1: Rgba8, mode: DepthMode) -> Self {
        Self::new(DebugShape::Line { start, end, radius }, duration, c0, c1, mode)
    }

    pub fn wire_sphere(center: Vec3, radius: f32, duration: f32, start: Rgba8, end: Rgba8, mode: DepthMode) -> Self {
        Self::new(DebugShape::WireSphere { center, radius }, duration, start, end, mode)
    }

    pub fn wire_cylinder(
        base: Vec3,
        top: Vec3,
        radius: f32,
        duration: f32,
        start: Rgba8,
        end: Rgba8,
        mode: DepthMode,
    ) -> Self {
        Self::new(DebugShape::WireCylinder { base, top, radius }, duration, start, end, mode)
    }

    pub fn arrow(start: Vec3, end: Vec3, radius: f32, duration: f32, color: Rgba8, mode: DepthMode) -> Self {
        Self::new(DebugShape::Arrow { start, end, radius }, duration, color, color, mode)
    }

    pub fn world_text(
        text: impl Into<String>,
        transform: Mat4,
        height: f32,
        alignment: Vec2,
        duration: f32,
        color: Rgba8,
    ) -> Self {
        let shape = DebugShape::WorldText {
            text: text.into(),
            transform,
            height,
            alignment,
        };
        Self::new(shape, duration, color, color, DepthMode::UseDepth)
    }

    pub fn billboard_text(
        text: impl Into<String>,
        origin: Vec3,
        height: f32,
        alignment: Vec2,
        duration: f32,
        start: Rgba8,
        end: Rgba8,
    ) -> Self {
        let shape = DebugShape::BillboardText {
            text: text.into(),
            origin,
            height,
            alignment,
        };
        Self::new(shape, duration, start, end, DepthMode::UseDepth)
    }

    pub fn screen_text(text: impl Into<String>, position: Vec2, size: f32, alignment: Vec2, duration: f32) -> Self {
        let shape = DebugShape::ScreenText {
            text: text.into(),
            position,
            size,
            alignment,
        };
        Self::new(shape, duration, Rgba8::WHITE, Rgba8::WHITE, DepthMode::XRay)
    }

    pub fn message(text: impl Into<String>, duration: f32, start: Rgba8, end: Rgba8) -> Self {
        Self::new(DebugShape::Message { text: text.into() }, duration, start, end, DepthMode::XRay)
    }

    #[inline]
    pub fn is_one_frame(&self) -> bool {
        self.duration == 0.0
    }

    #[inline]
    pub fn is_persistent(&self) -> bool {
        self.duration < 0.0
    }
}
