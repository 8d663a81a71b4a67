//! Small math vocabulary shared by the core.
//!
//! Vectors and matrices come from `glam`; this module only adds the world
//! convention (X forward, Y left, Z up), Euler angles in degrees and an 8-bit
//! color.

use glam::{Mat4, Vec2, Vec3};

pub const WORLD_UP: Vec3 = Vec3::Z;

/// Yaw about +Z, pitch about +Y, roll about +X. Degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerAngles {
    pub yaw_degrees: f32,
    pub pitch_degrees: f32,
    pub roll_degrees: f32,
}

impl EulerAngles {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(yaw_degrees: f32, pitch_degrees: f32, roll_degrees: f32) -> Self {
        Self {
            yaw_degrees,
            pitch_degrees,
            roll_degrees,
        }
    }

    /// Returns the (forward, left, up) basis for these angles.
    pub fn to_vectors_x_fwd_y_left_z_up(&self) -> (Vec3, Vec3, Vec3) {
        let (sy, cy) = self.yaw_degrees.to_radians().sin_cos();
        let (sp, cp) = self.pitch_degrees.to_radians().sin_cos();
        let (sr, cr) = self.roll_degrees.to_radians().sin_cos();

        let forward = Vec3::new(cy * cp, sy * cp, -sp);
        let left = Vec3::new(
            cy * sp * sr - sy * cr,
            sy * sp * sr + cy * cr,
            cp * sr,
        );
        let up = Vec3::new(
            cy * sp * cr + sy * sr,
            sy * sp * cr - cy * sr,
            cp * cr,
        );

        (forward, left, up)
    }

    #[inline]
    pub fn to_matrix_x_fwd_y_left_z_up(&self) -> Mat4 {
        let (i, j, k) = self.to_vectors_x_fwd_y_left_z_up();
        Mat4::from_cols(i.extend(0.0), j.extend(0.0), k.extend(0.0), glam::Vec4::W)
    }

    /// Component-wise `self + rate * seconds`, no wrapping.
    #[inline]
    pub fn integrated(&self, rate: &EulerAngles, seconds: f32) -> Self {
        Self {
            yaw_degrees: self.yaw_degrees + rate.yaw_degrees * seconds,
            pitch_degrees: self.pitch_degrees + rate.pitch_degrees * seconds,
            roll_degrees: self.roll_degrees + rate.roll_degrees * seconds,
        }
    }
}

/// Model matrix from orientation and translation.
#[inline]
pub fn model_matrix(position: Vec3, orientation: &EulerAngles) -> Mat4 {
    let mut m = orientation.to_matrix_x_fwd_y_left_z_up();
    m.w_axis = position.extend(1.0);
    m
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const CYAN: Self = Self::rgb(0, 255, 255);
    pub const MAGENTA: Self = Self::rgb(255, 0, 255);
    pub const YELLOW: Self = Self::rgb(255, 255, 0);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    #[inline]
    pub const fn grey(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    /// Channel-wise linear blend; `t` is clamped to [0, 1].
    pub fn lerp(self, other: Self, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| -> u8 {
            let v = a as f32 + (b as f32 - a as f32) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Self::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            mix(self.a, other.a),
        )
    }
}

impl Default for Rgba8 {
    #[inline]
    fn default() -> Self {
        Self::WHITE
    }
}

/// Position / color / uv vertex handed to the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
    pub color: Rgba8,
    pub uv: Vec2,
}

impl Vertex {
    #[inline]
    pub const fn new(position: Vec3, color: Rgba8, uv: Vec2) -> Self {
        Self {
            position,
            color,
            uv,
        }
    }
}

#[inline]
pub fn range_map(value: f32, in_start: f32, in_end: f32, out_start: f32, out_end: f32) -> f32 {
    let span = in_end - in_start;
    if span == 0.0 {
        return out_start;
    }
    let t = (value - in_start) / span;
    out_start + t * (out_end - out_start)
}
