use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::math::{model_matrix, EulerAngles};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Orthographic { bottom_left: Vec2, top_right: Vec2, near: f32, far: f32 },
    Perspective { aspect: f32, fov_degrees: f32, near: f32, far: f32 },
}

/// CPU-side camera: projection, world transform and the basis remap into the
/// render backend's axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    projection: Projection,
    position: Vec3,
    orientation: EulerAngles,
    render_i: Vec3,
    render_j: Vec3,
    render_k: Vec3,
}

impl Camera {
    pub fn orthographic(bottom_left: Vec2, top_right: Vec2) -> Self {
        Self::with_projection(Projection::Orthographic {
            bottom_left,
            top_right,
            near: 0.0,
            far: 1.0,
        })
    }

    pub fn perspective(aspect: f32, fov_degrees: f32, near: f32, far: f32) -> Self {
        Self::with_projection(Projection::Perspective {
            aspect: aspect.max(f32::EPSILON),
            fov_degrees,
            near,
            far,
        })
    }

    fn with_projection(projection: Projection) -> Self {
        Self {
            projection,
            position: Vec3::ZERO,
            orientation: EulerAngles::ZERO,
            render_i: Vec3::X,
            render_j: Vec3::Y,
            render_k: Vec3::Z,
        }
    }

    /// Where the world i/j/k axes land in render space.
    pub fn set_render_basis(&mut self, i: Vec3, j: Vec3, k: Vec3) {
        self.render_i = i;
        self.render_j = j;
        self.render_k = k;
    }

    #[inline]
    pub fn set_transform(&mut self, position: Vec3, orientation: EulerAngles) {
        self.position = position;
        self.orientation = orientation;
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    #[inline]
    pub fn orientation(&self) -> EulerAngles {
        self.orientation
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// Bounds of an orthographic camera; `None` for perspective.
    pub fn ortho_bounds(&self) -> Option<(Vec2, Vec2)> {
        match self.projection {
            Projection::Orthographic { bottom_left, top_right, .. } => Some((bottom_left, top_right)),
            Projection::Perspective { .. } => None,
        }
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        model_matrix(self.position, &self.orientation).inverse()
    }

    #[inline]
    pub fn render_matrix(&self) -> Mat4 {
        Mat4::from_cols(
            self.render_i.extend(0.0),
            self.render_j.extend(0.0),
            self.render_k.extend(0.0),
            Vec4::W,
        )
    }

    /// Projection including the render basis remap.
    pub fn projection_matrix(&self) -> Mat4 {
        let proj = match self.projection {
            Projection::Orthographic { bottom_left, top_right, near, far } => Mat4::orthographic_lh(
                bottom_left.x,
                top_right.x,
                bottom_left.y,
                top_right.y,
                near,
                far,
            ),
            Projection::Perspective { aspect, fov_degrees, near, far } => {
                Mat4::perspective_lh(fov_degrees.to_radians(), aspect, near, far)
            }
        };
        proj * self.render_matrix()
    }

    #[inline]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
