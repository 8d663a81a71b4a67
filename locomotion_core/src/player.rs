use std::any::Any;

use glam::{Vec3, Vec4};

use crate::camera::Camera;
use crate::config::CameraConfig;
use crate::entity::{Entity, EntityCtx, EntityState, ScopeId};
use crate::host::{Input, Key, Renderer};
use crate::math::WORLD_UP;

pub const MOVE_SPEED: f32 = 4.0;
pub const FAST_MOVE_MULTIPLIER: f32 = 10.0;
/// Degrees of rotation per pixel of cursor motion.
pub const LOOK_SENSITIVITY: f32 = 0.1;
pub const PITCH_LIMIT_DEGREES: f32 = 89.9;

/// The controllable viewpoint of Play mode. Draws nothing itself.
pub struct Player {
    state: EntityState,
    camera: Camera,
}

impl Player {
    pub fn new(scope: ScopeId, position: Vec3, client_aspect: f32, cfg: &CameraConfig) -> Self {
        let mut camera = Camera::perspective(client_aspect, cfg.fov_degrees, cfg.near, cfg.far);
        // World X-forward/Y-left/Z-up into render Z-forward/X-right/Y-up.
        camera.set_render_basis(Vec3::Z, -Vec3::X, Vec3::Y);

        let state = EntityState::new(scope, position);
        camera.set_transform(state.position, state.orientation);
        Self { state, camera }
    }

    #[inline]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    fn speed(input: &dyn Input) -> f32 {
        if input.is_key_down(Key::Shift) {
            MOVE_SPEED * FAST_MOVE_MULTIPLIER
        } else {
            MOVE_SPEED
        }
    }

    fn update_vertical(&mut self, input: &dyn Input, dt: f32) {
        let mut intent = Vec3::ZERO;
        if input.is_key_down(Key::Q) {
            intent -= WORLD_UP;
        }
        if input.is_key_down(Key::E) {
            intent += WORLD_UP;
        }
        self.state.position += intent * Self::speed(input) * dt;
    }

    fn update_horizontal(&mut self, input: &dyn Input, dt: f32) {
        let (forward, left, _) = self.state.orientation.to_vectors_x_fwd_y_left_z_up();
        let forward = Vec3::new(forward.x, forward.y, 0.0).normalize_or_zero();
        let left = Vec3::new(left.x, left.y, 0.0).normalize_or_zero();

        let mut intent = Vec3::ZERO;
        if input.is_key_down(Key::W) {
            intent += forward;
        }
        if input.is_key_down(Key::S) {
            intent -= forward;
        }
        if input.is_key_down(Key::A) {
            intent += left;
        }
        if input.is_key_down(Key::D) {
            intent -= left;
        }
        self.state.position += intent * Self::speed(input) * dt;
    }

    fn update_orientation(&mut self, input: &mut dyn Input) {
        input.set_cursor_mode(true, true);

        let delta = input.cursor_client_delta();
        let o = &mut self.state.orientation;
        o.yaw_degrees -= delta.x as f32 * LOOK_SENSITIVITY;
        o.pitch_degrees =
            (o.pitch_degrees + delta.y as f32 * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT_DEGREES, PITCH_LIMIT_DEGREES);
    }
}

impl Entity for Player {
    fn update(&mut self, ctx: &mut EntityCtx<'_>, delta_seconds: f32) {
        if ctx.has_control() {
            self.update_vertical(ctx.input, delta_seconds);
            self.update_horizontal(ctx.input, delta_seconds);
            self.update_orientation(ctx.input);
        } else if !ctx.window.has_focus() {
            ctx.input.set_cursor_mode(false, false);
        }

        self.camera.set_transform(self.state.position, self.state.orientation);
    }

    fn render(&self, _renderer: &mut dyn Renderer) {}

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Point `distance` units along the player's forward axis.
pub fn point_ahead(state: &EntityState, distance: f32) -> Vec3 {
    let m = state.model_matrix();
    (m * Vec4::new(distance, 0.0, 0.0, 1.0)).truncate()
}
