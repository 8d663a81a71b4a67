use std::any::Any;

use glam::Vec3;

use crate::entity::{Entity, EntityCtx, EntityState, ScopeId};
use crate::host::{Renderer, TextureId};
use crate::math::{EulerAngles, Vertex};

/// Static mesh that spins at its angular velocity.
pub struct Prop {
    state: EntityState,
    mesh: Vec<Vertex>,
    texture: Option<TextureId>,
}

impl Prop {
    pub fn new(scope: ScopeId, position: Vec3, mesh: Vec<Vertex>) -> Self {
        Self {
            state: EntityState::new(scope, position),
            mesh,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: Option<TextureId>) -> Self {
        self.texture = texture;
        self
    }

    pub fn with_angular_velocity(mut self, rate: EulerAngles) -> Self {
        self.state.angular_velocity = rate;
        self
    }

    #[inline]
    pub fn mesh(&self) -> &[Vertex] {
        &self.mesh
    }

    #[inline]
    pub fn texture(&self) -> Option<TextureId> {
        self.texture
    }
}

impl Entity for Prop {
    fn update(&mut self, _ctx: &mut EntityCtx<'_>, delta_seconds: f32) {
        let s = &mut self.state;
        s.orientation = s.orientation.integrated(&s.angular_velocity, delta_seconds);
    }

    fn render(&self, renderer: &mut dyn Renderer) {
        renderer.set_model_constants(self.state.model_matrix(), self.state.color);
        renderer.bind_texture(self.texture);
        renderer.draw_vertices(&self.mesh);
    }

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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HeadlessConsole, HeadlessWindow, NullRenderer, SharedInput};

    #[test]
    fn orientation_integrates_without_wrapping() {
        let mut prop = Prop::new(ScopeId(1), Vec3::ZERO, Vec::new())
            .with_angular_velocity(EulerAngles::new(45.0, 30.0, 30.0));

        let mut input = SharedInput::new();
        let window = HeadlessWindow::new(2.0);
        let console = HeadlessConsole::new();
        let mut ctx = EntityCtx {
            input: &mut input,
            window: &window,
            console: &console,
        };
        for _ in 0..10 {
            prop.update(&mut ctx, 1.0);
        }

        let o = prop.state().orientation;
        assert_eq!(o.yaw_degrees, 450.0);
        assert_eq!(o.pitch_degrees, 300.0);
        assert_eq!(o.roll_degrees, 300.0);
    }

    #[test]
    fn render_binds_texture_and_draws_mesh() {
        let vertex = Vertex::new(Vec3::ZERO, Default::default(), Default::default());
        let prop = Prop::new(ScopeId(1), Vec3::new(10.0, -5.0, 1.0), vec![vertex; 6]).with_texture(Some(TextureId(3)));

        let mut renderer = NullRenderer::new();
        let stats = renderer.stats();
        prop.render(&mut renderer);

        let stats = stats.borrow();
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.vertices, 6);
        assert_eq!(stats.textures_bound, 1);
        let model = stats.last_model.unwrap_or_default();
        assert_eq!(model.w_axis.truncate(), Vec3::new(10.0, -5.0, 1.0));
    }
}
