use glam::{Mat4, Vec2, Vec3};

use crate::camera::Camera;
use crate::clock::{Clock, ClockId, ClockTree};
use crate::entity::ScopeId;
use crate::error::ClockError;
use crate::host::{MeshBuilder, Renderer};
use crate::math::{range_map, Rgba8, Vertex};
use crate::scope::{apply_time_controls, SetupCtx, UpdateCtx};

pub const SCREEN_TOP_RIGHT: Vec2 = Vec2::new(200.0, 100.0);
pub const BACKGROUND: Rgba8 = Rgba8::rgb(157, 187, 227);

pub const MIN_RING_RADIUS: f32 = 2.0;
pub const MAX_RING_RADIUS: f32 = 20.0;
pub const INITIAL_RING_RADIUS: f32 = 10.0;
/// Units per second of mode-clock time.
pub const RING_SPEED: f32 = 15.0;
pub const RING_THICKNESS: f32 = 3.0;

pub const BOX_TEXTURE: &str = "Data/Images/Test_StbiFlippedAndOpenGL.png";

/// Idle presentation shown before and between play sessions.
pub struct AttractMode {
    scope: ScopeId,
    clock: ClockId,
    screen_camera: Camera,

    ring_radius: f32,
    ring_growing: bool,
    ring: Vec<Vertex>,

    triangle: [Vertex; 3],
    textured_box: Vec<Vertex>,
}

impl AttractMode {
    pub fn new(scope: ScopeId, ctx: &mut SetupCtx<'_>) -> Result<Self, ClockError> {
        let root = ctx.clocks.root();
        let clock = ctx.clocks.create_child(root)?;
        let screen_camera = Camera::orthographic(Vec2::ZERO, SCREEN_TOP_RIGHT);

        let mut mode = Self {
            scope,
            clock,
            screen_camera,
            ring_radius: INITIAL_RING_RADIUS,
            ring_growing: true,
            ring: Vec::new(),
            triangle: test_triangle(),
            textured_box: ctx
                .meshes
                .aabb2(Vec2::new(10.0, 10.0), Vec2::new(50.0, 50.0), Rgba8::WHITE),
        };
        mode.rebuild_ring(ctx.meshes);

        log::info!("attract scope {} built", scope.0);
        Ok(mode)
    }

    /// Releases the mode clock. The scope is gone afterwards.
    pub fn teardown(self, clocks: &mut ClockTree) {
        if let Err(e) = clocks.destroy(self.clock) {
            log::warn!("attract scope {} teardown: {e}", self.scope.0);
        }
        log::info!("attract scope {} torn down", self.scope.0);
    }

    #[inline]
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    #[inline]
    pub fn clock_id(&self) -> ClockId {
        self.clock
    }

    #[inline]
    pub fn screen_camera(&self) -> &Camera {
        &self.screen_camera
    }

    #[inline]
    pub fn ring_radius(&self) -> f32 {
        self.ring_radius
    }

    pub fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        let Some(clock) = ctx.clocks.get_mut(self.clock) else {
            return;
        };
        let dt = clock.delta_seconds();
        apply_time_controls(clock, ctx.input, true);

        self.advance_ring(dt);
        self.rebuild_ring(ctx.meshes);
    }

    fn advance_ring(&mut self, dt: f32) {
        if self.ring_growing {
            self.ring_radius += dt * RING_SPEED;
            if self.ring_radius > MAX_RING_RADIUS {
                self.ring_radius = MAX_RING_RADIUS;
                self.ring_growing = false;
            }
        } else {
            self.ring_radius -= dt * RING_SPEED;
            if self.ring_radius < MIN_RING_RADIUS {
                self.ring_radius = MIN_RING_RADIUS;
                self.ring_growing = true;
            }
        }
    }

    fn rebuild_ring(&mut self, meshes: &dyn MeshBuilder) {
        let (bl, tr) = self
            .screen_camera
            .ortho_bounds()
            .unwrap_or((Vec2::ZERO, SCREEN_TOP_RIGHT));
        let center = (bl + tr) * 0.5;
        self.ring = meshes.ring2d(center, self.ring_radius, RING_THICKNESS, Rgba8::RED);
    }

    pub fn render(&self, renderer: &mut dyn Renderer) {
        renderer.clear_screen(BACKGROUND);
        renderer.begin_camera(&self.screen_camera);
        renderer.set_model_constants(Mat4::IDENTITY, Rgba8::WHITE);

        renderer.bind_texture(None);
        renderer.draw_vertices(&self.triangle);

        let texture = renderer.create_or_get_texture(BOX_TEXTURE);
        renderer.bind_texture(texture);
        renderer.draw_vertices(&self.textured_box);

        renderer.bind_texture(None);
        renderer.draw_vertices(&self.ring);

        renderer.end_camera(&self.screen_camera);
    }

    pub fn clock<'t>(&self, clocks: &'t ClockTree) -> Option<&'t Clock> {
        clocks.get(self.clock)
    }
}

/// Unit-space test triangle mapped into the lower-left corner.
fn test_triangle() -> [Vertex; 3] {
    let map = |x: f32, y: f32| Vec3::new(range_map(x, -1.0, 1.0, 0.0, 1.0), range_map(y, -1.0, 1.0, 0.0, 1.0), 0.0);
    [
        Vertex::new(map(-0.5, -0.5), Rgba8::WHITE, Vec2::ZERO),
        Vertex::new(map(0.0, 0.5), Rgba8::WHITE, Vec2::ZERO),
        Vertex::new(map(0.5, -0.5), Rgba8::WHITE, Vec2::ZERO),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::host::{HeadlessWindow, PlaceholderMeshBuilder};

    fn build(clocks: &mut ClockTree) -> AttractMode {
        let window = HeadlessWindow::new(2.0);
        let camera = CameraConfig::default();
        let mut ctx = SetupCtx {
            clocks,
            meshes: &PlaceholderMeshBuilder,
            renderer: None,
            window: &window,
            camera: &camera,
        };
        AttractMode::new(ScopeId(1), &mut ctx).unwrap()
    }

    #[test]
    fn ring_ping_pongs_between_bounds() {
        let mut clocks = ClockTree::new();
        let mut mode = build(&mut clocks);
        assert_eq!(mode.ring_radius(), INITIAL_RING_RADIUS);

        mode.advance_ring(1.0);
        assert_eq!(mode.ring_radius(), MAX_RING_RADIUS);
        mode.advance_ring(1.0);
        assert_eq!(mode.ring_radius(), 5.0);
        mode.advance_ring(1.0);
        assert_eq!(mode.ring_radius(), MIN_RING_RADIUS);
        mode.advance_ring(0.2);
        assert_eq!(mode.ring_radius(), 5.0);
    }

    #[test]
    fn teardown_releases_the_clock() {
        let mut clocks = ClockTree::new();
        let mode = build(&mut clocks);
        let id = mode.clock_id();
        assert!(clocks.contains(id));
        mode.teardown(&mut clocks);
        assert!(!clocks.contains(id));
        assert_eq!(clocks.len(), 1);
    }
}
