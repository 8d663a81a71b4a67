//! Interactive scope: the player, three props and the debug annotation keys.

use glam::{Mat4, Vec2, Vec3};

use crate::camera::Camera;
use crate::clock::{Clock, ClockId, ClockTree};
use crate::debug::{DebugRequest, DepthMode, ONE_FRAME};
use crate::entity::{Entity, EntityCtx, EntityIndex, EntitySet, EntityState, ScopeId};
use crate::error::ClockError;
use crate::host::{ControllerButton, DebugDraw, Input, Key, MeshBuilder, Renderer};
use crate::math::{range_map, EulerAngles, Rgba8, Vertex};
use crate::player::{point_ahead, Player};
use crate::prop::Prop;
use crate::scope::{apply_time_controls, SetupCtx, UpdateCtx};

pub const SCREEN_TOP_RIGHT: Vec2 = Vec2::new(1600.0, 800.0);
pub const BACKGROUND: Rgba8 = Rgba8::rgb(38, 38, 38);
pub const HUD_FONT_SIZE: f32 = 15.0;

pub const PLAYER_START: Vec3 = Vec3::new(-3.0, 0.0, 1.0);
pub const CUBE_A_START: Vec3 = Vec3::new(2.0, 2.0, 0.0);
pub const CUBE_B_START: Vec3 = Vec3::new(-2.0, -2.0, 0.0);
pub const SPHERE_START: Vec3 = Vec3::new(10.0, -5.0, 1.0);
pub const SPHERE_TEXTURE: &str = "Data/Images/TestUV.png";

const CUBE_HALF_EXTENT: f32 = 0.5;
const CUBE_FACE_COLORS: [Rgba8; 6] = [
    Rgba8::RED,
    Rgba8::CYAN,
    Rgba8::GREEN,
    Rgba8::MAGENTA,
    Rgba8::BLUE,
    Rgba8::YELLOW,
];
const SPHERE_SLICES: u32 = 8;

const GRID_HALF_LENGTH: f32 = 50.0;
const GRID_X_COLOR: Rgba8 = Rgba8::new(200, 0, 0, 175);
const GRID_Y_COLOR: Rgba8 = Rgba8::new(0, 200, 0, 175);

const MARKER_COLOR: Rgba8 = Rgba8::rgb(150, 45, 0);

pub const MOVING_POINT_OFFSET: Vec3 = Vec3::new(-1.0, 1.0, 1.0);
const MOVING_POINT_RADIUS: f32 = 0.1;
const TRAIL_RADIUS: f32 = 0.01;
const BOB_RADIUS: f32 = 0.05;
const POINT_SLICES: u32 = 8;
const DUSTY_ROSE: Rgba8 = Rgba8::rgb(200, 130, 140);

pub struct PlayMode {
    scope: ScopeId,
    clock: ClockId,
    screen_camera: Camera,

    entities: EntitySet,
    player: EntityIndex,
    cube_a: EntityIndex,
    cube_b: EntityIndex,
    sphere: EntityIndex,

    show_debug_view: bool,
    grid: Vec<Vertex>,
    origin_pipes: Vec<Vertex>,
    moving_point: MovingPoint,

    annotations_this_frame: u32,
}

impl PlayMode {
    pub fn new(scope: ScopeId, ctx: &mut SetupCtx<'_>, show_debug_view: bool) -> Result<Self, ClockError> {
        let root = ctx.clocks.root();
        let clock = ctx.clocks.create_child(root)?;

        let mut entities = EntitySet::new();

        let player = entities.push(Box::new(Player::new(
            scope,
            PLAYER_START,
            ctx.window.client_aspect(),
            ctx.camera,
        )));

        let cube_mesh = ctx.meshes.cube(Vec3::splat(CUBE_HALF_EXTENT), CUBE_FACE_COLORS);
        let cube_a = entities.push(Box::new(
            Prop::new(scope, CUBE_A_START, cube_mesh.clone()).with_angular_velocity(EulerAngles::new(0.0, 30.0, 30.0)),
        ));
        let cube_b = entities.push(Box::new(Prop::new(scope, CUBE_B_START, cube_mesh)));

        let sphere_texture = ctx
            .renderer
            .as_deref_mut()
            .and_then(|r| r.create_or_get_texture(SPHERE_TEXTURE));
        if sphere_texture.is_none() {
            log::warn!("texture '{SPHERE_TEXTURE}' unavailable; sphere renders untextured");
        }
        let sphere = entities.push(Box::new(
            Prop::new(scope, SPHERE_START, ctx.meshes.uv_sphere(1.0, Rgba8::WHITE, SPHERE_SLICES))
                .with_texture(sphere_texture)
                .with_angular_velocity(EulerAngles::new(45.0, 0.0, 0.0)),
        ));

        let mode = Self {
            scope,
            clock,
            screen_camera: Camera::orthographic(Vec2::ZERO, SCREEN_TOP_RIGHT),
            entities,
            player,
            cube_a,
            cube_b,
            sphere,
            show_debug_view,
            grid: build_grid(ctx.meshes),
            origin_pipes: build_origin_pipes(ctx.meshes),
            moving_point: MovingPoint::new(ctx.meshes),
            annotations_this_frame: 0,
        };

        log::info!(
            "play scope {} built: {} entities, debug_view={}",
            scope.0,
            mode.entities.live_count(),
            show_debug_view
        );
        Ok(mode)
    }

    /// Destroys every entity, then the mode clock.
    pub fn teardown(self, clocks: &mut ClockTree) {
        let Self {
            scope,
            clock,
            entities,
            ..
        } = self;

        let count = entities.live_count();
        drop(entities);

        if let Err(e) = clocks.destroy(clock) {
            log::warn!("play scope {} teardown: {e}", scope.0);
        }
        log::info!("play scope {} torn down ({count} entities destroyed)", scope.0);
    }

    #[inline]
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    #[inline]
    pub fn clock_id(&self) -> ClockId {
        self.clock
    }

    pub fn clock<'t>(&self, clocks: &'t ClockTree) -> Option<&'t Clock> {
        clocks.get(self.clock)
    }

    #[inline]
    pub fn screen_camera(&self) -> &Camera {
        &self.screen_camera
    }

    #[inline]
    pub fn entities(&self) -> &EntitySet {
        &self.entities
    }

    #[inline]
    pub fn show_debug_view(&self) -> bool {
        self.show_debug_view
    }

    pub fn player(&self) -> Option<&Player> {
        self.entities.get::<Player>(self.player)
    }

    pub fn cube_a(&self) -> Option<&Prop> {
        self.entities.get::<Prop>(self.cube_a)
    }

    pub fn cube_b(&self) -> Option<&Prop> {
        self.entities.get::<Prop>(self.cube_b)
    }

    pub fn sphere(&self) -> Option<&Prop> {
        self.entities.get::<Prop>(self.sphere)
    }

    #[inline]
    pub fn moving_point(&self) -> &MovingPoint {
        &self.moving_point
    }

    /// Debug requests handed to the sink during the current frame.
    #[inline]
    pub fn annotations_this_frame(&self) -> u32 {
        self.annotations_this_frame
    }

    pub fn begin_frame(&mut self) {
        self.annotations_this_frame = 0;
    }

    pub fn end_frame(&mut self) {
        log::trace!(
            "play scope {}: {} debug requests this frame",
            self.scope.0,
            self.annotations_this_frame
        );
    }

    pub fn update(&mut self, ctx: &mut UpdateCtx<'_>) {
        let Some(clock) = ctx.clocks.get_mut(self.clock) else {
            return;
        };
        apply_time_controls(clock, ctx.input, false);

        let controller = ctx.input.controller(0);
        if ctx.input.was_key_just_pressed(Key::F1) || controller.was_button_just_pressed(ControllerButton::Back) {
            self.show_debug_view = !self.show_debug_view;
            log::debug!("debug view={}", self.show_debug_view);
        }

        let clock = clock.clone();
        self.update_cube_color(clock.total_seconds());

        let mut ectx = EntityCtx {
            input: &mut *ctx.input,
            window: ctx.window,
            console: ctx.console,
        };
        self.entities.update_all(&mut ectx, clock.delta_seconds());

        self.emit_annotations(&*ctx.input, &mut *ctx.debug, &clock);
        self.moving_point.update(&*ctx.input, ctx.meshes);
    }

    fn update_cube_color(&mut self, total_seconds: f64) {
        let grey = range_map((total_seconds as f32).sin(), -1.0, 1.0, 0.0, 255.0) as u8;
        if let Some(cube) = self.entities.get_mut::<Prop>(self.cube_b) {
            cube.state_mut().color = Rgba8::grey(grey);
        }
    }

    fn emit(&mut self, debug: &mut dyn DebugDraw, request: DebugRequest) {
        if request.is_one_frame() {
            log::trace!("debug annotation: {}", request.shape.kind());
        } else {
            log::debug!("debug annotation: {} ({}s)", request.shape.kind(), request.duration);
        }
        self.annotations_this_frame += 1;
        debug.add(request);
    }

    fn emit_annotations(&mut self, input: &dyn Input, debug: &mut dyn DebugDraw, clock: &Clock) {
        let Some(player) = self.player() else {
            return;
        };
        let state: EntityState = player.state().clone();
        let camera_orientation = player.camera().orientation();

        let mut requests = Vec::new();

        if input.was_key_just_pressed(Key::Digit1) {
            requests.push(DebugRequest::wire_sphere(
                point_ahead(&state, 2.0),
                0.5,
                5.0,
                Rgba8::GREEN,
                Rgba8::RED,
                DepthMode::UseDepth,
            ));
        }

        if input.was_key_just_pressed(Key::Digit2) {
            requests.push(DebugRequest::line(
                state.position,
                point_ahead(&state, 20.0),
                0.1,
                10.0,
                Rgba8::BLUE,
                Rgba8::BLUE,
                DepthMode::XRay,
            ));
        }

        if input.was_key_just_pressed(Key::Digit3) {
            let m = state.model_matrix();
            let axes = [
                (m.x_axis.truncate(), Rgba8::RED),
                (m.y_axis.truncate(), Rgba8::GREEN),
                (m.z_axis.truncate(), Rgba8::BLUE),
            ];
            for (axis, color) in axes {
                requests.push(DebugRequest::arrow(
                    state.position,
                    state.position + axis,
                    0.1,
                    20.0,
                    color,
                    DepthMode::UseDepth,
                ));
            }
        }

        if input.was_key_just_pressed(Key::Digit4) {
            let p = state.position;
            let o = state.orientation;
            let text = format!(
                "Position: {:.2}, {:.2}, {:.2} Orientation: {:.2}, {:.2}, {:.2}",
                p.x, p.y, p.z, o.yaw_degrees, o.pitch_degrees, o.roll_degrees
            );
            requests.push(DebugRequest::billboard_text(
                text,
                p,
                0.2,
                Vec2::splat(0.5),
                5.0,
                Rgba8::WHITE,
                Rgba8::RED,
            ));
        }

        if input.was_key_just_pressed(Key::Digit5) {
            requests.push(DebugRequest::wire_cylinder(
                state.position,
                state.position + Vec3::Z,
                0.5,
                10.0,
                Rgba8::WHITE,
                Rgba8::RED,
                DepthMode::UseDepth,
            ));
        }

        if input.is_key_down(Key::Digit6) {
            let on_ground = Vec3::new(state.position.x, state.position.y, 0.0);
            requests.push(DebugRequest::point(
                on_ground,
                0.25,
                60.0,
                MARKER_COLOR,
                MARKER_COLOR,
                DepthMode::UseDepth,
            ));
        }

        if input.was_key_just_pressed(Key::Digit7) {
            let o = camera_orientation;
            let text = format!(
                "Camera Orientation: {:.2}, {:.2}, {:.2}",
                o.pitch_degrees, o.yaw_degrees, o.roll_degrees
            );
            requests.push(DebugRequest::message(text, 5.0, Rgba8::WHITE, Rgba8::RED));
        }

        requests.extend(self.hud(&state, clock));
        requests.extend(origin_basis());

        for request in requests {
            self.emit(debug, request);
        }
    }

    fn hud(&self, state: &EntityState, clock: &Clock) -> [DebugRequest; 2] {
        let (bl, tr) = self
            .screen_camera
            .ortho_bounds()
            .unwrap_or((Vec2::ZERO, SCREEN_TOP_RIGHT));
        let line_y = tr.y - HUD_FONT_SIZE;

        let p = state.position;
        let position = DebugRequest::screen_text(
            format!("Player Position: {:.2}, {:.2}, {:.2}", p.x, p.y, p.z),
            Vec2::new(bl.x, line_y),
            HUD_FONT_SIZE,
            Vec2::new(0.0, 1.0),
            ONE_FRAME,
        );
        let timing = DebugRequest::screen_text(
            format!(
                "Time: {:.2}, FPS: {:.1}, Scale: {:.2}",
                clock.total_seconds(),
                clock.average_fps(),
                clock.time_scale()
            ),
            Vec2::new(tr.x, line_y),
            HUD_FONT_SIZE,
            Vec2::new(1.0, 1.0),
            ONE_FRAME,
        );
        [position, timing]
    }

    pub fn render(&self, renderer: &mut dyn Renderer, debug: &mut dyn DebugDraw) {
        renderer.clear_screen(BACKGROUND);

        if let Some(player) = self.player() {
            let world_camera = player.camera();
            renderer.begin_camera(world_camera);

            renderer.set_model_constants(Mat4::IDENTITY, Rgba8::WHITE);
            renderer.bind_texture(None);
            renderer.draw_vertices(&self.grid);
            if self.show_debug_view {
                renderer.draw_vertices(&self.origin_pipes);
            }

            self.entities.render_all(renderer);
            debug.render_world(world_camera);

            renderer.set_model_constants(Mat4::from_translation(MOVING_POINT_OFFSET), Rgba8::WHITE);
            renderer.bind_texture(None);
            renderer.draw_vertices(self.moving_point.vertices());

            renderer.end_camera(world_camera);
        }

        renderer.begin_camera(&self.screen_camera);
        debug.render_screen(&self.screen_camera);
        renderer.end_camera(&self.screen_camera);
    }
}

/// Parametric point demo, drawn at [`MOVING_POINT_OFFSET`].
///
/// Holding Numpad0 walks `t` along a helix and drops a small red sphere per
/// tick. Holding Numpad1 replaces the trail with five spheres bobbing on sine
/// curves of `t`. Both advance once per tick, independent of the play clock.
pub struct MovingPoint {
    t_degrees: f32,
    point: Vec3,
    spheres: usize,
    verts: Vec<Vertex>,
}

impl MovingPoint {
    fn new(meshes: &dyn MeshBuilder) -> Self {
        let mut mp = Self {
            t_degrees: 0.0,
            point: Vec3::ZERO,
            spheres: 0,
            verts: Vec::new(),
        };
        mp.add_sphere(meshes, Vec3::ZERO, MOVING_POINT_RADIUS, Rgba8::WHITE);
        mp
    }

    #[inline]
    pub fn t_degrees(&self) -> f32 {
        self.t_degrees
    }

    /// Center of the most recently added sphere.
    #[inline]
    pub fn point(&self) -> Vec3 {
        self.point
    }

    #[inline]
    pub fn sphere_count(&self) -> usize {
        self.spheres
    }

    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.verts
    }

    fn update(&mut self, input: &dyn Input, meshes: &dyn MeshBuilder) {
        if input.is_key_down(Key::Numpad0) {
            self.t_degrees += 1.0;
            let (s, c) = self.t_degrees.to_radians().sin_cos();
            let at = Vec3::new(c, s, self.t_degrees / 500.0);
            self.add_sphere(meshes, at, TRAIL_RADIUS, Rgba8::RED);
        } else if input.is_key_down(Key::Numpad1) {
            self.verts.clear();
            self.spheres = 0;
            self.t_degrees += 0.2;

            let t = self.t_degrees;
            let sin = |deg: f32| deg.to_radians().sin();
            let bobs = [
                (sin(t + 20.0), Rgba8::GREEN),
                (sin(2.0 * t), Rgba8::BLUE),
                (2.0 * sin(t), Rgba8::CYAN),
                (2.0 + sin(t), DUSTY_ROSE),
                (sin(t), Rgba8::RED),
            ];
            for (z, color) in bobs {
                self.add_sphere(meshes, Vec3::new(0.0, 0.0, z), BOB_RADIUS, color);
            }
            log::trace!("moving point t={t:.1}");
        }
    }

    fn add_sphere(&mut self, meshes: &dyn MeshBuilder, center: Vec3, radius: f32, color: Rgba8) {
        self.verts.extend(meshes.uv_sphere(radius, color, POINT_SLICES).into_iter().map(|mut v| {
            v.position += center;
            v
        }));
        self.point = center;
        self.spheres += 1;
    }
}

/// Axis arrows and labels at the world origin, re-sent every frame.
fn origin_basis() -> Vec<DebugRequest> {
    let arrow = |end: Vec3, color: Rgba8| DebugRequest::arrow(Vec3::ZERO, end, 0.1, ONE_FRAME, color, DepthMode::UseDepth);
    let label = |text: &str, i: Vec3, j: Vec3, k: Vec3, t: Vec3, align: Vec2, color: Rgba8| {
        let transform = Mat4::from_cols(i.extend(0.0), j.extend(0.0), k.extend(0.0), t.extend(1.0));
        DebugRequest::world_text(text, transform, 0.2, align, ONE_FRAME, color)
    };

    vec![
        arrow(Vec3::X, Rgba8::RED),
        arrow(Vec3::Y, Rgba8::GREEN),
        arrow(Vec3::Z, Rgba8::BLUE),
        label(
            "x - forward",
            -Vec3::Y,
            Vec3::X,
            Vec3::Z,
            Vec3::new(0.2, 0.0, 0.2),
            Vec2::ZERO,
            Rgba8::RED,
        ),
        label(
            "y - left",
            -Vec3::X,
            -Vec3::Y,
            Vec3::Z,
            Vec3::new(0.0, 0.2, 0.2),
            Vec2::new(1.0, 0.0),
            Rgba8::GREEN,
        ),
        label(
            "z - up",
            -Vec3::X,
            Vec3::Z,
            Vec3::Y,
            Vec3::new(0.0, -0.2, 0.2),
            Vec2::new(0.0, 1.0),
            Rgba8::BLUE,
        ),
    ]
}

/// Ground grid on z = 0: thin lines every unit, thick every five, plus the
/// two long origin lines.
fn build_grid(meshes: &dyn MeshBuilder) -> Vec<Vertex> {
    let h = GRID_HALF_LENGTH;
    let mut verts = Vec::new();
    let mut pipe = |mins: Vec3, maxs: Vec3, color: Rgba8| verts.extend(meshes.aabb3(mins, maxs, color));

    for i in 0..50 {
        let y = i as f32;
        pipe(Vec3::new(-h, y, 0.0), Vec3::new(h, y + 0.02, 0.02), GRID_X_COLOR);
        let y = -1.0 - i as f32;
        pipe(Vec3::new(-h, y, 0.0), Vec3::new(h, y + 0.02, 0.02), GRID_X_COLOR);
    }
    for i in -50..=50 {
        let x = i as f32;
        pipe(Vec3::new(x, -h, 0.0), Vec3::new(x + 0.02, h, 0.02), GRID_Y_COLOR);
    }
    for i in (-50..=50).step_by(5) {
        let x = i as f32;
        pipe(Vec3::new(x, -h, 0.0), Vec3::new(x + 0.08, h, 0.08), GRID_Y_COLOR);
    }
    for i in (-50..=50).step_by(5) {
        let y = i as f32;
        pipe(Vec3::new(-h, y, 0.0), Vec3::new(h, y + 0.08, 0.08), GRID_X_COLOR);
    }

    pipe(Vec3::new(-h, 0.0, 0.0), Vec3::new(h, 0.1, 0.1), GRID_X_COLOR);
    pipe(Vec3::new(0.0, -h, 0.0), Vec3::new(0.11, h, 0.11), GRID_Y_COLOR);
    verts
}

/// Short unit pipes along +X/+Y/+Z, shown with the debug view.
fn build_origin_pipes(meshes: &dyn MeshBuilder) -> Vec<Vertex> {
    let mut verts = meshes.aabb3(Vec3::ZERO, Vec3::new(1.0, 0.1, 0.1), Rgba8::new(255, 0, 0, 175));
    verts.extend(meshes.aabb3(Vec3::ZERO, Vec3::new(0.1, 1.0, 0.1), Rgba8::new(0, 255, 0, 175)));
    verts.extend(meshes.aabb3(Vec3::ZERO, Vec3::new(0.1, 0.1, 1.0), Rgba8::new(0, 0, 255, 175)));
    verts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{PlaceholderMeshBuilder, SharedInput};

    #[test]
    fn starts_as_one_sphere_at_the_origin() {
        let mp = MovingPoint::new(&PlaceholderMeshBuilder);
        assert_eq!(mp.sphere_count(), 1);
        assert_eq!(mp.point(), Vec3::ZERO);
        assert_eq!(mp.t_degrees(), 0.0);
        assert!(!mp.vertices().is_empty());
    }

    #[test]
    fn sphere_vertices_are_placed_around_their_center() {
        let meshes = PlaceholderMeshBuilder;
        let input = SharedInput::new();
        let mut mp = MovingPoint::new(&meshes);
        let before = mp.vertices().len();

        input.press(Key::Numpad0);
        mp.update(&input, &meshes);

        let added = &mp.vertices()[before..];
        assert!(!added.is_empty());
        let centroid = added.iter().map(|v| v.position).sum::<Vec3>() / added.len() as f32;
        let local = meshes.uv_sphere(TRAIL_RADIUS, Rgba8::RED, POINT_SLICES);
        let local_centroid = local.iter().map(|v| v.position).sum::<Vec3>() / local.len() as f32;
        assert!((centroid - local_centroid - mp.point()).length() < 1e-5);
    }
}
