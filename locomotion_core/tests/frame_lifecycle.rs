mod common;

use glam::{Mat4, Vec3};
use locomotion_core::debug::DebugShape;
use locomotion_core::entity::Entity;
use locomotion_core::host::{Host, Key};
use locomotion_core::phase::FramePhase;
use locomotion_core::play::{MOVING_POINT_OFFSET, PLAYER_START};
use locomotion_core::{App, AppConfig, ModeKind, NOMINAL_STEP_SECONDS};

use common::{enter_play, frames, headless_app, tap, DT, EPS};

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < EPS
}

fn player_position(app: &App) -> Option<Vec3> {
    app.play().and_then(|p| p.player()).map(|p| p.state().position)
}

#[test]
fn phases_run_in_order_every_tick() {
    let (mut app, _h) = headless_app();
    app.run_frame(DT);
    let phases: Vec<_> = app.telemetry().phases().collect();
    assert_eq!(phases, FramePhase::ORDER.to_vec());
    assert_eq!(app.last_phase(), Some(FramePhase::End));
    assert_eq!(app.telemetry().frames, 1);
}

#[test]
fn quitting_tick_skips_only_render() {
    let (mut app, h) = headless_app();
    tap(&mut app, &h, Key::Escape);
    let phases: Vec<_> = app.telemetry().phases().collect();
    assert_eq!(phases, vec![FramePhase::Begin, FramePhase::Update, FramePhase::End]);
}

#[test]
fn raw_delta_is_clamped() {
    let (mut app, _h) = headless_app();
    app.run_frame(5.0);
    let root = app.clocks().get(app.clocks().root()).map(|c| c.delta_seconds());
    assert_eq!(root, Some(app.config().frame.max_dt_sec()));

    app.run_frame(f32::NAN);
    let root = app.clocks().get(app.clocks().root()).map(|c| c.delta_seconds());
    assert_eq!(root, Some(0.0));
}

#[test]
fn new_mode_clock_starts_at_zero_and_advances_next_tick() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    assert_eq!(app.active_clock().map(|c| c.total_seconds()), Some(0.0));

    app.run_frame(DT);
    let total = app.active_clock().map_or(0.0, |c| c.total_seconds()) as f32;
    assert!(close(total, DT));
}

#[test]
fn pause_freezes_play_time_and_step_advances_one_nominal_tick() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    app.run_frame(DT);

    tap(&mut app, &h, Key::P);
    let frozen = app.active_clock().map_or(0.0, |c| c.total_seconds());
    assert_eq!(app.active_clock().map(|c| c.is_paused()), Some(true));

    frames(&mut app, 5);
    assert_eq!(app.active_clock().map(|c| c.total_seconds()), Some(frozen));

    // The step is requested during Update and consumed by the next tick.
    tap(&mut app, &h, Key::O);
    assert_eq!(app.active_clock().map(|c| c.is_step_pending()), Some(true));
    app.run_frame(0.05);
    let delta = app.active_clock().map_or(0.0, |c| c.delta_seconds());
    assert!(close(delta, NOMINAL_STEP_SECONDS));

    app.run_frame(DT);
    assert_eq!(app.active_clock().map(|c| c.delta_seconds()), Some(0.0));

    tap(&mut app, &h, Key::P);
    app.run_frame(DT);
    let delta = app.active_clock().map_or(0.0, |c| c.delta_seconds());
    assert!(close(delta, DT));
}

#[test]
fn paused_player_does_not_move() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    tap(&mut app, &h, Key::P);

    h.input.press(Key::W);
    frames(&mut app, 10);
    assert_eq!(player_position(&app), Some(PLAYER_START));
}

#[test]
fn slow_motion_scales_while_held() {
    let (mut app, h) = headless_app();
    h.input.press(Key::T);
    frames(&mut app, 2);
    let clock = app.active_clock().expect("attract clock");
    assert!(close(clock.time_scale(), 0.1));
    assert!(close(clock.delta_seconds(), DT * 0.1));

    h.input.release(Key::T);
    frames(&mut app, 2);
    let clock = app.active_clock().expect("attract clock");
    assert!(close(clock.time_scale(), 1.0));
    assert!(close(clock.delta_seconds(), DT));
}

#[test]
fn fast_motion_only_in_attract() {
    let (mut app, h) = headless_app();
    h.input.press(Key::Y);
    frames(&mut app, 2);
    assert_eq!(app.active_clock().map(|c| c.time_scale()), Some(2.0));
    h.input.release(Key::Y);

    enter_play(&mut app, &h);
    h.input.press(Key::Y);
    frames(&mut app, 2);
    assert_eq!(app.active_clock().map(|c| c.time_scale()), Some(1.0));
}

#[test]
fn forward_key_moves_player_along_x() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);

    h.input.press(Key::W);
    app.run_frame(DT);
    let p = player_position(&app).expect("player");
    assert!(close(p.x, PLAYER_START.x + 4.0 * DT));
    assert!(close(p.y, PLAYER_START.y));

    h.input.press(Key::Shift);
    app.run_frame(DT);
    let q = player_position(&app).expect("player");
    assert!(close(q.x - p.x, 40.0 * DT));
}

#[test]
fn player_ignores_input_without_focus_or_with_console_open() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    h.input.press(Key::W);

    h.focus.set(false);
    frames(&mut app, 3);
    assert_eq!(player_position(&app), Some(PLAYER_START));

    h.focus.set(true);
    h.console_open.set(true);
    frames(&mut app, 3);
    assert_eq!(player_position(&app), Some(PLAYER_START));
}

#[test]
fn cursor_is_captured_only_while_playing_with_control() {
    let (mut app, h) = headless_app();
    app.run_frame(DT);
    assert_eq!(h.input.cursor_mode(), (false, false));

    enter_play(&mut app, &h);
    app.run_frame(DT);
    assert_eq!(h.input.cursor_mode(), (true, true));

    h.focus.set(false);
    app.run_frame(DT);
    assert_eq!(h.input.cursor_mode(), (false, false));

    h.focus.set(true);
    h.console_open.set(true);
    app.run_frame(DT);
    assert_eq!(h.input.cursor_mode(), (false, false));
}

#[test]
fn mouse_motion_turns_the_player() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);

    h.input.with(|s| s.apply_cursor_motion(100, 0));
    app.run_frame(DT);
    let yaw = app
        .play()
        .and_then(|p| p.player())
        .map(|p| p.state().orientation.yaw_degrees)
        .expect("player");
    assert!(close(yaw, -10.0));

    // Motion is consumed by the tick it was latched into.
    app.run_frame(DT);
    let again = app
        .play()
        .and_then(|p| p.player())
        .map(|p| p.state().orientation.yaw_degrees)
        .expect("player");
    assert!(close(again, -10.0));
}

#[test]
fn cube_b_color_follows_play_time() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    app.run_frame(DT);
    let first = app.play().and_then(|p| p.cube_b()).map(|c| c.state().color);

    frames(&mut app, 30);
    let later = app.play().and_then(|p| p.cube_b()).map(|c| c.state().color);
    assert_ne!(first, later);
}

#[test]
fn sphere_key_queues_a_timed_wire_sphere_ahead_of_the_player() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    tap(&mut app, &h, Key::Digit1);

    let expected = PLAYER_START + Vec3::X * 2.0;
    let found = h.debug.with(|q| {
        q.requests().any(|r| {
            matches!(r.shape, DebugShape::WireSphere { center, radius }
                if (center - expected).length() < EPS && close(radius, 0.5))
                && close(r.duration, 5.0)
        })
    });
    assert!(found);
}

#[test]
fn one_frame_annotations_do_not_outlive_their_tick() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    frames(&mut app, 3);

    // HUD and origin basis are re-sent each tick and dropped at End.
    assert!(h.debug.is_empty());

    let screen = h.debug.with(|q| q.last_screen().to_vec());
    assert_eq!(screen.len(), 2);
    assert!(screen.iter().any(|v| matches!(&v.shape,
        DebugShape::ScreenText { text, .. } if text == "Player Position: -3.00, 0.00, 1.00")));

    let world = h.debug.with(|q| q.last_world().to_vec());
    let arrows = world.iter().filter(|v| matches!(v.shape, DebugShape::Arrow { .. })).count();
    let labels = world.iter().filter(|v| matches!(v.shape, DebugShape::WorldText { .. })).count();
    assert_eq!((arrows, labels), (3, 3));
}

#[test]
fn held_marker_key_drops_one_point_per_tick() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    h.input.press(Key::Digit6);
    frames(&mut app, 3);
    h.input.release(Key::Digit6);
    app.run_frame(DT);

    let points = h.debug.with(|q| {
        q.requests()
            .filter(|r| matches!(r.shape, DebugShape::Point { position, .. } if position.z == 0.0))
            .count()
    });
    assert_eq!(points, 3);
}

#[test]
fn each_transient_key_adds_its_shape() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    for key in [Key::Digit2, Key::Digit3, Key::Digit4, Key::Digit5, Key::Digit7] {
        tap(&mut app, &h, key);
    }
    let kinds: Vec<&'static str> = h.debug.with(|q| q.requests().map(|r| r.shape.kind()).collect());
    assert_eq!(kinds.iter().filter(|k| **k == "line").count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == "arrow").count(), 3);
    assert_eq!(kinds.iter().filter(|k| **k == "billboard-text").count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == "wire-cylinder").count(), 1);
    assert_eq!(kinds.iter().filter(|k| **k == "message").count(), 1);
}

#[test]
fn camera_message_lists_pitch_then_yaw_then_roll() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    h.input.with(|s| s.apply_cursor_motion(100, 0));
    app.run_frame(DT);

    tap(&mut app, &h, Key::Digit7);
    let texts: Vec<String> = h.debug.with(|q| {
        q.requests()
            .filter_map(|r| match &r.shape {
                DebugShape::Message { text } => Some(text.clone()),
                _ => None,
            })
            .collect()
    });
    assert_eq!(texts, vec!["Camera Orientation: 0.00, -10.00, 0.00".to_owned()]);
}

#[test]
fn held_trail_key_grows_the_moving_point_trail() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    assert_eq!(app.play().map(|p| p.moving_point().sphere_count()), Some(1));

    h.input.press(Key::Numpad0);
    frames(&mut app, 3);
    h.input.release(Key::Numpad0);
    app.run_frame(DT);

    let mp = app.play().map(|p| p.moving_point()).expect("play scope");
    assert_eq!(mp.sphere_count(), 4);
    assert!(close(mp.t_degrees(), 3.0));
    let (s, c) = 3.0f32.to_radians().sin_cos();
    assert!((mp.point() - Vec3::new(c, s, 3.0 / 500.0)).length() < EPS);
}

#[test]
fn held_sine_key_replaces_the_trail_with_five_spheres() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    h.input.press(Key::Numpad0);
    frames(&mut app, 10);
    h.input.release(Key::Numpad0);

    h.input.press(Key::Numpad1);
    frames(&mut app, 2);
    h.input.release(Key::Numpad1);

    let mp = app.play().map(|p| p.moving_point()).expect("play scope");
    assert_eq!(mp.sphere_count(), 5);
    assert!(close(mp.t_degrees(), 10.4));
    let last_z = 10.4f32.to_radians().sin();
    assert!((mp.point() - Vec3::new(0.0, 0.0, last_z)).length() < EPS);
}

#[test]
fn trail_key_wins_when_both_are_held() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    h.input.press(Key::Numpad0);
    h.input.press(Key::Numpad1);
    frames(&mut app, 2);

    assert_eq!(app.play().map(|p| p.moving_point().sphere_count()), Some(3));
}

#[test]
fn moving_point_is_drawn_last_at_its_offset() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    app.run_frame(DT);
    assert_eq!(h.render.borrow().last_model, Some(Mat4::from_translation(MOVING_POINT_OFFSET)));
}

#[test]
fn reset_in_place_restarts_the_moving_point() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    h.input.press(Key::Numpad0);
    frames(&mut app, 5);
    h.input.release(Key::Numpad0);

    tap(&mut app, &h, Key::F8);
    let mp = app.play().map(|p| p.moving_point()).expect("play scope");
    assert_eq!(mp.sphere_count(), 1);
    assert_eq!(mp.t_degrees(), 0.0);
}

#[test]
fn timed_annotations_expire_on_the_root_clock() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    tap(&mut app, &h, Key::P);
    tap(&mut app, &h, Key::Digit1);
    assert_eq!(h.debug.len(), 1);

    // Pausing the play clock does not freeze annotation lifetimes.
    for _ in 0..60 {
        app.run_frame(0.1);
    }
    assert!(h.debug.is_empty());
}

#[test]
fn play_renders_world_then_console_last() {
    let (mut app, h) = headless_app();
    let before = h.console_renders.get();
    enter_play(&mut app, &h);
    app.run_frame(DT);

    let stats = h.render.borrow().clone();
    assert!(stats.draw_calls > 0);
    assert!(stats.textures_bound > 0);
    assert!(stats.cameras >= 2);
    assert_eq!(h.console_renders.get(), before + 2);
}

#[test]
fn attract_clears_to_its_background() {
    let (mut app, h) = headless_app();
    app.run_frame(DT);
    let clear = h.render.borrow().last_clear;
    assert_eq!(clear, Some(locomotion_core::attract::BACKGROUND));
}

#[test]
fn runs_without_a_renderer() {
    let (host, h) = Host::headless_without_renderer(2.0);
    let mut cfg = AppConfig::default();
    cfg.frame.log_fps = false;
    let mut app = App::new(cfg, host).expect("app");

    tap(&mut app, &h, Key::Space);
    frames(&mut app, 5);
    assert_eq!(app.mode_kind(), Some(ModeKind::Play));
    assert_eq!(h.console_renders.get(), 0);
    assert!(h.debug.is_empty());
}

#[test]
fn controls_help_is_posted_to_the_console() {
    let (_app, h) = headless_app();
    let lines = h.console_lines.borrow();
    assert!(lines.iter().any(|l| l.contains("Major Controls")));
    assert!(lines.iter().any(|l| l.contains("F8")));
}

#[test]
fn shutdown_releases_everything_once() {
    let (mut app, h) = headless_app();
    enter_play(&mut app, &h);
    tap(&mut app, &h, Key::Digit1);

    app.shutdown();
    assert_eq!(app.mode_kind(), None);
    assert_eq!(app.clocks().len(), 1);
    assert!(h.debug.is_empty());

    let frames_before = app.telemetry().frames;
    app.shutdown();
    app.run_frame(DT);
    assert_eq!(app.telemetry().frames, frames_before);
}
