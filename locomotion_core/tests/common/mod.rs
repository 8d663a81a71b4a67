#![allow(dead_code)]

use locomotion_core::host::{HeadlessHandles, Host, Key};
use locomotion_core::{App, AppConfig, ModeKind};

pub const DT: f32 = 1.0 / 60.0;
pub const EPS: f32 = 1e-4;

pub fn headless_app() -> (App, HeadlessHandles) {
    let (host, handles) = Host::headless(2.0);
    let mut cfg = AppConfig::default();
    cfg.frame.log_fps = false;
    let app = App::new(cfg, host).expect("headless app");
    (app, handles)
}

/// Press and release `key`, then run one frame.
pub fn tap(app: &mut App, h: &HeadlessHandles, key: Key) {
    h.input.tap(key);
    app.run_frame(DT);
}

pub fn frames(app: &mut App, n: usize) {
    for _ in 0..n {
        app.run_frame(DT);
    }
}

pub fn enter_play(app: &mut App, h: &HeadlessHandles) {
    tap(app, h, Key::Space);
    assert_eq!(app.mode_kind(), Some(ModeKind::Play));
}
