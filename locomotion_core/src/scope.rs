//! Pieces shared by the two mode scopes.

use crate::clock::{Clock, ClockTree};
use crate::config::CameraConfig;
use crate::host::{Console, DebugDraw, Input, Key, MeshBuilder, Renderer, WindowHost};

pub const SLOW_MOTION_SCALE: f32 = 0.1;
pub const FAST_MOTION_SCALE: f32 = 2.0;

/// Borrowed view of the collaborators a scope needs during Update.
pub struct UpdateCtx<'a> {
    pub clocks: &'a mut ClockTree,
    pub input: &'a mut dyn Input,
    pub window: &'a dyn WindowHost,
    pub console: &'a dyn Console,
    pub debug: &'a mut dyn DebugDraw,
    pub meshes: &'a dyn MeshBuilder,
}

/// Collaborators available while a scope is being built.
pub struct SetupCtx<'a> {
    pub clocks: &'a mut ClockTree,
    pub meshes: &'a dyn MeshBuilder,
    pub renderer: Option<&'a mut (dyn Renderer + 'static)>,
    pub window: &'a dyn WindowHost,
    pub camera: &'a CameraConfig,
}

/// Pause toggle, held slow/fast motion and single step on a mode clock.
///
/// `allow_fast` enables the fast-motion key; without it any scale other than
/// slow motion resets to 1.
pub fn apply_time_controls(clock: &mut Clock, input: &dyn Input, allow_fast: bool) {
    if input.was_key_just_pressed(Key::P) {
        clock.toggle_pause();
        log::debug!("clock paused={}", clock.is_paused());
    }

    let scale = if input.is_key_down(Key::T) {
        SLOW_MOTION_SCALE
    } else if allow_fast && input.is_key_down(Key::Y) {
        FAST_MOTION_SCALE
    } else {
        1.0
    };
    clock.set_time_scale(scale);

    if input.was_key_just_pressed(Key::O) {
        clock.step_single_frame();
        log::debug!("clock step requested (pending={})", clock.is_step_pending());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::SharedInput;

    #[test]
    fn fast_motion_only_when_allowed() {
        let input = SharedInput::new();
        input.press(Key::Y);

        let mut clock = Clock::default();
        apply_time_controls(&mut clock, &input, false);
        assert_eq!(clock.time_scale(), 1.0);
        apply_time_controls(&mut clock, &input, true);
        assert_eq!(clock.time_scale(), FAST_MOTION_SCALE);

        input.press(Key::T);
        apply_time_controls(&mut clock, &input, true);
        assert_eq!(clock.time_scale(), SLOW_MOTION_SCALE);
    }

    #[test]
    fn pause_toggles_on_each_press() {
        let input = SharedInput::new();
        let mut clock = Clock::default();

        input.tap(Key::P);
        apply_time_controls(&mut clock, &input, false);
        assert!(clock.is_paused());
        input.with(|s| s.end_frame());

        input.tap(Key::P);
        apply_time_controls(&mut clock, &input, false);
        assert!(!clock.is_paused());
    }

    #[test]
    fn step_key_only_arms_a_paused_clock() {
        let input = SharedInput::new();
        let mut clock = Clock::default();

        input.tap(Key::O);
        apply_time_controls(&mut clock, &input, false);
        assert!(!clock.is_step_pending());

        clock.pause();
        apply_time_controls(&mut clock, &input, false);
        assert!(clock.is_step_pending());
    }
}
