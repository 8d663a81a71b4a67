use std::cell::RefCell;
use std::rc::Rc;

use glam::IVec2;

use super::Input;

/// Keys the core reacts to. Bindings are fixed.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Escape,
    Space,
    Shift,
    F1,
    F8,
    F9,
    P,
    T,
    Y,
    O,
    W,
    A,
    S,
    D,
    Q,
    E,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Numpad0,
    Numpad1,
}

impl Key {
    pub const COUNT: usize = 25;

    #[inline(always)]
    pub fn to_index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ControllerButton {
    A,
    B,
    X,
    Y,
    Back,
    Start,
}

#[inline(always)]
fn button_bit(button: ControllerButton) -> u32 {
    1 << (button as u32)
}

/// Snapshot of one game controller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ControllerState {
    pub connected: bool,
    down_bits: u32,
    pressed_bits: u32,
}

impl ControllerState {
    #[inline]
    pub fn is_button_down(&self, button: ControllerButton) -> bool {
        self.connected && (self.down_bits & button_bit(button)) != 0
    }

    #[inline]
    pub fn was_button_just_pressed(&self, button: ControllerButton) -> bool {
        self.connected && (self.pressed_bits & button_bit(button)) != 0
    }
}

/// Keyboard / cursor / controller state fed by platform events.
///
/// Events may arrive any time between frames. Edges (`keys_pressed`,
/// controller presses) stay visible until [`InputState::end_frame`]; cursor
/// motion is accumulated and latched into the frame delta by
/// [`InputState::begin_frame`].
#[derive(Debug, Clone)]
pub struct InputState {
    keys_down: [bool; Key::COUNT],
    keys_pressed: [bool; Key::COUNT],
    keys_released: [bool; Key::COUNT],

    pending_cursor: IVec2,
    cursor_delta: IVec2,

    controller: ControllerState,

    cursor_hidden: bool,
    cursor_relative: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    #[inline]
    pub fn new() -> Self {
        Self {
            keys_down: [false; Key::COUNT],
            keys_pressed: [false; Key::COUNT],
            keys_released: [false; Key::COUNT],
            pending_cursor: IVec2::ZERO,
            cursor_delta: IVec2::ZERO,
            controller: ControllerState::default(),
            cursor_hidden: false,
            cursor_relative: false,
        }
    }

    #[inline(always)]
    pub fn begin_frame(&mut self) {
        self.cursor_delta = self.pending_cursor;
        self.pending_cursor = IVec2::ZERO;
    }

    #[inline(always)]
    pub fn end_frame(&mut self) {
        self.keys_pressed = [false; Key::COUNT];
        self.keys_released = [false; Key::COUNT];
        self.controller.pressed_bits = 0;
        self.cursor_delta = IVec2::ZERO;
    }

    pub fn apply_key(&mut self, key: Key, pressed: bool, repeat: bool) {
        let idx = key.to_index();
        if pressed {
            if !repeat && !self.keys_down[idx] {
                self.keys_pressed[idx] = true;
            }
            self.keys_down[idx] = true;
        } else {
            if self.keys_down[idx] {
                self.keys_released[idx] = true;
            }
            self.keys_down[idx] = false;
        }
    }

    /// Focus loss: every held key is released.
    pub fn release_all(&mut self) {
        for key in 0..Key::COUNT {
            if self.keys_down[key] {
                self.keys_released[key] = true;
            }
            self.keys_down[key] = false;
        }
        self.controller.down_bits = 0;
    }

    #[inline]
    pub fn apply_cursor_motion(&mut self, dx: i32, dy: i32) {
        self.pending_cursor += IVec2::new(dx, dy);
    }

    pub fn set_controller_connected(&mut self, connected: bool) {
        self.controller.connected = connected;
        if !connected {
            self.controller.down_bits = 0;
            self.controller.pressed_bits = 0;
        }
    }

    pub fn apply_controller_button(&mut self, button: ControllerButton, pressed: bool) {
        let bit = button_bit(button);
        if pressed {
            if (self.controller.down_bits & bit) == 0 {
                self.controller.pressed_bits |= bit;
            }
            self.controller.down_bits |= bit;
        } else {
            self.controller.down_bits &= !bit;
        }
    }

    #[inline]
    pub fn is_key_down(&self, key: Key) -> bool {
        self.keys_down[key.to_index()]
    }

    #[inline]
    pub fn was_key_just_pressed(&self, key: Key) -> bool {
        self.keys_pressed[key.to_index()]
    }

    #[inline]
    pub fn was_key_just_released(&self, key: Key) -> bool {
        self.keys_released[key.to_index()]
    }

    #[inline]
    pub fn controller(&self) -> ControllerState {
        self.controller
    }

    #[inline]
    pub fn cursor_delta(&self) -> IVec2 {
        self.cursor_delta
    }

    #[inline]
    pub fn set_cursor_mode(&mut self, hidden: bool, relative: bool) {
        self.cursor_hidden = hidden;
        self.cursor_relative = relative;
    }

    /// Last requested (hidden, relative) cursor mode.
    #[inline]
    pub fn cursor_mode(&self) -> (bool, bool) {
        (self.cursor_hidden, self.cursor_relative)
    }
}

/// [`Input`] over a shared [`InputState`] so the platform side can keep
/// feeding events while the core owns the trait object.
#[derive(Debug, Clone, Default)]
pub struct SharedInput(Rc<RefCell<InputState>>);

impl SharedInput {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with<R>(&self, f: impl FnOnce(&mut InputState) -> R) -> R {
        f(&mut self.0.borrow_mut())
    }

    pub fn press(&self, key: Key) {
        self.with(|s| s.apply_key(key, true, false));
    }

    pub fn release(&self, key: Key) {
        self.with(|s| s.apply_key(key, false, false));
    }

    /// Press and release within the same frame: an edge without a hold.
    pub fn tap(&self, key: Key) {
        self.with(|s| {
            s.apply_key(key, true, false);
            s.apply_key(key, false, false);
        });
    }

    #[inline]
    pub fn cursor_mode(&self) -> (bool, bool) {
        self.0.borrow().cursor_mode()
    }
}

impl Input for SharedInput {
    fn begin_frame(&mut self) {
        self.0.borrow_mut().begin_frame();
    }

    fn end_frame(&mut self) {
        self.0.borrow_mut().end_frame();
    }

    fn is_key_down(&self, key: Key) -> bool {
        self.0.borrow().is_key_down(key)
    }

    fn was_key_just_pressed(&self, key: Key) -> bool {
        self.0.borrow().was_key_just_pressed(key)
    }

    fn controller(&self, index: usize) -> ControllerState {
        if index == 0 {
            self.0.borrow().controller()
        } else {
            ControllerState::default()
        }
    }

    fn cursor_client_delta(&self) -> IVec2 {
        self.0.borrow().cursor_delta()
    }

    fn set_cursor_mode(&mut self, hidden: bool, relative: bool) {
        self.0.borrow_mut().set_cursor_mode(hidden, relative);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_count_matches_last_variant() {
        assert_eq!(Key::Numpad1.to_index() + 1, Key::COUNT);
    }

    #[test]
    fn press_edge_survives_until_end_frame() {
        let mut s = InputState::new();
        s.apply_key(Key::Space, true, false);
        s.begin_frame();
        assert!(s.was_key_just_pressed(Key::Space));
        assert!(s.is_key_down(Key::Space));
        s.end_frame();
        assert!(!s.was_key_just_pressed(Key::Space));
        assert!(s.is_key_down(Key::Space));
    }

    #[test]
    fn repeat_does_not_create_an_edge() {
        let mut s = InputState::new();
        s.apply_key(Key::W, true, false);
        s.end_frame();
        s.apply_key(Key::W, true, true);
        assert!(!s.was_key_just_pressed(Key::W));
    }

    #[test]
    fn tap_leaves_edge_but_no_hold() {
        let mut s = InputState::new();
        s.apply_key(Key::P, true, false);
        s.apply_key(Key::P, false, false);
        assert!(s.was_key_just_pressed(Key::P));
        assert!(s.was_key_just_released(Key::P));
        assert!(!s.is_key_down(Key::P));
    }

    #[test]
    fn cursor_motion_is_latched_per_frame() {
        let mut s = InputState::new();
        s.apply_cursor_motion(3, -2);
        s.apply_cursor_motion(1, 1);
        assert_eq!(s.cursor_delta(), IVec2::ZERO);
        s.begin_frame();
        assert_eq!(s.cursor_delta(), IVec2::new(4, -1));
        s.end_frame();
        assert_eq!(s.cursor_delta(), IVec2::ZERO);
    }

    #[test]
    fn controller_requires_connection() {
        let mut s = InputState::new();
        s.apply_controller_button(ControllerButton::A, true);
        assert!(!s.controller().is_button_down(ControllerButton::A));
        s.set_controller_connected(true);
        s.apply_controller_button(ControllerButton::A, true);
        assert!(s.controller().is_button_down(ControllerButton::A));
        assert!(s.controller().was_button_just_pressed(ControllerButton::A));
        s.end_frame();
        assert!(!s.controller().was_button_just_pressed(ControllerButton::A));
        assert!(s.controller().is_button_down(ControllerButton::A));
    }

    #[test]
    fn release_all_drops_holds() {
        let mut s = InputState::new();
        s.apply_key(Key::Shift, true, false);
        s.release_all();
        assert!(!s.is_key_down(Key::Shift));
        assert!(s.was_key_just_released(Key::Shift));
    }
}
