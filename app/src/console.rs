use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

use locomotion_core::camera::Camera;
use locomotion_core::host::Console;
use locomotion_core::math::Rgba8;

const MAX_LINES: usize = 256;
const LINE_HEIGHT: f32 = 15.0;

/// Scrollback console toggled from the keyboard.
///
/// There is no text backend, so lines are echoed to the log as they arrive
/// and rendering only tracks how many would fit on screen.
pub struct DevConsole {
    open: Rc<Cell<bool>>,
    lines: VecDeque<(Rgba8, String)>,
    visible_lines: usize,
}

impl DevConsole {
    pub fn new() -> Self {
        Self {
            open: Rc::new(Cell::new(false)),
            lines: VecDeque::with_capacity(MAX_LINES),
            visible_lines: 0,
        }
    }

    /// Flag shared with the event loop.
    pub fn open_handle(&self) -> Rc<Cell<bool>> {
        self.open.clone()
    }
}

impl Console for DevConsole {
    fn is_open(&self) -> bool {
        self.open.get()
    }

    fn render(&mut self, camera: &Camera) {
        if !self.open.get() {
            self.visible_lines = 0;
            return;
        }
        let rows = camera
            .ortho_bounds()
            .map_or(0, |(bl, tr)| ((tr.y - bl.y) / LINE_HEIGHT).max(0.0) as usize);
        let visible = rows.min(self.lines.len());
        if visible != self.visible_lines {
            log::trace!("console shows {visible} of {} lines", self.lines.len());
        }
        self.visible_lines = visible;
    }

    fn add_line(&mut self, color: Rgba8, text: &str) {
        log::info!(target: "console", "{text}");
        if self.lines.len() == MAX_LINES {
            self.lines.pop_front();
        }
        self.lines.push_back((color, text.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;

    use super::*;

    #[test]
    fn scrollback_is_bounded() {
        let mut c = DevConsole::new();
        for i in 0..(MAX_LINES + 10) {
            c.add_line(Rgba8::WHITE, &format!("line {i}"));
        }
        assert_eq!(c.lines.len(), MAX_LINES);
        assert_eq!(c.lines.front().map(|(_, t)| t.as_str()), Some("line 10"));
    }

    #[test]
    fn visible_lines_follow_screen_height_when_open() {
        let mut c = DevConsole::new();
        for _ in 0..100 {
            c.add_line(Rgba8::WHITE, "x");
        }
        let camera = Camera::orthographic(Vec2::ZERO, Vec2::new(200.0, 150.0));

        c.render(&camera);
        assert_eq!(c.visible_lines, 0);

        c.open_handle().set(true);
        c.render(&camera);
        assert_eq!(c.visible_lines, 10);
    }
}
