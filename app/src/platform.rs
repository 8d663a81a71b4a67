use std::cell::Cell;
use std::rc::Rc;

use anyhow::Result;
use locomotion_core::host::{Host, Key, NullRenderer, SharedDebugQueue, SharedInput, WindowHost};
use locomotion_core::time::FrameTimer;
use locomotion_core::{App, AppConfig};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{DeviceEvent, DeviceId, ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{CursorGrabMode, Window, WindowAttributes, WindowId},
};

use crate::console::DevConsole;
use crate::gamepad::Gamepads;
use crate::mesh::TriangleMeshBuilder;
use crate::signals::QuitSignal;

pub fn run(cfg: AppConfig) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut runner = Runner::new(cfg);
    event_loop.run_app(&mut runner)?;
    Ok(())
}

/// Focus and aspect as last reported by window events.
struct WinitWindow {
    focus: Rc<Cell<bool>>,
    aspect: Rc<Cell<f32>>,
}

impl WindowHost for WinitWindow {
    fn has_focus(&self) -> bool {
        self.focus.get()
    }

    fn client_aspect(&self) -> f32 {
        self.aspect.get()
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Space => Key::Space,
        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::F1 => Key::F1,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyA => Key::A,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyE => Key::E,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Numpad0 => Key::Numpad0,
        KeyCode::Numpad1 => Key::Numpad1,
        _ => return None,
    })
}

/// winit glue around [`App`]: translates events into the shared host state
/// and drives one tick per `about_to_wait`.
struct Runner {
    cfg: AppConfig,
    app: Option<App>,

    window: Option<Window>,
    window_id: Option<WindowId>,

    input: SharedInput,
    focus: Rc<Cell<bool>>,
    aspect: Rc<Cell<f32>>,
    console_open: Rc<Cell<bool>>,
    gamepads: Option<Gamepads>,

    quit_signal: QuitSignal,
    timer: FrameTimer,
    cursor_mode: (bool, bool),
    shutdown_done: bool,
}

impl Runner {
    fn new(cfg: AppConfig) -> Self {
        let quit_signal = QuitSignal::new();
        if let Err(e) = quit_signal.install_ctrlc_handler() {
            log::warn!("ctrl-c handler not installed: {e}");
        }

        let aspect = cfg.window.client_aspect;
        Self {
            cfg,
            app: None,
            window: None,
            window_id: None,
            input: SharedInput::new(),
            focus: Rc::new(Cell::new(true)),
            aspect: Rc::new(Cell::new(aspect)),
            console_open: Rc::new(Cell::new(false)),
            gamepads: None,
            quit_signal,
            timer: FrameTimer::new(),
            cursor_mode: (false, false),
            shutdown_done: false,
        }
    }

    fn start(&mut self) -> Result<()> {
        let console = DevConsole::new();
        self.console_open = console.open_handle();

        let host = Host {
            renderer: Some(Box::new(NullRenderer::new())),
            debug: Box::new(SharedDebugQueue::new()),
            input: Box::new(self.input.clone()),
            window: Box::new(WinitWindow {
                focus: self.focus.clone(),
                aspect: self.aspect.clone(),
            }),
            console: Box::new(console),
            meshes: Box::new(TriangleMeshBuilder),
        };

        self.app = Some(App::new(self.cfg.clone(), host)?);
        self.gamepads = Gamepads::new(&self.input);
        self.timer.reset();
        log::info!("first frame");
        Ok(())
    }

    fn on_key(&mut self, code: KeyCode, state: ElementState, repeat: bool) {
        let pressed = state.is_pressed();

        if code == KeyCode::Backquote {
            if pressed && !repeat {
                self.toggle_console();
            }
            return;
        }

        // An open console swallows the keyboard; Escape closes it.
        if self.console_open.get() {
            if code == KeyCode::Escape && pressed && !repeat {
                self.toggle_console();
            }
            return;
        }

        if let Some(key) = map_key(code) {
            self.input.with(|s| s.apply_key(key, pressed, repeat));
        }
    }

    fn toggle_console(&mut self) {
        let open = !self.console_open.get();
        self.console_open.set(open);
        if open {
            self.input.with(|s| s.release_all());
        }
        log::debug!("console open={open}");
    }

    fn on_focus(&mut self, focused: bool) {
        self.focus.set(focused);
        if !focused {
            self.input.with(|s| s.release_all());
        }
        log::debug!("window focus={focused}");
    }

    /// Mirrors the requested cursor mode onto the OS window when it changes.
    fn apply_cursor_mode(&mut self) {
        let requested = self.input.cursor_mode();
        if requested == self.cursor_mode {
            return;
        }
        self.cursor_mode = requested;

        let Some(window) = self.window.as_ref() else { return };
        let (hidden, relative) = requested;
        window.set_cursor_visible(!hidden);

        let grab = if relative {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(e) = grab {
            log::warn!("cursor grab change failed: {e}");
        }
    }

    fn shutdown_once(&mut self, el: &ActiveEventLoop) {
        if self.shutdown_done {
            return;
        }
        self.shutdown_done = true;

        if let Some(app) = self.app.as_mut() {
            app.shutdown();
        }
        log::info!("shutdown");
        el.exit();
    }
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, el: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.cfg.window.title.clone())
            .with_inner_size(LogicalSize::new(self.cfg.window.width, self.cfg.window.height));

        let window = match el.create_window(attrs) {
            Ok(w) => w,
            Err(e) => {
                log::error!("failed to create window: {e}");
                el.exit();
                return;
            }
        };
        self.window_id = Some(window.id());
        self.window = Some(window);

        if let Err(e) = self.start() {
            log::error!("startup failed: {e:#}");
            self.shutdown_once(el);
        }
    }

    fn window_event(&mut self, _el: &ActiveEventLoop, id: WindowId, event: WindowEvent) {
        if Some(id) != self.window_id {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                if let Some(app) = self.app.as_mut() {
                    app.request_quit();
                }
            }
            WindowEvent::Focused(focused) => self.on_focus(focused),
            WindowEvent::Resized(size) if size.height > 0 => {
                self.aspect.set(size.width as f32 / size.height as f32);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    self.on_key(code, event.state, event.repeat);
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _el: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            if self.focus.get() {
                self.input.with(|s| s.apply_cursor_motion(dx.round() as i32, dy.round() as i32));
            }
        }
    }

    fn about_to_wait(&mut self, el: &ActiveEventLoop) {
        el.set_control_flow(if self.cfg.runtime.is_poll() {
            ControlFlow::Poll
        } else {
            ControlFlow::Wait
        });

        if let Some(pads) = self.gamepads.as_mut() {
            pads.poll(&self.input);
        }

        let Some(app) = self.app.as_mut() else { return };
        if self.quit_signal.is_raised() {
            app.request_quit();
        }

        app.run_frame(self.timer.next_delta());
        let quitting = app.is_quitting();

        if quitting {
            self.shutdown_once(el);
            return;
        }

        self.apply_cursor_mode();
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
