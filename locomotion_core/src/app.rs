use std::time::Instant;

use crate::attract::AttractMode;
use crate::clock::{Clock, ClockTree};
use crate::config::AppConfig;
use crate::entity::ScopeId;
use crate::error::{ClockError, CoreResult};
use crate::host::{ControllerButton, Host, Key};
use crate::math::Rgba8;
use crate::phase::FramePhase;
use crate::play::PlayMode;
use crate::scope::{SetupCtx, UpdateCtx};
use crate::telemetry::Telemetry;

const HELP_MAJOR: Rgba8 = Rgba8::YELLOW;
const HELP_MINOR: Rgba8 = Rgba8::rgb(200, 200, 200);

const CONTROLS_HELP: &[(bool, &str)] = &[
    (true, "Major Controls"),
    (false, "- W/S/A/D : XY movement"),
    (false, "- Q/E     : Z movement"),
    (false, "- Shift   : Sprint"),
    (false, "- 1..7    : Debug sphere, line, basis, billboard text, cylinder, point, message"),
    (false, "- P/T/O   : Pause, slow motion, single step"),
    (false, "- F1      : Toggle debug view"),
    (false, "- Num0/1  : Moving point trail / sine spheres"),
    (true, "Other Controls"),
    (false, "- Space   : Start game from attract mode"),
    (false, "- Esc     : Quit in attract mode, back to attract mode in game"),
    (false, "- F8 / F9 : Restart game / back to attract mode"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeKind {
    Attract,
    Play,
}

enum Mode {
    Attract(AttractMode),
    Play(PlayMode),
}

impl Mode {
    fn kind(&self) -> ModeKind {
        match self {
            Mode::Attract(_) => ModeKind::Attract,
            Mode::Play(_) => ModeKind::Play,
        }
    }

    fn scope(&self) -> ScopeId {
        match self {
            Mode::Attract(m) => m.scope(),
            Mode::Play(m) => m.scope(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Transition {
    /// Tear down the active mode and build a fresh Attract scope.
    ToAttract,
    Quit,
    ToPlay,
    /// Rebuild Play keeping only the debug-view flag.
    ResetPlay,
}

/// What the global key rules decided for the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Run the live mode's update.
    Continue,
    /// End Update for this tick without touching the mode.
    Hold,
    Switch(Transition),
}

/// Top-level driver: owns the clock tree, the single live mode and every
/// collaborator, and runs one Begin/Update/Render/End pass per tick.
pub struct App {
    cfg: AppConfig,
    host: Host,
    clocks: ClockTree,
    mode: Option<Mode>,
    next_scope: u64,

    quitting: bool,
    shut_down: bool,

    telemetry: Telemetry,
    last_phase: Option<FramePhase>,
}

impl App {
    pub fn new(cfg: AppConfig, mut host: Host) -> CoreResult<Self> {
        let mut telemetry = Telemetry::new();
        telemetry.configure_fps_logging(cfg.frame.log_fps, cfg.frame.fps_log_period_sec());

        for &(major, line) in CONTROLS_HELP {
            host.console.add_line(if major { HELP_MAJOR } else { HELP_MINOR }, line);
        }

        let mut app = Self {
            cfg,
            host,
            clocks: ClockTree::new(),
            mode: None,
            next_scope: 1,
            quitting: false,
            shut_down: false,
            telemetry,
            last_phase: None,
        };

        let attract = app.build(ModeKind::Attract, false)?;
        app.mode = Some(attract);

        log::info!("app started in attract mode");
        Ok(app)
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.cfg
    }

    #[inline]
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Raises the process-wide quit flag. Honored at the next tick boundary.
    pub fn request_quit(&mut self) {
        if !self.quitting {
            log::info!("quit requested");
        }
        self.quitting = true;
    }

    #[inline]
    pub fn mode_kind(&self) -> Option<ModeKind> {
        self.mode.as_ref().map(Mode::kind)
    }

    /// Scope id of the live mode; a rebuilt scope always gets a new one.
    #[inline]
    pub fn scope_id(&self) -> Option<ScopeId> {
        self.mode.as_ref().map(Mode::scope)
    }

    pub fn attract(&self) -> Option<&AttractMode> {
        match self.mode.as_ref() {
            Some(Mode::Attract(m)) => Some(m),
            _ => None,
        }
    }

    pub fn play(&self) -> Option<&PlayMode> {
        match self.mode.as_ref() {
            Some(Mode::Play(m)) => Some(m),
            _ => None,
        }
    }

    /// Live entities; zero outside Play.
    pub fn entity_count(&self) -> usize {
        self.play().map_or(0, |p| p.entities().live_count())
    }

    /// Clock owned by the live mode.
    pub fn active_clock(&self) -> Option<&Clock> {
        match self.mode.as_ref()? {
            Mode::Attract(m) => m.clock(&self.clocks),
            Mode::Play(m) => m.clock(&self.clocks),
        }
    }

    #[inline]
    pub fn clocks(&self) -> &ClockTree {
        &self.clocks
    }

    #[inline]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Last phase that completed.
    #[inline]
    pub fn last_phase(&self) -> Option<FramePhase> {
        self.last_phase
    }

    /// One full tick. `raw_delta_seconds` is wall time since the previous tick.
    pub fn run_frame(&mut self, raw_delta_seconds: f32) {
        if self.shut_down {
            return;
        }

        let dt = self.clamp_delta(raw_delta_seconds);
        self.telemetry.begin_frame();

        self.run_phase(FramePhase::Begin, |app| app.begin_frame(dt));
        self.run_phase(FramePhase::Update, App::update);
        if !self.quitting {
            self.run_phase(FramePhase::Render, App::render);
        }
        self.run_phase(FramePhase::End, |app| app.end_frame(dt));
    }

    /// Top-down teardown: live mode first, then debug annotations.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.teardown_active();
        self.host.debug.clear();
        self.shut_down = true;
        log::info!("app shut down after {} frames", self.telemetry.frames);
    }

    fn clamp_delta(&self, raw: f32) -> f32 {
        if !raw.is_finite() {
            return 0.0;
        }
        raw.clamp(0.0, self.cfg.frame.max_dt_sec())
    }

    fn run_phase(&mut self, phase: FramePhase, f: impl FnOnce(&mut Self)) {
        let t0 = Instant::now();
        f(self);
        self.telemetry.record_scope(phase, t0.elapsed());
        self.last_phase = Some(phase);
    }

    fn begin_frame(&mut self, dt: f32) {
        self.clocks.tick(dt);
        let root_delta = self
            .clocks
            .get(self.clocks.root())
            .map_or(0.0, Clock::delta_seconds);

        self.host.input.begin_frame();
        self.host.window.begin_frame();
        if let Some(renderer) = self.host.renderer.as_deref_mut() {
            renderer.begin_frame();
        }
        self.host.console.begin_frame();
        self.host.debug.begin_frame(root_delta);

        if let Some(Mode::Play(play)) = self.mode.as_mut() {
            play.begin_frame();
        }
    }

    fn update(&mut self) {
        self.update_cursor_state();

        // A quit raised before this tick wins over anything pressed in it.
        if self.quitting {
            return;
        }

        match self.global_rules() {
            Flow::Continue => {}
            Flow::Hold => return,
            Flow::Switch(transition) => {
                self.apply(transition);
                return;
            }
        }

        let mut ctx = UpdateCtx {
            clocks: &mut self.clocks,
            input: self.host.input.as_mut(),
            window: self.host.window.as_ref(),
            console: self.host.console.as_ref(),
            debug: self.host.debug.as_mut(),
            meshes: self.host.meshes.as_ref(),
        };
        match self.mode.as_mut() {
            Some(Mode::Attract(m)) => m.update(&mut ctx),
            Some(Mode::Play(m)) => m.update(&mut ctx),
            None => {}
        }
    }

    fn render(&mut self) {
        let Some(renderer) = self.host.renderer.as_deref_mut() else {
            return;
        };

        let screen_camera = match self.mode.as_ref() {
            Some(Mode::Attract(m)) => {
                m.render(renderer);
                m.screen_camera()
            }
            Some(Mode::Play(m)) => {
                m.render(renderer, self.host.debug.as_mut());
                m.screen_camera()
            }
            None => return,
        };

        self.host.console.render(screen_camera);
    }

    fn end_frame(&mut self, dt: f32) {
        self.host.input.end_frame();
        self.host.window.end_frame();
        if let Some(renderer) = self.host.renderer.as_deref_mut() {
            renderer.end_frame();
        }
        self.host.console.end_frame();
        self.host.debug.end_frame();

        if let Some(Mode::Play(play)) = self.mode.as_mut() {
            play.end_frame();
        }

        self.telemetry.frame_tick(dt);
    }

    /// Hidden, relative cursor only while playing with focus and no console.
    fn update_cursor_state(&mut self) {
        let captured = self.host.window.has_focus()
            && self.mode_kind() == Some(ModeKind::Play)
            && !self.host.console.is_open();
        self.host.input.set_cursor_mode(captured, captured);
    }

    /// Evaluated in order; the first rule that fires decides the tick.
    fn global_rules(&self) -> Flow {
        let Some(kind) = self.mode_kind() else {
            return Flow::Continue;
        };
        let input = self.host.input.as_ref();

        if input.was_key_just_pressed(Key::Escape) {
            return Flow::Switch(match kind {
                ModeKind::Play => Transition::ToAttract,
                ModeKind::Attract => Transition::Quit,
            });
        }

        let confirm = input.was_key_just_pressed(Key::Space) || input.controller(0).is_button_down(ControllerButton::A);
        if kind == ModeKind::Attract && confirm {
            return Flow::Switch(Transition::ToPlay);
        }

        if input.was_key_just_pressed(Key::F8) {
            return match kind {
                ModeKind::Play => Flow::Switch(Transition::ResetPlay),
                ModeKind::Attract => {
                    log::debug!("reset in place has no effect in attract; tick held");
                    Flow::Hold
                }
            };
        }

        if input.was_key_just_pressed(Key::F9) {
            return Flow::Switch(Transition::ToAttract);
        }

        Flow::Continue
    }

    fn apply(&mut self, transition: Transition) {
        log::info!("transition {:?} from {:?}", transition, self.mode_kind());

        let keep_debug_view = self.play().is_some_and(PlayMode::show_debug_view);
        self.teardown_active();

        let next = match transition {
            Transition::Quit => {
                self.request_quit();
                return;
            }
            Transition::ToAttract => self.build(ModeKind::Attract, false),
            Transition::ToPlay => self.build(ModeKind::Play, false),
            Transition::ResetPlay => self.build(ModeKind::Play, keep_debug_view),
        };

        match next {
            Ok(mode) => self.mode = Some(mode),
            Err(e) => {
                log::error!("failed to build next mode: {e}");
                self.request_quit();
            }
        }
    }

    fn teardown_active(&mut self) {
        match self.mode.take() {
            Some(Mode::Attract(m)) => m.teardown(&mut self.clocks),
            Some(Mode::Play(m)) => m.teardown(&mut self.clocks),
            None => {}
        }
    }

    fn build(&mut self, kind: ModeKind, show_debug_view: bool) -> Result<Mode, ClockError> {
        debug_assert!(self.mode.is_none(), "previous mode must be torn down first");

        let scope = ScopeId(self.next_scope);
        self.next_scope += 1;

        let mut ctx = SetupCtx {
            clocks: &mut self.clocks,
            meshes: self.host.meshes.as_ref(),
            renderer: self.host.renderer.as_deref_mut(),
            window: self.host.window.as_ref(),
            camera: &self.cfg.camera,
        };
        match kind {
            ModeKind::Attract => AttractMode::new(scope, &mut ctx).map(Mode::Attract),
            ModeKind::Play => PlayMode::new(scope, &mut ctx, show_debug_view).map(Mode::Play),
        }
    }
}
