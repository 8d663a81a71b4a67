use std::time::Duration;

use crate::phase::FramePhase;

/// Frame statistics and the periodic FPS log line.
///
/// FPS is measured over the raw (unscaled) delta, so it keeps reporting while
/// the active clock is paused.
pub struct Telemetry {
    pub fps: f32,
    pub dt_ms: f32,
    pub frames: u64,

    fps_elapsed: f32,
    fps_frames: u32,
    fps_period_sec: f32,
    fps_enabled: bool,

    phases: Vec<(FramePhase, Duration)>,
}

impl Default for Telemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl Telemetry {
    pub fn new() -> Self {
        Self {
            fps: 0.0,
            dt_ms: 0.0,
            frames: 0,
            fps_elapsed: 0.0,
            fps_frames: 0,
            fps_period_sec: 1.0,
            fps_enabled: true,
            phases: Vec::with_capacity(FramePhase::ORDER.len()),
        }
    }

    pub fn configure_fps_logging(&mut self, enabled: bool, period_sec: f32) {
        self.fps_enabled = enabled;
        self.fps_period_sec = period_sec.max(0.25);
    }

    /// Called at the start of a tick; forgets the previous tick's phases.
    #[inline]
    pub fn begin_frame(&mut self) {
        self.phases.clear();
    }

    #[inline]
    pub fn record_scope(&mut self, phase: FramePhase, dur: Duration) {
        log::trace!("phase {} took {:?}", phase.as_str(), dur);
        self.phases.push((phase, dur));
    }

    /// Phases that ran during the current (or last completed) tick, in order.
    pub fn phases(&self) -> impl Iterator<Item = FramePhase> + '_ {
        self.phases.iter().map(|(p, _)| *p)
    }

    pub fn frame_tick(&mut self, raw_dt_sec: f32) {
        self.dt_ms = raw_dt_sec * 1000.0;
        self.frames += 1;

        if !self.fps_enabled {
            return;
        }

        self.fps_frames += 1;
        self.fps_elapsed += raw_dt_sec;

        if self.fps_elapsed >= self.fps_period_sec {
            let secs = self.fps_elapsed.max(0.0001);
            self.fps = (self.fps_frames as f32) / secs;

            log::info!("fps={:.1} dt_ms={:.2} frames={}", self.fps, self.dt_ms, self.frames);

            self.fps_frames = 0;
            self.fps_elapsed = 0.0;
        }
    }
}
