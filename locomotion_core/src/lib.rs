//! Locomotion core
//!
//! Per-frame orchestration for the locomotion sandbox: the Attract/Play mode
//! machine, the clock hierarchy and entity dispatch. Windowing, rendering,
//! input devices and the console are reached only through [`host`].

pub mod app;
pub mod attract;
pub mod camera;
pub mod clock;
pub mod config;
pub mod debug;
pub mod entity;
pub mod error;
pub mod host;
pub mod log;
pub mod math;
pub mod phase;
pub mod play;
pub mod player;
pub mod prop;
pub mod scope;
pub mod telemetry;
pub mod time;

pub use app::{App, ModeKind};
pub use clock::{Clock, ClockId, ClockTree, NOMINAL_STEP_SECONDS};
pub use config::AppConfig;
pub use error::{ClockError, CoreError, CoreResult};
pub use host::Host;
