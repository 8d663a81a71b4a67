use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::clock::ClockId;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    #[error("clock {0:?} does not exist (destroyed or never created)")]
    UnknownClock(ClockId),
    #[error("the root clock cannot be destroyed")]
    RootClock,
}

/// Errors raised outside the frame loop (setup, configuration, bootstrap).
///
/// The frame loop itself never produces these: inside a tick every failure
/// is handled by short-circuiting.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("failed to read config {0}: {1}")]
    Io(PathBuf, #[source] io::Error),
    #[error("failed to parse config: {0}")]
    Config(#[from] toml::de::Error),
    #[error("logger init failed: {0}")]
    Logger(String),
    #[error(transparent)]
    Clock(#[from] ClockError),
}

pub type CoreResult<T> = Result<T, CoreError>;
