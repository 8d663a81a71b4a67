use std::io::Write;

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

use crate::config::LogConfig;
use crate::error::{CoreError, CoreResult};

/// Resolved logger settings: config file values, then environment overrides.
#[derive(Debug, Clone)]
pub struct ConsoleLoggerConfig {
    pub level: LevelFilter,
    pub colors: bool,
    pub include_module: bool,
}

impl ConsoleLoggerConfig {
    pub fn from_config(cfg: &LogConfig) -> Self {
        let level = std::env::var("LOCOMOTION_LOG")
            .ok()
            .and_then(|v| v.parse::<LevelFilter>().ok())
            .or_else(|| cfg.level.parse::<LevelFilter>().ok())
            .unwrap_or(LevelFilter::Info);
        let colors = std::env::var("LOCOMOTION_LOG_COLORS")
            .ok()
            .map(|v| v != "0")
            .unwrap_or(cfg.colors);
        let include_module = std::env::var("LOCOMOTION_LOG_MODULE")
            .ok()
            .map(|v| v != "0")
            .unwrap_or(cfg.include_module);

        Self {
            level,
            colors,
            include_module,
        }
    }
}

/// Installs the process-wide console logger. Fails if one is already set.
pub fn init_logger(cfg: &LogConfig) -> CoreResult<()> {
    let config = ConsoleLoggerConfig::from_config(cfg);

    let mut builder = Builder::new();
    builder.filter_level(config.level);
    builder.write_style(if config.colors {
        WriteStyle::Auto
    } else {
        WriteStyle::Never
    });

    let include_module = config.include_module;
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        if include_module {
            writeln!(
                buf,
                "[{}{:<5}{}] {:<25} {}",
                style.render(),
                record.level(),
                style.render_reset(),
                record.target(),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "[{}{:<5}{}] {}",
                style.render(),
                record.level(),
                style.render_reset(),
                record.args()
            )
        }
    });

    builder
        .try_init()
        .map_err(|e| CoreError::Logger(e.to_string()))
}
