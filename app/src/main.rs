mod console;
mod gamepad;
mod mesh;
mod platform;
mod signals;

use anyhow::Context;
use locomotion_core::AppConfig;

const DEFAULT_CONFIG: &str = "locomotion.toml";

fn load_config() -> anyhow::Result<AppConfig> {
    match std::env::args().nth(1) {
        Some(path) => AppConfig::load_toml(&path).with_context(|| format!("loading config {path}")),
        None if std::path::Path::new(DEFAULT_CONFIG).exists() => {
            AppConfig::load_toml(DEFAULT_CONFIG).context("loading default config")
        }
        None => Ok(AppConfig::default()),
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = load_config()?;
    locomotion_core::log::init_logger(&cfg.log)?;
    log::info!("starting {}", cfg.window.title);
    platform::run(cfg)
}
