// Logger setup for the binaries.
//
// The TUI owns the terminal, so it logs to a file in the cache directory.
// One-shot CLI commands log to stderr.
use crate::config::Config;
use crate::context::AppContext;
use anyhow::{Context, Result};
use simplelog::{ColorChoice, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;

fn log_config() -> simplelog::Config {
    simplelog::ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Error)
        .set_thread_level(log::LevelFilter::Off)
        .build()
}

pub fn init_file_logger(ctx: &dyn AppContext, config: &Config) -> Result<()> {
    let path = ctx
        .get_log_path()
        .ok_or_else(|| anyhow::anyhow!("Could not determine log file location"))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;
    WriteLogger::init(config.log_level.to_filter(), log_config(), file)
        .context("Logger already initialized")?;
    Ok(())
}

pub fn init_term_logger(config: &Config) -> Result<()> {
    TermLogger::init(
        config.log_level.to_filter(),
        log_config(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )
    .context("Logger already initialized")?;
    Ok(())
}

/// Appends panics to `hosanna_panic.log` before the default hook runs.
pub fn install_panic_hook(ctx: &dyn AppContext) {
    let Some(path) = ctx.get_panic_log_path() else {
        return;
    };
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) {
            let _ = writeln!(file, "PANIC: {:?}", info);
        }
        default_hook(info);
    }));
}
