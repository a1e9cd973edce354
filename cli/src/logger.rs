//! A small stderr logger for the `log` facade, colored by level.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use owo_colors::OwoColorize;

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = match record.level() {
            Level::Error => "error".red().bold().to_string(),
            Level::Warn => "warn".yellow().bold().to_string(),
            Level::Info => "info".cyan().to_string(),
            Level::Debug => "debug".bright_black().to_string(),
            Level::Trace => "trace".bright_black().to_string(),
        };
        eprintln!(
            "{level:>5} {} {}",
            record.target().bright_black(),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Install the logger; each `-v` raises verbosity by one level from `warn`.
pub fn init(verbosity: u8) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level_filter(verbosity));
    Ok(())
}

fn level_filter(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}
