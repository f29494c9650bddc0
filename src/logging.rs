/*!
 * Stderr logger for applications embedding the pipeline.
 *
 * The library itself only logs through the `log` facade; `init` installs a
 * coloured, timestamped backend for callers that have none of their own.
 */

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

use crate::app_config::LogLevel;

struct PipelineLogger {
    level: LevelFilter,
}

impl PipelineLogger {
    // ANSI colour per level
    fn color(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "0;37",
        }
    }

    fn label(level: Level) -> &'static str {
        match level {
            Level::Error => "ERROR",
            Level::Warn => "WARN ",
            Level::Info => "INFO ",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        }
    }
}

impl Log for PipelineLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "\x1B[{}m{} {} {}\x1B[0m",
            Self::color(record.level()),
            now,
            Self::label(record.level()),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the logger as the global `log` backend. Fails if a backend is
/// already installed.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    let level = LevelFilter::from(level);
    log::set_boxed_logger(Box::new(PipelineLogger { level }))?;
    log::set_max_level(level);
    Ok(())
}
