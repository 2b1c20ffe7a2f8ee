//! # Logger
//!
//! Sets up the `log` facade to write every record both to the terminal, with coloured level tags,
//! and to the session's log file. Each line is stamped with the seconds elapsed since the session
//! epoch.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use colored::Colorize;
use log::{info, Level, Record};
use std::fmt;
use thiserror::Error;

use crate::session::{self, Session};

pub use log::LevelFilter;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Could not open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger has already been set: {0}")]
    FernInitError(log::SetLoggerError),
}

/// How the level tag of a line is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LevelStyle {
    Coloured,
    Plain,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Initialise logging for this execution. May only be called once per process.
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    fern::Dispatch::new()
        .level(min_level)
        // zmq is very chatty below info
        .level_for("zmq", LevelFilter::Info)
        .chain(dispatch(LevelStyle::Coloured).chain(std::io::stdout()))
        .chain(dispatch(LevelStyle::Plain).chain(log_file))
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Ok(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {:?}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn dispatch(style: LevelStyle) -> fern::Dispatch {
    fern::Dispatch::new().format(move |out, message, record| {
        out.finish(format_args!(
            "{}",
            format_line(session::get_elapsed_seconds(), record, message, style)
        ))
    })
}

/// Build one log line. Records below info also show their target module.
fn format_line(
    elapsed_s: f64,
    record: &Record,
    message: &fmt::Arguments,
    style: LevelStyle
) -> String {
    let tag = level_tag(record.level());
    let tag = match style {
        LevelStyle::Plain => tag.to_string(),
        LevelStyle::Coloured => match record.level() {
            Level::Trace => tag.dimmed().italic().to_string(),
            Level::Debug => tag.dimmed().to_string(),
            Level::Info => tag.normal().to_string(),
            Level::Warn => tag.yellow().to_string(),
            Level::Error => tag.red().bold().to_string(),
        }
    };

    if record.level() > Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, tag, record.target(), message)
    }
    else {
        format!("[{:10.6} {}] {}", elapsed_s, tag, message)
    }
}

fn level_tag(level: Level) -> &'static str {
    match level {
        Level::Trace => "TRC",
        Level::Debug => "DBG",
        Level::Info => "INF",
        Level::Warn => "WRN",
        Level::Error => "ERR",
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_line() {
        let record = Record::builder()
            .args(format_args!("Offset re-anchored"))
            .level(Level::Debug)
            .target("follower_lib::follower_ctrl")
            .build();

        assert_eq!(
            format_line(1.5, &record, record.args(), LevelStyle::Plain),
            "[  1.500000 DBG] follower_lib::follower_ctrl: Offset re-anchored"
        );

        let record = Record::builder()
            .args(format_args!("Stopped."))
            .level(Level::Info)
            .target("follower_lib::follower_ctrl")
            .build();

        assert_eq!(
            format_line(12.0, &record, record.args(), LevelStyle::Plain),
            "[ 12.000000 INF] Stopped."
        );
    }
}
