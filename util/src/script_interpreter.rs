//! # Command scripts
//!
//! Timed command scripts let a follower be driven locally without a console on the broadcast
//! bus. Every non-blank, non-comment line reads `<seconds>: <command>`:
//!
//! ```text
//! # fan out, then remember the position
//! 0.5: setoffset;10;0;-5
//! 12.0: save;convoy
//! ```
//!
//! Times are measured from the session start and must never go backwards.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::{collections::VecDeque, fs, path::Path};
use regex::Regex;
use thiserror::Error;

use crate::session::get_elapsed_seconds;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// `<time>: <command>`, surrounding whitespace allowed.
const LINE_PATTERN: &str = r"^\s*(\d+(?:\.\d+)?)\s*:\s*(\S.*?)\s*$";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One line of a script.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedCmd {
    /// Session time after which the command becomes due
    pub at_s: f64,

    /// Command text as the follower's command parser expects it
    pub text: String,
}

/// Hands out scripted commands as they fall due.
pub struct ScriptInterpreter {
    queue: VecDeque<ScriptedCmd>,
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("No script exists at {0}")]
    ScriptNotFound(String),

    #[error("Script could not be read: {0}")]
    ScriptLoadError(std::io::Error),

    #[error("Script contains no timed commands")]
    ScriptEmpty,

    #[error("Bad timestamp in script ({0}), expected seconds such as 2.5")]
    InvalidTimestamp(String),

    #[error("Script goes back in time: {1} s follows {0} s")]
    OutOfOrder(f64, f64),
}

/// Result of polling the interpreter.
#[derive(Debug, PartialEq)]
pub enum PendingCmds {
    /// Nothing due yet
    None,
    /// Commands now due, in script order
    Some(Vec<String>),
    /// Every command has been handed out
    EndOfScript,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScriptInterpreter {
    /// Load and parse the script at `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ScriptError> {
        let path = path.as_ref();

        if !path.is_file() {
            return Err(ScriptError::ScriptNotFound(path.display().to_string()));
        }

        let contents = fs::read_to_string(path).map_err(ScriptError::ScriptLoadError)?;

        Self::from_str(&contents)
    }

    /// Parse a script held in memory.
    pub fn from_str(script: &str) -> Result<Self, ScriptError> {
        Ok(Self { queue: Self::parse(script)? })
    }

    /// Turn script text into an ordered queue of commands.
    ///
    /// Lines that don't look like `<time>: <command>` are skipped.
    pub fn parse(script: &str) -> Result<VecDeque<ScriptedCmd>, ScriptError> {
        let line_re = Regex::new(LINE_PATTERN).map_err(|_| ScriptError::ScriptEmpty)?;

        let mut queue = VecDeque::new();
        let mut latest_s = 0.0;

        for caps in script.lines().filter_map(|l| line_re.captures(l)) {
            let (time, text) = match (caps.get(1), caps.get(2)) {
                (Some(t), Some(c)) => (t.as_str(), c.as_str()),
                _ => continue,
            };

            let at_s: f64 = time.parse()
                .map_err(|e| ScriptError::InvalidTimestamp(format!("{}: {}", time, e)))?;

            if at_s < latest_s {
                return Err(ScriptError::OutOfOrder(latest_s, at_s));
            }
            latest_s = at_s;

            queue.push_back(ScriptedCmd { at_s, text: text.to_string() });
        }

        if queue.is_empty() {
            Err(ScriptError::ScriptEmpty)
        } else {
            Ok(queue)
        }
    }

    /// Commands due at the current session time.
    pub fn get_pending_cmds(&mut self) -> PendingCmds {
        self.get_pending_cmds_at(get_elapsed_seconds())
    }

    /// Commands whose time is strictly before `now_s`, removed from the queue.
    pub fn get_pending_cmds_at(&mut self, now_s: f64) -> PendingCmds {
        if self.queue.is_empty() {
            return PendingCmds::EndOfScript;
        }

        let num_due = self.queue.iter().take_while(|c| c.at_s < now_s).count();

        match num_due {
            0 => PendingCmds::None,
            n => PendingCmds::Some(self.queue.drain(..n).map(|c| c.text).collect()),
        }
    }

    /// Commands not yet handed out.
    pub fn get_num_cmds(&self) -> usize {
        self.queue.len()
    }

    /// Time of the last command in the script.
    pub fn get_duration(&self) -> f64 {
        self.queue.back().map(|c| c.at_s).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
