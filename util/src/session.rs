//! # Session
//!
//! A session is a single run of an executable. Each session gets its own timestamped directory
//! under `$FOLLOWER_SW_ROOT/<sessions_dir>` holding its log file. The `$FOLLOWER_SW_ROOT/storage`
//! directory is shared by all sessions, so state persisted there survives restarts.
//!
//! The time at which the session was created is the session epoch. Log timestamps and command
//! script times are measured from it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::{host, time};

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// strftime format used to stamp session directory names.
const DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Name of the directory shared between sessions.
pub const STORAGE_DIR_NAME: &str = "storage";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Clone, Debug)]
pub struct Session {
    /// This session's own directory.
    pub session_root: PathBuf,

    /// Directory for state which must outlive the session, such as the follower's volatile state
    /// and named configurations.
    pub storage_root: PathBuf,

    /// The session's log file.
    pub log_file_path: PathBuf,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("FOLLOWER_SW_ROOT is not set")]
    SwRootNotSet,

    #[error("Cannot create directory {0:?}: {1}")]
    CannotCreateDir(PathBuf, std::io::Error),

    #[error("A session has already been started in this process")]
    AlreadyStarted,

    #[error("No session has been started")]
    NotStarted,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Session {
    /// Start the session, creating `<sessions_dir>/<exec_name>_<timestamp>` and the shared storage
    /// directory under the software root.
    ///
    /// Only one session may be started per process.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = host::get_follower_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        SESSION_EPOCH.try_init_once(Utc::now).map_err(|_| SessionError::AlreadyStarted)?;
        let epoch = get_epoch()?;

        let session_root = root
            .join(sessions_dir)
            .join(session_dir_name(exec_name, epoch));
        let storage_root = root.join(STORAGE_DIR_NAME);

        create_dir(&session_root)?;
        create_dir(&storage_root)?;

        Ok(Session {
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
            storage_root,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Seconds elapsed since the session started, or `NAN` if no session has started.
pub fn get_elapsed_seconds() -> f64 {
    SESSION_EPOCH.get()
        .and_then(|e| time::duration_to_seconds(Utc::now() - *e))
        .unwrap_or(f64::NAN)
}

/// The time the session started.
pub fn get_epoch() -> Result<&'static DateTime<Utc>, SessionError> {
    SESSION_EPOCH.get().ok_or(SessionError::NotStarted)
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn session_dir_name(exec_name: &str, epoch: &DateTime<Utc>) -> String {
    format!("{}_{}", exec_name, epoch.format(DIR_TIMESTAMP_FORMAT))
}

fn create_dir(path: &Path) -> Result<(), SessionError> {
    fs::create_dir_all(path).map_err(|e| SessionError::CannotCreateDir(path.to_path_buf(), e))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_session_dir_name() {
        let epoch = Utc.ymd(2021, 3, 7).and_hms(14, 5, 9);
        assert_eq!(session_dir_name("follower_exec", &epoch), "follower_exec_20210307_140509");
    }
}
