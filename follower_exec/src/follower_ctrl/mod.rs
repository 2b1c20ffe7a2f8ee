//! # Follower control module
//!
//! The follower's tick loop. It is invoked three ways:
//!
//! - [`State::proc`](util::module::State::proc) on every scheduled control tick, producing the
//!   demands for the actuator driver,
//! - [`FollowerCtrl::on_messages`] when leader and/or command messages arrive on the broadcast
//!   channels,
//! - [`FollowerCtrl::on_direct_cmd`] for commands issued by the host itself.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod params;
mod report;
mod state;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::ActuatorDems;

pub use params::*;
pub use report::*;
pub use state::*;

use crate::{
    cmd_processor::{CmdError, CmdParseError},
    persist::PersistError,
};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The follower's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowerMode {
    /// No leader data has been received yet.
    Idle,

    /// Following the leader automatically.
    Tracking,

    /// An operator has control of the vehicle.
    Overridden,

    /// The follower has stopped after a fatal error and must be re-initialised.
    Halted,
}

/// Possible errors that can occur during FollowerCtrl operation.
#[derive(Debug, thiserror::Error)]
pub enum FollowerCtrlError {
    #[error("No natural gravity detected, halting")]
    NoGravity,

    #[error("The follower is halted and must be re-initialised")]
    Halted,

    #[error("The follower has not been initialised")]
    NotInitialised,

    #[error("Could not parse command: {0}")]
    CmdParseError(#[from] CmdParseError),

    #[error("Could not execute command: {0}")]
    CmdError(#[from] CmdError),

    #[error("Persistence error: {0}")]
    PersistError(#[from] PersistError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for FollowerMode {
    fn default() -> Self {
        FollowerMode::Idle
    }
}

impl FollowerCtrlError {
    /// Demands which must be sent to the actuator driver when this error occurs.
    pub fn dems(&self) -> Option<ActuatorDems> {
        match self {
            FollowerCtrlError::NoGravity => Some(ActuatorDems::Reset),
            _ => None
        }
    }

    /// True if the error means the control loop cannot continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, FollowerCtrlError::NoGravity | FollowerCtrlError::Halted)
    }
}
