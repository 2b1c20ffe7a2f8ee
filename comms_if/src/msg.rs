//! # Broadcast messages
//!
//! Messages are sent on named broadcast channels derived from the follower system ID. Two channels
//! exist per system:
//!
//! - `FSLeader<system_id>` carries the leader's pose and velocity.
//! - `FSCommand<system_id>` carries addressed follower commands.
//!
//! Payloads are JSON encoded [`InboundMsg`]s. The shape of a payload is decoded exactly once, when
//! it is taken off the wire, so that the rest of the system only ever deals with typed messages.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Isometry3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Prefix of the channel carrying leader pose messages.
pub const LEADER_CHANNEL_PREFIX: &str = "FSLeader";

/// Prefix of the channel carrying follower commands.
pub const COMMAND_CHANNEL_PREFIX: &str = "FSCommand";

// ------------------------------------------------------------------------------------------------
// TYPES
// ------------------------------------------------------------------------------------------------

/// Unique identifier of a vehicle on the broadcast network.
pub type EntityId = i64;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A leader pose message, normalised from either of the leader [`InboundMsg`] shapes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaderMsg {
    /// The leader's world frame, i.e. the transform from the leader's local frame into the world.
    pub pose: Isometry3<f64>,

    /// The leader's velocity in the world frame.
    ///
    /// Units: meters/second
    pub velocity_ms: Vector3<f64>,

    /// The vehicle which sent this message, if the sender tagged it.
    pub source_id: Option<EntityId>,
}

/// A command addressed to one or more followers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMsg {
    /// `;` separated list of follower IDs this command is for. Empty means all followers.
    pub addressees: String,

    /// The command string, for example `setoffset;10;0;0`.
    pub cmd: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// All message shapes which can arrive on the broadcast channels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InboundMsg {
    /// Leader pose without a sender tag.
    Leader {
        pose: Isometry3<f64>,
        velocity_ms: Vector3<f64>,
    },

    /// Leader pose tagged with the ID of the vehicle that sent it.
    LeaderWithSource {
        pose: Isometry3<f64>,
        velocity_ms: Vector3<f64>,
        source_id: EntityId,
    },

    /// An addressed command.
    Command(CommandMsg),
}

/// Errors which can occur while decoding a message.
#[derive(Debug, Error)]
pub enum MsgParseError {
    #[error("Message contains invalid JSON: {0}")]
    InvalidJson(serde_json::Error),

    #[error("Could not serialise the message: {0}")]
    SerialiseError(serde_json::Error),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl InboundMsg {
    /// Decode a message from its JSON payload.
    pub fn from_json(json_str: &str) -> Result<Self, MsgParseError> {
        serde_json::from_str(json_str).map_err(MsgParseError::InvalidJson)
    }

    /// Encode the message as a JSON payload.
    pub fn to_json(&self) -> Result<String, MsgParseError> {
        serde_json::to_string(self).map_err(MsgParseError::SerialiseError)
    }

    /// If this is one of the leader shapes return it as a [`LeaderMsg`].
    pub fn leader(&self) -> Option<LeaderMsg> {
        match self {
            InboundMsg::Leader { pose, velocity_ms } => Some(LeaderMsg {
                pose: *pose,
                velocity_ms: *velocity_ms,
                source_id: None,
            }),
            InboundMsg::LeaderWithSource {
                pose,
                velocity_ms,
                source_id,
            } => Some(LeaderMsg {
                pose: *pose,
                velocity_ms: *velocity_ms,
                source_id: Some(*source_id),
            }),
            InboundMsg::Command(_) => None,
        }
    }

    /// If this is a command return it.
    pub fn command(self) -> Option<CommandMsg> {
        match self {
            InboundMsg::Command(c) => Some(c),
            _ => None,
        }
    }
}

impl From<LeaderMsg> for InboundMsg {
    fn from(msg: LeaderMsg) -> Self {
        match msg.source_id {
            Some(source_id) => InboundMsg::LeaderWithSource {
                pose: msg.pose,
                velocity_ms: msg.velocity_ms,
                source_id,
            },
            None => InboundMsg::Leader {
                pose: msg.pose,
                velocity_ms: msg.velocity_ms,
            },
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Name of the leader pose channel for the given system.
pub fn leader_channel(system_id: &str) -> String {
    format!("{}{}", LEADER_CHANNEL_PREFIX, system_id)
}

/// Name of the command channel for the given system.
pub fn command_channel(system_id: &str) -> String {
    format!("{}{}", COMMAND_CHANNEL_PREFIX, system_id)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
