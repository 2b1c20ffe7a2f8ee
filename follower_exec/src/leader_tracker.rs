//! # Leader Tracker
//!
//! Keeps the most recently received leader pose and velocity, along with the tick on which it
//! arrived. There is no reordering of messages, the last one processed wins.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::msg::{EntityId, LeaderMsg};
use log::{debug, trace};
use nalgebra::{Isometry3, Point3, Vector3};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The last known state of the leader.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LeaderData {
    /// The leader's world frame.
    pub pose: Isometry3<f64>,

    /// The leader's velocity in the world frame.
    ///
    /// Units: meters/second
    pub velocity_ms: Vector3<f64>,
}

#[derive(Debug, Default, Clone)]
pub struct LeaderTracker {
    /// The leader's last known state, `None` if no leader is known.
    leader: Option<LeaderData>,

    /// The tick on which the last leader message was accepted.
    updated: u64,
}

/// What happened to a leader message passed to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaderMsgOutcome {
    /// The message was adopted as the leader's new state.
    Accepted,

    /// The message was sent by this vehicle, the leader has been forgotten.
    SelfEcho,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LeaderTracker {
    /// Process a leader message received on `current_tick`.
    ///
    /// A message tagged with `own_id` is an echo of this vehicle's own transmissions (for example
    /// when a follower is also leading another group on the same channel), and following it would
    /// create a feedback loop. Such a message clears the tracked leader instead.
    pub fn on_leader_msg(
        &mut self,
        msg: &LeaderMsg,
        own_id: EntityId,
        current_tick: u64
    ) -> LeaderMsgOutcome {
        if msg.source_id == Some(own_id) {
            debug!("Leader message originated from this vehicle, clearing leader");
            self.clear();
            return LeaderMsgOutcome::SelfEcho
        }

        trace!("Leader message accepted on tick {}", current_tick);

        self.leader = Some(LeaderData {
            pose: msg.pose,
            velocity_ms: msg.velocity_ms
        });
        self.updated = current_tick;

        LeaderMsgOutcome::Accepted
    }

    /// Forget the leader.
    pub fn clear(&mut self) {
        self.leader = None;
    }

    pub fn leader(&self) -> Option<&LeaderData> {
        self.leader.as_ref()
    }

    pub fn has_leader(&self) -> bool {
        self.leader.is_some()
    }

    /// The tick on which the last leader message was accepted.
    pub fn updated(&self) -> u64 {
        self.updated
    }
}

impl LeaderData {
    /// Express a world position in the leader's frame.
    pub fn to_leader_frame(&self, position_m: &Vector3<f64>) -> Vector3<f64> {
        self.pose.inverse_transform_point(&Point3::from(*position_m)).coords
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
