//! Parameters structure for FollowerCtrl

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::msg::EntityId;
use nalgebra::Vector3;
use serde::Deserialize;

use crate::target_est::TickRate;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters for the follower's control loop.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Params {

    // ---- IDENTITY ----

    /// The formation this follower belongs to, used to derive the broadcast channel names.
    ///
    /// Any character other than `;`, `[`, `]` and `:` may be used.
    pub system_id: String,

    /// The identifier commands are addressed to.
    pub follower_id: String,

    /// Numeric identifier of this vehicle, used to detect leader messages it sent itself.
    pub entity_id: EntityId,

    // ---- FORMATION ----

    /// The offset used when there is no persisted state, and by the `reset` command.
    ///
    /// Units: meters,
    /// Frame: Leader (+X right, +Y up, +Z backward)
    pub default_offset_m: [f64; 3],

    // ---- CONTROL ----

    /// Suspend automatic control while an operator is at the controls.
    pub auto_stop: bool,

    /// When the operator leaves, hold the current position relative to the leader rather than
    /// returning to the stored offset. Only used if `auto_stop` is true.
    pub auto_start_here: bool,

    /// The rate the control loop runs at.
    pub tick_rate: TickRate,

    // ---- EXTRAPOLATION ----

    /// Estimate where the leader is on ticks which don't have a fresh leader message.
    pub calculate_missing_ticks: bool,

    /// Maximum number of ticks to extrapolate over before assuming the leader is lost.
    pub max_missing_ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Params {
    pub fn default_offset(&self) -> Vector3<f64> {
        Vector3::from(self.default_offset_m)
    }
}

impl Default for Params {
    fn default() -> Self {
        Self {
            system_id: String::from("System1"),
            follower_id: String::from("Drone1"),
            entity_id: 0,
            default_offset_m: [50.0, 0.0, 0.0],
            auto_stop: true,
            auto_start_here: false,
            tick_rate: TickRate::Update1,
            calculate_missing_ticks: true,
            max_missing_ticks: 100
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
