//! # Target Estimator
//!
//! Computes the world position the follower should drive towards. The base target is the offset
//! (given in the leader's frame) transformed into the world by the leader's last known pose.
//!
//! Leaders often transmit less frequently than followers tick, and a leader which has been
//! destroyed stops transmitting altogether. When extrapolation is enabled the target is pushed
//! forward along the leader's last known velocity by the time elapsed since that pose was
//! received, capped at `max_missing_ticks` so a lost leader doesn't drag the follower away
//! indefinitely. This is a staleness heuristic only, there's no acceleration term.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Point3, Vector3};
use serde::Deserialize;

use crate::leader_tracker::LeaderData;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Duration of one host simulation tick.
///
/// Units: seconds
pub const SECONDS_PER_HOST_TICK: f64 = 1.0 / 60.0;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// How often the control tick runs, relative to the host's simulation ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum TickRate {
    /// Every host tick
    Update1,
    /// Every 10th host tick
    Update10,
    /// Every 100th host tick
    Update100,
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Target estimator configuration.
#[derive(Debug, Clone, Copy)]
pub struct TargetEst {
    /// The rate the control tick is running at.
    pub tick_rate: TickRate,

    /// If true extrapolate the leader's position over ticks with no leader message.
    pub extrapolate: bool,

    /// Maximum number of control ticks to extrapolate over.
    pub max_missing_ticks: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TickRate {
    /// Number of host ticks between control ticks.
    pub fn period_ticks(&self) -> u64 {
        match self {
            TickRate::Update1 => 1,
            TickRate::Update10 => 10,
            TickRate::Update100 => 100,
        }
    }

    /// Wall-clock duration of one control tick.
    ///
    /// Units: seconds
    pub fn seconds_per_tick(&self) -> f64 {
        self.period_ticks() as f64 * SECONDS_PER_HOST_TICK
    }

    /// Number of control ticks between periodic status reports, giving roughly one report every
    /// 100 host ticks.
    pub fn echo_frequency(&self) -> u64 {
        match self {
            TickRate::Update1 => 100,
            TickRate::Update10 => 10,
            TickRate::Update100 => 1,
        }
    }
}

impl Default for TickRate {
    fn default() -> Self {
        TickRate::Update1
    }
}

impl TargetEst {
    /// Compute the world target for the current tick.
    ///
    /// # Inputs
    /// - `offset_m`: where the follower should be in the leader's frame
    /// - `leader`: the leader's last known state
    /// - `runtime`: the current control tick
    /// - `updated`: the control tick on which `leader` was received
    pub fn target(
        &self,
        offset_m: &Vector3<f64>,
        leader: &LeaderData,
        runtime: u64,
        updated: u64
    ) -> Vector3<f64> {
        let mut target_m = leader.pose.transform_point(&Point3::from(*offset_m)).coords;

        if self.extrapolate {
            let missing_ticks = self.missing_ticks(runtime, updated);
            if missing_ticks > 0 {
                let elapsed_s = missing_ticks as f64 * self.tick_rate.seconds_per_tick();
                target_m += leader.velocity_ms * elapsed_s;
            }
        }

        target_m
    }

    /// Number of ticks to extrapolate over, capped at `max_missing_ticks`.
    pub fn missing_ticks(&self, runtime: u64, updated: u64) -> u64 {
        runtime.abs_diff(updated).min(self.max_missing_ticks)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
