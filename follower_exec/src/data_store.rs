//! # Data Store
//!
//! The single owned aggregate of everything the follower remembers between invocations. It is
//! passed explicitly to the command processor and owned by the tick loop.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;

use crate::{
    leader_tracker::LeaderTracker,
    persist::{ConfigStore, VolatileState, DEFAULT_CONFIG},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FollowerState {
    /// Where the follower should be relative to the leader, in the leader's frame.
    ///
    /// Units: meters
    pub offset_m: Vector3<f64>,

    /// The compiled default offset, always available under [`DEFAULT_CONFIG`].
    ///
    /// Units: meters
    pub default_offset_m: Vector3<f64>,

    /// Name of the currently selected configuration, always a key in `configs`.
    pub active_config: String,

    /// Named offsets.
    pub configs: ConfigStore,

    /// True if automatic control has been stopped.
    pub disabled: bool,

    /// The last known leader state.
    pub leader: LeaderTracker,

    /// Number of control ticks since startup.
    pub runtime: u64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FollowerState {
    /// Create the compiled default state.
    pub fn new(default_offset_m: Vector3<f64>) -> Self {
        Self {
            offset_m: default_offset_m,
            default_offset_m,
            active_config: DEFAULT_CONFIG.to_string(),
            configs: ConfigStore::new(default_offset_m),
            disabled: false,
            leader: LeaderTracker::default(),
            runtime: 0
        }
    }

    /// Adopt previously persisted state wholesale. Leader data and counters are not persisted and
    /// are left untouched.
    pub fn restore(&mut self, configs: ConfigStore, volatile: VolatileState) {
        self.configs = configs;
        self.active_config = volatile.active_config;
        self.offset_m = volatile.offset_m;
        self.disabled = volatile.disabled;
    }

    /// Return to the compiled defaults, dropping every named configuration other than the default
    /// one. Leader data and counters are left untouched.
    pub fn restore_defaults(&mut self) {
        self.configs = ConfigStore::new(self.default_offset_m);
        self.active_config = DEFAULT_CONFIG.to_string();
        self.offset_m = self.default_offset_m;
        self.disabled = false;
    }

    /// The volatile part of the state, as persisted between runs.
    pub fn volatile(&self) -> VolatileState {
        VolatileState {
            disabled: self.disabled,
            active_config: self.active_config.clone(),
            offset_m: self.offset_m
        }
    }

    /// The given world position expressed in the leader's frame, or `None` if no leader is known.
    pub fn current_offset(&self, position_m: &Vector3<f64>) -> Option<Vector3<f64>> {
        self.leader.leader().map(|l| l.to_leader_frame(position_m))
    }

    /// Number of ticks since the last leader message was accepted.
    pub fn ticks_since_update(&self) -> u64 {
        self.runtime.saturating_sub(self.leader.updated())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::msg::LeaderMsg;
    use nalgebra::Isometry3;

    #[test]
    fn test_restore_defaults() {
        let default = Vector3::new(50.0, 0.0, 0.0);
        let mut state = FollowerState::new(default);

        state.configs.insert("wing", Vector3::new(1.0, 2.0, 3.0));
        state.active_config = "wing".into();
        state.offset_m = Vector3::new(1.0, 2.0, 3.0);
        state.disabled = true;
        state.runtime = 12;

        state.restore_defaults();

        assert_eq!(state.offset_m, default);
        assert_eq!(state.active_config, DEFAULT_CONFIG);
        assert!(!state.disabled);
        assert!(!state.configs.contains("wing"));
        assert_eq!(state.configs.get(DEFAULT_CONFIG), Some(default));
        assert_eq!(state.runtime, 12);
    }

    #[test]
    fn test_current_offset() {
        let mut state = FollowerState::new(Vector3::zeros());
        let pos = Vector3::new(10.0, 0.0, 5.0);

        assert!(state.current_offset(&pos).is_none());

        let msg = LeaderMsg {
            pose: Isometry3::translation(4.0, 0.0, 5.0),
            velocity_ms: Vector3::zeros(),
            source_id: None
        };
        state.leader.on_leader_msg(&msg, 1, 0);

        let offset = state.current_offset(&pos).unwrap();
        assert!((offset - Vector3::new(6.0, 0.0, 0.0)).norm() < 1e-9);
    }
}
