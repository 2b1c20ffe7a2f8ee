//! # Command processor module
//!
//! The command processor executes commands coming from either the command broadcast channel or
//! directly from the host. Execution only mutates the [`FollowerState`], side effects such as
//! persisting or neutralising the actuators are described by the returned [`CmdAction`] and
//! carried out by the tick loop.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod cmd;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::Vector3;

pub use cmd::*;
use crate::{data_store::FollowerState, persist::DEFAULT_CONFIG};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Side effects the tick loop must apply after a command has been executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdAction {
    /// The offset, active configuration or disabled flag changed. Persist the volatile state and
    /// report the new status.
    Updated,

    /// Automatic control was stopped. Neutralise the actuators and persist the volatile state.
    Stopped,

    /// The state was returned to defaults. Persist both backings and report the new status.
    Reset,

    /// A named configuration was written. Persist both backings.
    Saved,

    /// The leader was forgotten, nothing to persist.
    LeaderCleared,
}

/// Errors that prevent a parsed command from executing. No state is changed when these occur.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CmdError {
    #[error("No leader pose has been received, cannot compute the current offset")]
    NoLeaderPose,

    #[error("The follower's position is not yet known")]
    NoPosition,

    #[error("No configuration named \"{0}\" exists")]
    UnknownConfig(String),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Execute a command.
///
/// `position_m` is the follower's current world position, if known, and is only needed by the
/// commands which work relative to where the vehicle currently is.
pub fn exec(
    state: &mut FollowerState,
    cmd: &Cmd,
    position_m: Option<&Vector3<f64>>
) -> Result<CmdAction, CmdError> {
    debug!("Executing {:?}", cmd);

    match cmd {
        Cmd::SetOffset(coords) => {
            for (i, c) in coords.iter().enumerate() {
                if let Some(v) = c {
                    state.offset_m[i] = *v;
                }
            }
            Ok(CmdAction::Updated)
        },
        Cmd::AddOffset(delta_m) => {
            state.offset_m += delta_m;
            Ok(CmdAction::Updated)
        },
        Cmd::Stop => {
            state.disabled = true;
            Ok(CmdAction::Stopped)
        },
        Cmd::Start => {
            state.disabled = false;
            Ok(CmdAction::Updated)
        },
        Cmd::StartHere => {
            state.offset_m = current_offset(state, position_m)?;
            state.disabled = false;
            Ok(CmdAction::Updated)
        },
        Cmd::Reset => {
            state.offset_m = state.default_offset_m;
            state.configs.insert(DEFAULT_CONFIG, state.default_offset_m);
            state.active_config = DEFAULT_CONFIG.to_string();
            state.disabled = false;
            Ok(CmdAction::Reset)
        },
        Cmd::Save(name) => {
            let name = name.as_ref().unwrap_or(&state.active_config).clone();
            state.configs.insert(&name, state.offset_m);
            Ok(CmdAction::Saved)
        },
        Cmd::SaveHere(name) => {
            let offset_m = current_offset(state, position_m)?;
            let name = name.as_ref().unwrap_or(&state.active_config).clone();
            state.configs.insert(&name, offset_m);
            Ok(CmdAction::Saved)
        },
        Cmd::Load(name) => {
            let offset_m = state.configs.get(name)
                .ok_or_else(|| CmdError::UnknownConfig(name.clone()))?;
            state.offset_m = offset_m;
            state.active_config = name.clone();
            state.disabled = false;
            Ok(CmdAction::Updated)
        },
        Cmd::Clear => {
            state.leader.clear();
            Ok(CmdAction::LeaderCleared)
        }
    }
}

/// True if a command sent to `addressees` should be executed by `follower_id`.
///
/// `addressees` is a `;` separated list of follower IDs, an empty list addresses everyone.
pub fn is_addressed_to(addressees: &str, follower_id: &str) -> bool {
    addressees.is_empty() || addressees.split(';').any(|a| a == follower_id)
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CmdAction {
    pub fn persists_volatile(&self) -> bool {
        !matches!(self, CmdAction::LeaderCleared)
    }

    pub fn persists_configs(&self) -> bool {
        matches!(self, CmdAction::Reset | CmdAction::Saved)
    }

    pub fn reports_status(&self) -> bool {
        matches!(self, CmdAction::Updated | CmdAction::Reset)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn current_offset(
    state: &FollowerState,
    position_m: Option<&Vector3<f64>>
) -> Result<Vector3<f64>, CmdError> {
    let position_m = position_m.ok_or(CmdError::NoPosition)?;
    state.current_offset(position_m).ok_or(CmdError::NoLeaderPose)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::msg::LeaderMsg;
    use nalgebra::Isometry3;

    fn state() -> FollowerState {
        FollowerState::new(Vector3::new(50.0, 0.0, 0.0))
    }

    fn run(state: &mut FollowerState, cmd_str: &str) -> Result<CmdAction, CmdError> {
        exec(state, &Cmd::parse(cmd_str).unwrap(), None)
    }

    fn with_leader(state: &mut FollowerState) {
        let msg = LeaderMsg {
            pose: Isometry3::translation(100.0, 0.0, 0.0),
            velocity_ms: Vector3::zeros(),
            source_id: None
        };
        state.leader.on_leader_msg(&msg, 1, state.runtime);
    }

    #[test]
    fn test_add_offset_twice() {
        let mut s = state();
        s.offset_m = Vector3::zeros();

        run(&mut s, "addoffset;5;0;0").unwrap();
        run(&mut s, "addoffset;5;0;0").unwrap();

        assert_eq!(s.offset_m, Vector3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_set_offset_keeps_empty_axes() {
        let mut s = state();

        assert_eq!(run(&mut s, "setoffset;;7;"), Ok(CmdAction::Updated));
        assert_eq!(s.offset_m, Vector3::new(50.0, 7.0, 0.0));
    }

    #[test]
    fn test_stop_start() {
        let mut s = state();

        assert_eq!(run(&mut s, "stop"), Ok(CmdAction::Stopped));
        assert!(s.disabled);
        assert_eq!(run(&mut s, "start"), Ok(CmdAction::Updated));
        assert!(!s.disabled);
    }

    #[test]
    fn test_reset() {
        let mut s = state();
        s.configs.insert(DEFAULT_CONFIG, Vector3::new(1.0, 1.0, 1.0));
        s.configs.insert("wing", Vector3::new(2.0, 2.0, 2.0));
        s.active_config = "wing".into();
        s.offset_m = Vector3::new(3.0, 3.0, 3.0);
        s.disabled = true;

        assert_eq!(run(&mut s, "reset"), Ok(CmdAction::Reset));

        assert!(!s.disabled);
        assert_eq!(s.active_config, DEFAULT_CONFIG);
        assert_eq!(s.offset_m, Vector3::new(50.0, 0.0, 0.0));
        assert_eq!(s.configs.get(DEFAULT_CONFIG), Some(Vector3::new(50.0, 0.0, 0.0)));
        // Other configurations survive a reset
        assert!(s.configs.contains("wing"));
    }

    #[test]
    fn test_save_load() {
        let mut s = state();
        s.offset_m = Vector3::new(-20.0, 0.0, 15.0);

        assert_eq!(run(&mut s, "save;left"), Ok(CmdAction::Saved));
        // Saving doesn't change the active configuration
        assert_eq!(s.active_config, DEFAULT_CONFIG);

        run(&mut s, "setoffset;1;2;3").unwrap();
        run(&mut s, "addoffset;4;5;6").unwrap();
        s.disabled = true;

        assert_eq!(run(&mut s, "load;left"), Ok(CmdAction::Updated));
        assert_eq!(s.offset_m, Vector3::new(-20.0, 0.0, 15.0));
        assert_eq!(s.active_config, "left");
        assert!(!s.disabled);
    }

    #[test]
    fn test_save_to_active() {
        let mut s = state();
        s.offset_m = Vector3::new(1.0, 2.0, 3.0);

        run(&mut s, "save").unwrap();
        assert_eq!(s.configs.get(DEFAULT_CONFIG), Some(Vector3::new(1.0, 2.0, 3.0)));
    }

    #[test]
    fn test_load_unknown() {
        let mut s = state();
        s.disabled = true;
        let before = s.volatile();

        assert_eq!(
            run(&mut s, "load;nowhere"),
            Err(CmdError::UnknownConfig("nowhere".into()))
        );
        assert_eq!(s.volatile(), before);
    }

    #[test]
    fn test_here_cmds() {
        let mut s = state();
        let pos = Vector3::new(90.0, 0.0, 10.0);
        s.disabled = true;

        // No leader yet
        assert_eq!(
            exec(&mut s, &Cmd::StartHere, Some(&pos)),
            Err(CmdError::NoLeaderPose)
        );
        assert!(s.disabled);

        with_leader(&mut s);
        assert_eq!(exec(&mut s, &Cmd::StartHere, None), Err(CmdError::NoPosition));

        assert_eq!(exec(&mut s, &Cmd::StartHere, Some(&pos)), Ok(CmdAction::Updated));
        assert!(!s.disabled);
        assert!((s.offset_m - Vector3::new(-10.0, 0.0, 10.0)).norm() < 1e-9);

        let pos = Vector3::new(100.0, 0.0, -30.0);
        assert_eq!(
            exec(&mut s, &Cmd::SaveHere(Some("behind".into())), Some(&pos)),
            Ok(CmdAction::Saved)
        );
        assert!((s.configs.get("behind").unwrap() - Vector3::new(0.0, 0.0, -30.0)).norm() < 1e-9);
    }

    #[test]
    fn test_clear() {
        let mut s = state();
        with_leader(&mut s);

        assert_eq!(run(&mut s, "clear"), Ok(CmdAction::LeaderCleared));
        assert!(!s.leader.has_leader());
    }

    #[test]
    fn test_addressing() {
        assert!(is_addressed_to("", "Drone1"));
        assert!(is_addressed_to("Drone1", "Drone1"));
        assert!(is_addressed_to("Drone2;Drone1", "Drone1"));
        assert!(!is_addressed_to("Drone2;Drone3", "Drone1"));
        assert!(!is_addressed_to("Drone10", "Drone1"));
    }

    #[test]
    fn test_action_effects() {
        assert!(CmdAction::Stopped.persists_volatile());
        assert!(!CmdAction::Stopped.persists_configs());
        assert!(CmdAction::Saved.persists_configs());
        assert!(!CmdAction::Saved.reports_status());
        assert!(!CmdAction::LeaderCleared.persists_volatile());
    }
}
