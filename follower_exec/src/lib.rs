//! # Follower library.
//!
//! This library contains the control core of a follower vehicle, which tracks a leader vehicle
//! over a lossy broadcast channel and computes a target world position for the actuator driver.
//! It also allows other crates in the workspace to access items defined inside the follower crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Actuator client - sends target demands to the external actuator driver
pub mod actuator_client;

/// Broadcast client - receives leader and command messages from the broadcast bus
pub mod bcast_client;

/// Command processor - parses and executes follower commands
pub mod cmd_processor;

/// Control arbiter - hands control to and from a human operator
pub mod ctrl_arbiter;

/// Data store - the follower's owned runtime state
pub mod data_store;

/// Follower control module - the tick loop tying all other modules together
pub mod follower_ctrl;

/// Leader tracker - keeps the last known leader pose and velocity
pub mod leader_tracker;

/// Persistence - storage backings and the text formats written to them
pub mod persist;

/// Platform client - receives position, gravity and operator presence from the host
pub mod platform_client;

/// Target estimator - computes the world target from offset and leader pose
pub mod target_est;
