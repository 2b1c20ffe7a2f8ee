//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the follower software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Messages broadcast between leaders, followers and command consoles
pub mod msg;

/// Demands and sensor data exchanged with the host platform (actuator driver, sensors)
pub mod eqpt;

/// Network module
pub mod net;
