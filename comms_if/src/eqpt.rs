//! # Equipment Interface
//!
//! This module defines the interface structures exchanged with the host platform: demands sent to
//! the external actuator driver, and the sensor data the follower needs each tick.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::{Serialize, Deserialize};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Channel actuator demands are published on.
pub const ACTUATOR_DEMS_CHANNEL: &str = "ActuatorDems";

/// Channel platform sensor data is published on.
pub const PLATFORM_SENS_CHANNEL: &str = "PlatformSens";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Sensor data published by the host platform.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PlatformSensData {
    /// Position of the follower's controller in the world frame.
    ///
    /// Units: meters
    pub position_m: Vector3<f64>,

    /// Natural gravity acting on the follower in the world frame.
    ///
    /// Units: meters/second^2
    pub gravity_ms2: Vector3<f64>,

    /// True if an operator is currently seated at the follower's controls.
    pub under_control: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Demands sent to the actuator driver.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum ActuatorDems {
    /// Neutralise all motion, handing the vehicle back in a stationary state.
    Reset,

    /// Drive towards the given world position.
    Update {
        /// Units: meters, Frame: world
        target_m: Vector3<f64>
    }
}
