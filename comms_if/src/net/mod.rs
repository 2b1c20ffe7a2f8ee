//! # Network Module
//!
//! Thin layer over ZMQ used by every executable in the workspace.
//!
//! Broadcast channels travel over PUB/SUB as two-frame messages: the channel name, which doubles
//! as the subscription topic, followed by a JSON payload.
//!
//! The bus itself is the broker in [`broker`] (run by the `bcast_broker` binary). It binds both
//! broadcast endpoints and forwards everything published on `bcast_pub_endpoint` to the
//! subscribers on `bcast_endpoint`, so leaders, consoles and followers only ever connect.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod broker;
mod monitor;
mod socket;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

pub use socket::{MonitoredSocket, SocketOptions};

// Re-exported so dependants don't need their own zmq entry
pub use zmq;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Endpoints loaded from `net.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetParams {
    /// Where the broadcast bus publishes leader and command traffic.
    pub bcast_endpoint: String,

    /// Where publishers (leaders, consoles) push their traffic onto the bus.
    pub bcast_pub_endpoint: String,

    /// Bound by the follower, the actuator driver subscribes here.
    pub actuator_dems_endpoint: String,

    /// Published by the host platform with the follower's own sensor data.
    pub platform_sens_endpoint: String,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum MonitoredSocketError {
    #[error("Failed to open a zmq socket: {0}")]
    CreateSocketError(zmq::Error),

    #[error("Failed to attach a monitor to the socket: {0}")]
    MonitoringEnableError(zmq::Error),

    #[error("Socket never reached its endpoint: {0:?}")]
    CouldNotConnect(Option<zmq::Error>),

    #[error("Monitor event could not be read: {0}")]
    EventReadError(zmq::Error),

    #[error("Setting socket option {0} failed: {1}")]
    SocketOptionError(String, zmq::Error),

    #[error("Send failed: {0}")]
    SendError(zmq::Error),

    #[error("Receive failed: {0}")]
    RecvError(zmq::Error),

    #[error("Expected a 2-frame tagged message but got {0} frames")]
    MalformedMessage(usize),

    #[error("Broker stopped forwarding: {0}")]
    ProxyError(zmq::Error),
}
