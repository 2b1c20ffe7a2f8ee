//! # Actuator Client
//!
//! Publishes demands to the external actuator driver, which turns a target position into wheel
//! and suspension commands.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::{ActuatorDems, ACTUATOR_DEMS_CHANNEL},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct ActuatorClient {
    dems_socket: MonitoredSocket,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum ActuatorClientError {

    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

    #[error("Could not serialize the data: {0}")]
    SerializationError(serde_json::Error),

}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ActuatorClient {
    /// Create a new instance of the actuator client.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, ActuatorClientError> {

        let dems_socket_options = SocketOptions {
            bind: true,
            linger: 1,
            send_timeout: 10,
            ..Default::default()
        };

        let dems_socket = MonitoredSocket::new(
            ctx,
            zmq::PUB,
            dems_socket_options,
            &params.actuator_dems_endpoint
        ).map_err(ActuatorClientError::SocketError)?;

        Ok(Self { dems_socket })
    }

    /// Publish demands to the driver.
    pub fn send_demands(&mut self, demands: &ActuatorDems) -> Result<(), ActuatorClientError> {
        let dems_str = serde_json::to_string(demands)
            .map_err(ActuatorClientError::SerializationError)?;

        self.dems_socket.send_tagged(ACTUATOR_DEMS_CHANNEL, &dems_str)
            .map_err(ActuatorClientError::SocketError)
    }
}
