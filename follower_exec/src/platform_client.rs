//! # Platform Client
//!
//! Receives the sensor data the follower needs from the host platform: its position, the natural
//! gravity acting on it, and whether an operator is at the controls. Data is published by the
//! host as often as it likes, only the most recent sample is kept.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::warn;

use comms_if::{
    eqpt::{PlatformSensData, PLATFORM_SENS_CHANNEL},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct PlatformClient {
    sens_socket: MonitoredSocket,

    latest: Option<PlatformSensData>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum PlatformClientError {

    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PlatformClient {
    /// Create a new instance of the platform client.
    pub fn new(ctx: &zmq::Context, params: &NetParams) -> Result<Self, PlatformClientError> {

        let sens_socket_options = SocketOptions {
            subscriptions: vec![PLATFORM_SENS_CHANNEL.to_string()],
            linger: 1,
            ..Default::default()
        };

        let sens_socket = MonitoredSocket::new(
            ctx,
            zmq::SUB,
            sens_socket_options,
            &params.platform_sens_endpoint
        ).map_err(PlatformClientError::SocketError)?;

        Ok(Self {
            sens_socket,
            latest: None
        })
    }

    /// Get the most recent sensor data.
    ///
    /// Drains everything waiting on the socket. Returns `None` if no data has ever been received.
    pub fn get_sensor_data(&mut self) -> Result<Option<PlatformSensData>, PlatformClientError> {
        while let Some((channel, payload)) = self.sens_socket.try_recv_tagged()
            .map_err(PlatformClientError::SocketError)?
        {
            if channel != PLATFORM_SENS_CHANNEL {
                continue;
            }

            match serde_json::from_str(&payload) {
                Ok(d) => self.latest = Some(d),
                Err(e) => warn!("Could not deserialize platform sensor data: {}", e)
            }
        }

        Ok(self.latest)
    }

    /// The most recent sensor data without checking for new messages.
    pub fn latest(&self) -> Option<&PlatformSensData> {
        self.latest.as_ref()
    }
}
