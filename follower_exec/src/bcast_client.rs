//! # Broadcast Client
//!
//! Listens to the formation's leader and command channels. Messages are not queued: each call to
//! [`BcastClient::get_latest`] drains the socket and keeps only the most recent message on each
//! channel.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};

use comms_if::{
    msg::{self, CommandMsg, InboundMsg, LeaderMsg},
    net::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct BcastClient {
    socket: MonitoredSocket,

    leader_channel: String,

    command_channel: String,
}

/// The latest message received on each channel since the last call to
/// [`BcastClient::get_latest`].
#[derive(Debug, Default, Clone)]
pub struct BcastMsgs {
    pub leader: Option<LeaderMsg>,

    pub command: Option<CommandMsg>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum BcastClientError {

    #[error("Socket error: {0}")]
    SocketError(MonitoredSocketError),

}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BcastClient {
    /// Create a new broadcast client listening to the channels of the given system.
    pub fn new(
        ctx: &zmq::Context,
        params: &NetParams,
        system_id: &str
    ) -> Result<Self, BcastClientError> {
        let leader_channel = msg::leader_channel(system_id);
        let command_channel = msg::command_channel(system_id);

        let socket_options = SocketOptions {
            subscriptions: vec![leader_channel.clone(), command_channel.clone()],
            linger: 1,
            ..Default::default()
        };

        let socket = MonitoredSocket::new(
            ctx,
            zmq::SUB,
            socket_options,
            &params.bcast_endpoint
        ).map_err(BcastClientError::SocketError)?;

        Ok(Self {
            socket,
            leader_channel,
            command_channel
        })
    }

    /// Drain the socket, returning the latest leader and command messages.
    pub fn get_latest(&mut self) -> Result<BcastMsgs, BcastClientError> {
        let mut msgs = BcastMsgs::default();

        while let Some((channel, payload)) = self.socket.try_recv_tagged()
            .map_err(BcastClientError::SocketError)?
        {
            // Subscriptions are prefix matches, so "FSLeader1" would also deliver "FSLeader10"
            if channel != self.leader_channel && channel != self.command_channel {
                trace!("Ignoring message on channel {}", channel);
                continue;
            }

            let inbound = match InboundMsg::from_json(&payload) {
                Ok(m) => m,
                Err(e) => {
                    warn!("Could not decode message on channel {}: {}", channel, e);
                    continue;
                }
            };

            if channel == self.leader_channel {
                match inbound.leader() {
                    Some(l) => msgs.leader = Some(l),
                    None => warn!("Non-leader message on the leader channel ignored")
                }
            }
            else {
                match inbound.command() {
                    Some(c) => msgs.command = Some(c),
                    None => warn!("Non-command message on the command channel ignored")
                }
            }
        }

        Ok(msgs)
    }
}

impl BcastMsgs {
    pub fn is_empty(&self) -> bool {
        self.leader.is_none() && self.command.is_none()
    }
}
