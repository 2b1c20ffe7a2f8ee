//! Monitored sockets and their options

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{ops::Deref, sync::atomic::Ordering};
use zmq::{Context, Socket, SocketType};

use super::{
    monitor::{LinkState, Monitor},
    MonitoredSocketError,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A zmq socket paired with a background monitor that tracks whether it is connected.
///
/// Derefs to the underlying [`Socket`] for anything not covered by the tagged helpers.
pub struct MonitoredSocket {
    socket: Socket,
    link: LinkState,
}

/// Configuration applied to a [`MonitoredSocket`] before it connects or binds.
///
/// The integer options map directly onto `zmq_setsockopt` and are in milliseconds.
pub struct SocketOptions {
    /// Bind rather than connect. Bus owners bind, everyone else connects.
    pub bind: bool,

    /// Make `MonitoredSocket::new` wait for the first connection, failing with
    /// `CouldNotConnect` if the connect timeout runs out first. Ignored when binding.
    pub block_on_first_connect: bool,

    /// Topics for SUB sockets. Ignored by every other socket type.
    pub subscriptions: Vec<String>,

    /// `ZMQ_LINGER`
    pub linger: i32,

    /// `ZMQ_RECONNECT_IVL`
    pub reconnect_ivl: i32,

    /// `ZMQ_CONNECT_TIMEOUT`
    pub connect_timeout: i32,

    /// `ZMQ_RCVTIMEO`
    pub recv_timeout: i32,

    /// `ZMQ_SNDTIMEO`
    pub send_timeout: i32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MonitoredSocket {
    /// Open a socket of `socket_type`, apply `options`, then bind or connect it to `endpoint`.
    pub fn new(
        ctx: &Context,
        socket_type: SocketType,
        options: SocketOptions,
        endpoint: &str
    ) -> Result<Self, MonitoredSocketError> {
        let socket = ctx.socket(socket_type)
            .map_err(MonitoredSocketError::CreateSocketError)?;

        let monitor = Monitor::attach(ctx, &socket)?;

        options.apply(&socket)?;

        let attached = if options.bind {
            socket.bind(endpoint)
        } else {
            socket.connect(endpoint)
        };
        attached.map_err(|e| MonitoredSocketError::CouldNotConnect(Some(e)))?;

        let link = LinkState::default();

        // Bound sockets count as connected from the start
        if options.bind {
            link.connected.store(true, Ordering::Relaxed);
        } else if options.block_on_first_connect {
            monitor.wait_for_connect()?;
            link.connected.store(true, Ordering::Relaxed);
        }

        monitor.spawn(link.clone());

        Ok(Self { socket, link })
    }

    /// Whether the socket currently has a live connection.
    pub fn connected(&self) -> bool {
        self.link.connected.load(Ordering::Relaxed)
    }

    /// Publish `payload` on `channel`.
    pub fn send_tagged(&self, channel: &str, payload: &str) -> Result<(), MonitoredSocketError> {
        self.socket
            .send_multipart(vec![channel.as_bytes(), payload.as_bytes()], 0)
            .map_err(MonitoredSocketError::SendError)
    }

    /// Take the next `(channel, payload)` pair off the socket if one is waiting.
    pub fn try_recv_tagged(&self) -> Result<Option<(String, String)>, MonitoredSocketError> {
        match self.socket.recv_multipart(zmq::DONTWAIT) {
            Ok(frames) => split_tagged(frames).map(Some),
            Err(zmq::Error::EAGAIN) => Ok(None),
            Err(e) => Err(MonitoredSocketError::RecvError(e)),
        }
    }
}

impl Drop for MonitoredSocket {
    fn drop(&mut self) {
        self.link.stop.store(true, Ordering::Relaxed);
    }
}

impl Deref for MonitoredSocket {
    type Target = Socket;

    fn deref(&self) -> &Socket {
        &self.socket
    }
}

impl SocketOptions {
    /// Write the options onto `socket`.
    pub fn apply(&self, socket: &Socket) -> Result<(), MonitoredSocketError> {
        socket.set_connect_timeout(self.connect_timeout).map_err(opt_err("connect_timeout"))?;
        socket.set_linger(self.linger).map_err(opt_err("linger"))?;
        socket.set_reconnect_ivl(self.reconnect_ivl).map_err(opt_err("reconnect_ivl"))?;
        socket.set_rcvtimeo(self.recv_timeout).map_err(opt_err("rcvtimeo"))?;
        socket.set_sndtimeo(self.send_timeout).map_err(opt_err("sndtimeo"))?;

        if let Ok(SocketType::SUB) = socket.get_socket_type() {
            for topic in &self.subscriptions {
                socket.set_subscribe(topic.as_bytes())
                    .map_err(opt_err(&format!("subscribe({})", topic)))?;
            }
        }

        Ok(())
    }
}

impl Default for SocketOptions {
    /// libzmq's own defaults, except linger which is capped at 30 s.
    fn default() -> Self {
        Self {
            bind: false,
            block_on_first_connect: false,
            subscriptions: vec![],
            linger: 30_000,
            reconnect_ivl: 100,
            connect_timeout: 0,
            recv_timeout: -1,
            send_timeout: 0,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn opt_err(name: &str) -> impl FnOnce(zmq::Error) -> MonitoredSocketError {
    let name = name.to_string();
    move |e| MonitoredSocketError::SocketOptionError(name, e)
}

/// Split a received multipart message into its channel and payload.
fn split_tagged(frames: Vec<Vec<u8>>) -> Result<(String, String), MonitoredSocketError> {
    match frames.as_slice() {
        [channel, payload] => Ok((
            String::from_utf8_lossy(channel).into_owned(),
            String::from_utf8_lossy(payload).into_owned(),
        )),
        _ => Err(MonitoredSocketError::MalformedMessage(frames.len())),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
