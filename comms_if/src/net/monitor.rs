//! Socket event monitoring
//!
//! ZMQ reports socket events over an inproc PAIR socket. Each [`Monitor`] owns one of these and
//! drains it on a background thread, publishing the connection state through a shared flag.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc,
    },
    thread,
};
use log::debug;
use zmq::{Context, Socket, SocketEvent};

use super::MonitoredSocketError;

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

/// Monotonic counter giving each monitor its own inproc address.
static MONITOR_COUNT: AtomicUsize = AtomicUsize::new(0);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Receiving end of a socket's event stream.
pub(super) struct Monitor {
    pair: Socket,
    address: String,
}

/// Shared flags between a socket and its monitor thread.
#[derive(Clone, Default)]
pub(super) struct LinkState {
    pub connected: Arc<AtomicBool>,
    pub stop: Arc<AtomicBool>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Monitor {
    /// Enable monitoring on `target` and connect a PAIR socket to receive its events.
    pub fn attach(ctx: &Context, target: &Socket) -> Result<Self, MonitoredSocketError> {
        let id = MONITOR_COUNT.fetch_add(1, Ordering::Relaxed);
        let address = format!("inproc://socket_monitor_{}", id);

        target.monitor(&address, SocketEvent::ALL as i32)
            .map_err(MonitoredSocketError::MonitoringEnableError)?;

        let pair = ctx.socket(zmq::PAIR)
            .map_err(MonitoredSocketError::CreateSocketError)?;
        pair.connect(&address)
            .map_err(|e| MonitoredSocketError::CouldNotConnect(Some(e)))?;

        Ok(Self { pair, address })
    }

    /// Block until the first connection is made.
    ///
    /// Delayed connects are waited through, any other event counts as a failure.
    pub fn wait_for_connect(&self) -> Result<(), MonitoredSocketError> {
        loop {
            match next_event(&self.pair).map_err(MonitoredSocketError::EventReadError)? {
                SocketEvent::CONNECTED => return Ok(()),
                SocketEvent::CONNECT_DELAYED => (),
                _ => return Err(MonitoredSocketError::CouldNotConnect(None)),
            }
        }
    }

    /// Move the monitor onto its own thread, which keeps `link.connected` up to date until
    /// `link.stop` is raised or the event stream closes.
    pub fn spawn(self, link: LinkState) {
        thread::spawn(move || {
            while !link.stop.load(Ordering::Relaxed) {
                let event = match next_event(&self.pair) {
                    Ok(e) => e,
                    Err(_) => break,
                };

                match event {
                    SocketEvent::CONNECTED => {
                        debug!("{}: connected", self.address);
                        link.connected.store(true, Ordering::Relaxed)
                    }
                    SocketEvent::DISCONNECTED => {
                        debug!("{}: disconnected", self.address);
                        link.connected.store(false, Ordering::Relaxed)
                    }
                    _ => (),
                }
            }
        });
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Pull one event off a monitor socket.
///
/// Events are a 6-byte frame (u16 event id, u32 value) followed by an address frame.
fn next_event(pair: &Socket) -> Result<SocketEvent, zmq::Error> {
    let frame = pair.recv_msg(0)?;

    let id = match frame.get(0..2) {
        Some(b) => u16::from_ne_bytes([b[0], b[1]]),
        None => return Err(zmq::Error::EINVAL),
    };

    // Address frame is unused
    if pair.get_rcvmore()? {
        pair.recv_msg(0)?;
    }

    Ok(SocketEvent::from_raw(id))
}
