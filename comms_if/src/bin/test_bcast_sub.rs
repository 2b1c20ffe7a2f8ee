//! Simple broadcast subscriber test
//!
//! Prints every message on the leader and command channels of the given system.
//!
//! Usage: `test_bcast_sub [system_id] [endpoint]`

use comms_if::{
    msg::{command_channel, leader_channel, InboundMsg},
    net::{MonitoredSocket, SocketOptions},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let system_id = args.get(1).map(String::as_str).unwrap_or("System1");
    let endpoint = args.get(2).map(String::as_str).unwrap_or("tcp://localhost:5020");

    // Create context
    let ctx = zmq::Context::new();

    // Subscribe to both channels of the system
    let socket_options = SocketOptions {
        subscriptions: vec![leader_channel(system_id), command_channel(system_id)],
        ..Default::default()
    };

    // Create socket
    let socket = MonitoredSocket::new(
        &ctx,
        zmq::SUB,
        socket_options,
        endpoint
    )?;

    // Recieve messages from the bus
    loop {
        match socket.try_recv_tagged()? {
            Some((channel, payload)) => match InboundMsg::from_json(&payload) {
                Ok(m) => println!("{}: {:?}", channel, m),
                Err(e) => println!("{}: undecodable message ({})", channel, e)
            },
            None => std::thread::sleep(std::time::Duration::from_millis(10))
        }
    }
}
