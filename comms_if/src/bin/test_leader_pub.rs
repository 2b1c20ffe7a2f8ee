//! Simple leader publisher test
//!
//! Publishes a leader driving in a circle on the leader channel of the given system, at 6 Hz.
//!
//! Usage: `test_leader_pub [system_id] [endpoint]`

use comms_if::{
    msg::{leader_channel, InboundMsg, LeaderMsg},
    net::{MonitoredSocket, SocketOptions},
};
use nalgebra::{Isometry3, Vector3};

/// Radius of the leader's circle.
///
/// Units: meters
const RADIUS_M: f64 = 200.0;

/// Speed of the leader around the circle.
///
/// Units: meters/second
const SPEED_MS: f64 = 10.0;

/// Time between messages
///
/// Units: seconds
const PERIOD_S: f64 = 1.0 / 6.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let system_id = args.get(1).map(String::as_str).unwrap_or("System1");
    let endpoint = args.get(2).map(String::as_str).unwrap_or("tcp://localhost:5021");

    // Create zmq context
    let ctx = zmq::Context::new();

    // Create the socket
    let socket = MonitoredSocket::new(
        &ctx,
        zmq::PUB,
        SocketOptions::default(),
        endpoint
    )?;

    let channel = leader_channel(system_id);
    println!("Publishing leader on {} via {}", channel, endpoint);

    let rate_rads = SPEED_MS / RADIUS_M;
    let mut t = 0.0f64;

    loop {
        let angle = rate_rads * t;

        // Counter-clockwise seen from above, facing along the direction of travel
        let position_m = Vector3::new(RADIUS_M * angle.cos(), 0.0, -RADIUS_M * angle.sin());
        let velocity_ms = Vector3::new(-angle.sin(), 0.0, -angle.cos()) * SPEED_MS;
        let pose = Isometry3::new(position_m, Vector3::new(0.0, angle, 0.0));

        let msg = InboundMsg::from(LeaderMsg {
            pose,
            velocity_ms,
            source_id: None
        });

        match socket.send_tagged(&channel, &msg.to_json()?) {
            Ok(_) => (),
            Err(e) => println!("Failed to send leader message: {}", e)
        }

        std::thread::sleep(std::time::Duration::from_secs_f64(PERIOD_S));
        t += PERIOD_S;
    }
}
