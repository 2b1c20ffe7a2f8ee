//! Broadcast bus broker
//!
//! Binds both broadcast endpoints and forwards everything leaders and consoles publish to the
//! subscribed followers. Must be running for any broadcast traffic to flow.
//!
//! Usage: `bcast_broker [pub_endpoint] [sub_endpoint]`, defaults match `params/net.toml`.

use comms_if::net::broker;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();
    let pub_endpoint = args.get(1).map(String::as_str).unwrap_or("tcp://localhost:5021");
    let sub_endpoint = args.get(2).map(String::as_str).unwrap_or("tcp://localhost:5020");

    let pub_side = broker::bind_endpoint(pub_endpoint);
    let sub_side = broker::bind_endpoint(sub_endpoint);

    println!("Broadcast broker: publishers on {}, subscribers on {}", pub_side, sub_side);

    // Create zmq context
    let ctx = zmq::Context::new();

    broker::run(&ctx, &pub_side, &sub_side)?;

    Ok(())
}
