//! Broadcast bus broker
//!
//! Publishers connect an ordinary PUB socket to the broker's XSUB side, subscribers connect SUB
//! sockets to its XPUB side. Subscriptions travel upstream through the broker so publishers only
//! send channels someone is listening to.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;
use zmq::Context;

use super::{MonitoredSocket, MonitoredSocketError, SocketOptions};

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Turn an endpoint participants connect to into the one the broker binds.
///
/// `tcp://<host>:<port>` becomes `tcp://*:<port>`, anything else is bound as given.
pub fn bind_endpoint(endpoint: &str) -> String {
    match endpoint.strip_prefix("tcp://").and_then(|rest| rest.rsplit_once(':')) {
        Some((_, port)) => format!("tcp://*:{}", port),
        None => endpoint.to_string(),
    }
}

/// Bind XSUB on `pub_side` and XPUB on `sub_side` and forward between them.
///
/// Only returns on error.
pub fn run(ctx: &Context, pub_side: &str, sub_side: &str) -> Result<(), MonitoredSocketError> {
    let bound = || SocketOptions { bind: true, linger: 0, ..Default::default() };

    let frontend = MonitoredSocket::new(ctx, zmq::XSUB, bound(), pub_side)?;
    let backend = MonitoredSocket::new(ctx, zmq::XPUB, bound(), sub_side)?;

    info!("Broadcast bus forwarding {} -> {}", pub_side, sub_side);

    zmq::proxy(&frontend, &backend).map_err(MonitoredSocketError::ProxyError)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::{thread, time::Duration};

    #[test]
    fn test_bind_endpoint() {
        assert_eq!(bind_endpoint("tcp://localhost:5020"), "tcp://*:5020");
        assert_eq!(bind_endpoint("tcp://192.168.1.4:5021"), "tcp://*:5021");
        assert_eq!(bind_endpoint("inproc://bus"), "inproc://bus");
    }

    #[test]
    fn test_publisher_reaches_subscriber() {
        let ctx = Context::new();

        let broker_ctx = ctx.clone();
        thread::spawn(move || run(&broker_ctx, "inproc://broker_pub", "inproc://broker_sub"));
        thread::sleep(Duration::from_millis(50));

        let publisher = MonitoredSocket::new(
            &ctx,
            zmq::PUB,
            SocketOptions { linger: 0, ..Default::default() },
            "inproc://broker_pub"
        ).unwrap();

        let subscriber = MonitoredSocket::new(
            &ctx,
            zmq::SUB,
            SocketOptions {
                subscriptions: vec!["FSLeaderSystem1".into()],
                linger: 0,
                ..Default::default()
            },
            "inproc://broker_sub"
        ).unwrap();

        // Subscription has to travel through the broker before anything is forwarded
        let mut received = None;
        for _ in 0..200 {
            publisher.send_tagged("FSLeaderSystem1", "{}").unwrap();
            thread::sleep(Duration::from_millis(5));
            if let Some(msg) = subscriber.try_recv_tagged().unwrap() {
                received = Some(msg);
                break;
            }
        }

        assert_eq!(received, Some(("FSLeaderSystem1".to_string(), "{}".to_string())));
    }
}
