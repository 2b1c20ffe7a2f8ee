//! # Command line follower
//!
//! Interactive console which publishes follower commands onto a formation's command channel.
//!
//! Each line entered is sent as a command, for example `setoffset;0;0;30` or `load;wing`.
//! Console directives start with `:`:
//!
//! - `:to <ids>` - address following commands to the `;` separated follower IDs, or to every
//!   follower if `<ids>` is empty
//! - `:quit` - exit the console

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{Report, eyre::WrapErr};
use rustyline::{error::ReadlineError, DefaultEditor};
use structopt::StructOpt;

use comms_if::{
    msg::{command_channel, CommandMsg, InboundMsg},
    net::{zmq, MonitoredSocket, NetParams, SocketOptions},
};
use follower_lib::cmd_processor::Cmd;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "Follower $ ";
const HISTORY_PATH: &str = "command_history.txt";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "command_line_follower", about = "Send commands to formation followers")]
struct Opt {
    /// The formation's system ID
    #[structopt(short, long, default_value = "System1")]
    system_id: String,

    /// `;` separated follower IDs to address, all followers if empty
    #[structopt(short, long, default_value = "")]
    to: String,

    /// Broadcast bus endpoint to publish on, read from `net.toml` if not given
    #[structopt(short, long)]
    endpoint: Option<String>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// What to do with one line of input.
#[derive(Debug, PartialEq)]
enum Line {
    Empty,
    Quit,
    Address(String),
    Send(String),
    Invalid(String),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    let endpoint = match opt.endpoint {
        Some(e) => e,
        None => {
            let net_params: NetParams = util::params::load("net.toml")
                .wrap_err("Could not load net params, pass --endpoint or set FOLLOWER_SW_ROOT")?;
            net_params.bcast_pub_endpoint
        }
    };

    let ctx = zmq::Context::new();
    let socket = MonitoredSocket::new(
        &ctx,
        zmq::PUB,
        SocketOptions {
            linger: 500,
            ..Default::default()
        },
        &endpoint
    ).wrap_err("Could not open the broadcast bus socket")?;

    let channel = command_channel(&opt.system_id);
    let mut addressees = opt.to;

    println!("Publishing on {} via {}", channel, endpoint);

    let mut rl = DefaultEditor::new()?;
    if rl.load_history(HISTORY_PATH).is_err() {
        println!("No history detected");
    }

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).wrap_err("Could not read input")
        };

        rl.add_history_entry(line.as_str())?;

        match parse_line(&line) {
            Line::Empty => (),
            Line::Quit => break,
            Line::Address(a) => {
                addressees = a;
                if addressees.is_empty() {
                    println!("Addressing all followers");
                }
                else {
                    println!("Addressing {}", addressees);
                }
            },
            Line::Send(cmd) => {
                let msg = InboundMsg::Command(CommandMsg {
                    addressees: addressees.clone(),
                    cmd
                });
                socket.send_tagged(&channel, &msg.to_json()?)?;
            },
            Line::Invalid(e) => println!("{}", e)
        }
    }

    rl.save_history(HISTORY_PATH)?;
    println!("Exiting...");

    Ok(())
}

/// Interpret one line of console input.
fn parse_line(line: &str) -> Line {
    let line = line.trim();

    if line.is_empty() {
        return Line::Empty
    }

    if let Some(directive) = line.strip_prefix(':') {
        let mut parts = directive.splitn(2, ' ');
        return match (parts.next(), parts.next()) {
            (Some("quit"), _) => Line::Quit,
            (Some("to"), ids) => Line::Address(ids.unwrap_or("").trim().to_string()),
            _ => Line::Invalid(format!("Unknown directive \"{}\"", line))
        }
    }

    // Followers drop unparseable commands without reply
    match Cmd::parse(line) {
        Ok(_) => Line::Send(line.to_string()),
        Err(e) => Line::Invalid(format!("Invalid command: {}", e))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
