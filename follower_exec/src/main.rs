//! Main follower executable entry point.
//!
//! # Architecture
//!
//! The executable runs at the host's simulation rate (60 Hz). Each host tick consists of:
//!
//!     - Platform sensor data acquisition
//!     - Broadcast message handling (leader pose and addressed commands)
//!     - Scripted command handling
//!     - Follower control processing, on those host ticks which fall on the configured tick rate
//!       and only while the follower is not stopped
//!     - Forwarding of demands to the actuator driver

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{Report, eyre::WrapErr};
use log::{debug, error, info, trace, warn};
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};
use structopt::StructOpt;

// Internal
use comms_if::{eqpt::ActuatorDems, net::{zmq, NetParams}};
use follower_lib::{
    actuator_client::ActuatorClient,
    bcast_client::BcastClient,
    follower_ctrl::{self, FollowerCtrl},
    persist::FileBacking,
    platform_client::PlatformClient,
    target_est::SECONDS_PER_HOST_TICK,
};
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingCmds, ScriptInterpreter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name of the file the volatile state is persisted to, within the storage directory.
const VOLATILE_FILE_NAME: &str = "volatile.txt";

/// Name of the file the named configurations are persisted to, within the storage directory.
const CONFIGS_FILE_NAME: &str = "configs.txt";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, StructOpt)]
#[structopt(name = "follower_exec", about = "Formation follower control executable")]
struct Opt {
    /// Script of timed commands to execute, one `<seconds>: <command>` per line
    #[structopt(short, long, parse(from_os_str))]
    script: Option<PathBuf>,

    /// Commands to execute once at startup, for example `load;wing`
    #[structopt(short, long = "cmd")]
    cmds: Vec<String>,

    /// Log debug and trace messages
    #[structopt(short, long)]
    verbose: bool,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    let opt = Opt::from_args();

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "follower_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    logger_init(
        if opt.verbose { LevelFilter::Trace } else { LevelFilter::Info },
        &session
    ).wrap_err("Failed to initialise logging")?;

    info!("Formation Follower Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load net params")?;
    let ctrl_params: follower_ctrl::Params = util::params::load("follower_ctrl.toml")
        .wrap_err("Could not load follower control params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE SCRIPT ----

    let mut script = match opt.script {
        Some(ref path) => {
            info!("Loading script from {:?}", path);

            let si = ScriptInterpreter::new(path).wrap_err("Failed to load script")?;

            info!(
                "Loaded script lasts {:.02} s and contains {} commands\n",
                si.get_duration(),
                si.get_num_cmds()
            );
            Some(si)
        },
        None => None
    };

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let system_id = ctrl_params.system_id.clone();

    let mut ctrl = FollowerCtrl::default();
    ctrl.init(follower_ctrl::InitData {
        params: ctrl_params,
        volatile_backing: Box::new(FileBacking::new(session.storage_root.join(VOLATILE_FILE_NAME))),
        config_backing: Box::new(FileBacking::new(session.storage_root.join(CONFIGS_FILE_NAME)))
    }).wrap_err("Failed to initialise FollowerCtrl")?;

    info!("FollowerCtrl init complete");

    // ---- INITIALISE NETWORK ----

    info!("Initialising network");

    let zmq_ctx = zmq::Context::new();

    let mut actuator_client = ActuatorClient::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise ActuatorClient")?;
    info!("ActuatorClient initialised");

    let mut platform_client = PlatformClient::new(&zmq_ctx, &net_params)
        .wrap_err("Failed to initialise PlatformClient")?;
    info!("PlatformClient initialised");

    let mut bcast_client = BcastClient::new(&zmq_ctx, &net_params, &system_id)
        .wrap_err("Failed to initialise BcastClient")?;
    info!("BcastClient initialised on system \"{}\"", system_id);

    info!("Network initialisation complete");

    // ---- STARTUP COMMANDS ----

    for cmd in opt.cmds.iter() {
        info!("Executing startup command \"{}\"", cmd);
        exec_cmd(&mut ctrl, &mut actuator_client, cmd, None);
    }

    // ---- MAIN LOOP ----

    info!("Beginning main loop\n");

    let mut host_tick: u64 = 0;

    loop {
        let tick_start_instant = Instant::now();

        // ---- DATA INPUT ----

        let sens_data = match platform_client.get_sensor_data() {
            Ok(d) => d,
            Err(e) => {
                warn!("PlatformClient error: {}", e);
                platform_client.latest().copied()
            }
        };
        let position_m = sens_data.as_ref().map(|d| d.position_m);

        // ---- BROADCAST MESSAGES ----

        match bcast_client.get_latest() {
            Ok(msgs) if !msgs.is_empty() => {
                match ctrl.on_messages(
                    msgs.leader.as_ref(),
                    msgs.command.as_ref(),
                    position_m.as_ref()
                ) {
                    Ok(Some(dems)) => send_demands(&mut actuator_client, &dems),
                    Ok(None) => (),
                    Err(e) => warn!("Could not handle broadcast command: {}", e)
                }
            },
            Ok(_) => (),
            Err(e) => warn!("BcastClient error: {}", e)
        }

        // ---- SCRIPTED COMMANDS ----

        let mut script_done = false;
        if let Some(ref mut si) = script {
            match si.get_pending_cmds() {
                PendingCmds::None => (),
                PendingCmds::Some(cmds) => {
                    for cmd in cmds.iter() {
                        exec_cmd(&mut ctrl, &mut actuator_client, cmd, position_m.as_ref());
                    }
                },
                PendingCmds::EndOfScript => {
                    info!("End of command script reached");
                    script_done = true;
                }
            }
        }
        if script_done {
            script = None;
        }

        // ---- FOLLOWER CONTROL ----

        match (ctrl.scheduled(), sens_data) {
            (Some(rate), Some(sens)) if host_tick % rate.period_ticks() == 0 => {
                match ctrl.proc(&sens) {
                    Ok((Some(dems), _)) => send_demands(&mut actuator_client, &dems),
                    Ok((None, _)) => (),
                    Err(e) => {
                        if let Some(dems) = e.dems() {
                            send_demands(&mut actuator_client, &dems);
                        }

                        if e.is_fatal() {
                            error!("FollowerCtrl cannot continue: {}", e);
                            return Err(e).wrap_err("FollowerCtrl halted");
                        }

                        warn!("FollowerCtrl error: {}", e);
                    }
                }
            },
            (Some(_), None) => trace!("No platform data received yet"),
            _ => ()
        }

        // ---- CYCLE MANAGEMENT ----

        let tick_dur = Instant::now() - tick_start_instant;

        match Duration::from_secs_f64(SECONDS_PER_HOST_TICK).checked_sub(tick_dur) {
            Some(d) => thread::sleep(d),
            None => debug!(
                "Tick overran by {:.06} s",
                tick_dur.as_secs_f64() - SECONDS_PER_HOST_TICK
            )
        }

        host_tick += 1;
    }
}

/// Execute a command issued directly to this follower.
fn exec_cmd(
    ctrl: &mut FollowerCtrl,
    actuator_client: &mut ActuatorClient,
    cmd: &str,
    position_m: Option<&nalgebra::Vector3<f64>>
) {
    match ctrl.on_direct_cmd(cmd, position_m) {
        Ok(Some(dems)) => send_demands(actuator_client, &dems),
        Ok(None) => (),
        Err(e) => warn!("Command \"{}\" rejected: {}", cmd, e)
    }
}

fn send_demands(actuator_client: &mut ActuatorClient, dems: &ActuatorDems) {
    if let Err(e) = actuator_client.send_demands(dems) {
        warn!("ActuatorClient error: {}", e);
    }
}
