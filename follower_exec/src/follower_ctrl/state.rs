//! Implementations for the FollowerCtrl state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    eqpt::{ActuatorDems, PlatformSensData},
    msg::{CommandMsg, LeaderMsg},
};
use log::{debug, error, info, trace, warn};
use nalgebra::Vector3;

use super::{FollowerCtrlError, FollowerMode, Params, StatusReport};
use crate::{
    cmd_processor::{self, Cmd, CmdAction},
    ctrl_arbiter::{Arbitration, CtrlArbiter},
    data_store::FollowerState,
    leader_tracker::LeaderMsgOutcome,
    persist::{self, Backing},
    target_est::{TargetEst, TickRate},
};
use util::module::State;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Follower control module state
pub struct FollowerCtrl {
    params: Params,

    state: FollowerState,

    mode: FollowerMode,

    arbiter: CtrlArbiter,

    target_est: TargetEst,

    backings: Option<Backings>,
}

/// Data required to initialise FollowerCtrl.
pub struct InitData {
    pub params: Params,

    /// Where the volatile state is persisted.
    pub volatile_backing: Box<dyn Backing>,

    /// Where the named configurations are persisted.
    pub config_backing: Box<dyn Backing>,
}

struct Backings {
    volatile: Box<dyn Backing>,
    configs: Box<dyn Backing>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for FollowerCtrl {
    fn default() -> Self {
        let params = Params::default();

        Self {
            state: FollowerState::new(params.default_offset()),
            mode: FollowerMode::Idle,
            arbiter: CtrlArbiter::new(params.auto_stop, params.auto_start_here),
            target_est: TargetEst {
                tick_rate: params.tick_rate,
                extrapolate: params.calculate_missing_ticks,
                max_missing_ticks: params.max_missing_ticks
            },
            backings: None,
            params
        }
    }
}

impl State for FollowerCtrl {
    type InitData = InitData;
    type InitError = FollowerCtrlError;

    type InputData = PlatformSensData;
    type OutputData = Option<ActuatorDems>;
    type StatusReport = StatusReport;
    type ProcError = FollowerCtrlError;

    /// Initialise the FollowerCtrl module.
    ///
    /// Restores the persisted state from the backings. If either backing is blank, or either
    /// fails to parse, the compiled defaults are used and written back to both.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError> {
        let InitData { params, volatile_backing, config_backing } = init_data;

        self.state = FollowerState::new(params.default_offset());
        self.mode = FollowerMode::Idle;
        self.arbiter = CtrlArbiter::new(params.auto_stop, params.auto_start_here);
        self.target_est = TargetEst {
            tick_rate: params.tick_rate,
            extrapolate: params.calculate_missing_ticks,
            max_missing_ticks: params.max_missing_ticks
        };
        self.params = params;
        self.backings = Some(Backings {
            volatile: volatile_backing,
            configs: config_backing
        });

        let loaded = match self.backings.as_ref() {
            Some(b) if is_blank(b.volatile.as_ref()) || is_blank(b.configs.as_ref()) => {
                info!("No persisted state found, using defaults");
                None
            },
            Some(b) => match persist::load(
                b.volatile.as_ref(),
                b.configs.as_ref(),
                self.state.default_offset_m
            ) {
                Ok(l) => Some(l),
                Err(e) => {
                    warn!("Persisted state is invalid, reverting to defaults: {}", e);
                    None
                }
            },
            None => None
        };

        match loaded {
            Some((configs, volatile)) => self.state.restore(configs, volatile),
            None => {
                self.state.restore_defaults();
                self.persist_all()?;
            }
        }

        info!(
            "FollowerCtrl initialised with configuration \"{}\", {}",
            self.state.active_config,
            if self.state.disabled { "stopped" } else { "running" }
        );

        Ok(())
    }

    /// Perform one control tick.
    fn proc(&mut self, input_data: &Self::InputData)
        -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>
    {
        if self.mode == FollowerMode::Halted {
            return Err(FollowerCtrlError::Halted)
        }

        if self.state.runtime % self.params.tick_rate.echo_frequency() == 0 {
            info!("{}", self.status_report());
        }

        // No gravity, nothing to do but stop
        if input_data.gravity_ms2 == Vector3::zeros() {
            error!("No natural gravity detected, halting until re-initialised");
            self.mode = FollowerMode::Halted;
            return Err(FollowerCtrlError::NoGravity)
        }

        let output = self.tick(input_data);
        self.state.runtime += 1;

        Ok((output, self.status_report()))
    }
}

impl FollowerCtrl {
    /// Handle messages received on the broadcast channels.
    ///
    /// The leader message, if any, is processed before the command. A command is only executed if
    /// it is addressed to this follower.
    pub fn on_messages(
        &mut self,
        leader: Option<&LeaderMsg>,
        command: Option<&CommandMsg>,
        position_m: Option<&Vector3<f64>>
    ) -> Result<Option<ActuatorDems>, FollowerCtrlError> {
        if let Some(msg) = leader {
            let outcome = self.state.leader.on_leader_msg(
                msg,
                self.params.entity_id,
                self.state.runtime
            );
            if outcome == LeaderMsgOutcome::SelfEcho {
                warn!("Received a leader message sent by this vehicle, leader forgotten");
            }
        }

        match command {
            Some(cmd) if cmd_processor::is_addressed_to(&cmd.addressees, &self.params.follower_id) => {
                self.on_direct_cmd(&cmd.cmd, position_m)
            },
            Some(cmd) => {
                trace!("Ignoring command addressed to \"{}\"", cmd.addressees);
                Ok(None)
            },
            None => Ok(None)
        }
    }

    /// Execute a command string, returning any demands for the actuator driver.
    ///
    /// A command which fails to parse or execute changes nothing. Once executed a command stays
    /// applied and its demands are returned even if persisting the new state fails.
    pub fn on_direct_cmd(
        &mut self,
        cmd_str: &str,
        position_m: Option<&Vector3<f64>>
    ) -> Result<Option<ActuatorDems>, FollowerCtrlError> {
        let cmd = Cmd::parse(cmd_str)?;
        let action = cmd_processor::exec(&mut self.state, &cmd, position_m)?;

        let dems = match action {
            CmdAction::Stopped => {
                info!("Stopped.");
                Some(ActuatorDems::Reset)
            },
            _ => None
        };

        let persisted = if action.persists_configs() {
            self.persist_all()
        }
        else if action.persists_volatile() {
            self.persist_volatile()
        }
        else {
            Ok(())
        };

        if let Err(e) = persisted {
            warn!("Command \"{}\" applied but not persisted: {}", cmd_str, e);
        }

        if action.reports_status() {
            info!("{}", self.status_report());
        }

        Ok(dems)
    }

    /// The rate the control tick should be scheduled at, or `None` if it shouldn't run.
    pub fn scheduled(&self) -> Option<TickRate> {
        if self.state.disabled {
            None
        }
        else {
            Some(self.params.tick_rate)
        }
    }

    /// Write the volatile state to its backing.
    pub fn persist_volatile(&mut self) -> Result<(), FollowerCtrlError> {
        let text = self.state.volatile().to_text();
        let backings = self.backings.as_mut().ok_or(FollowerCtrlError::NotInitialised)?;

        backings.volatile.write(&text)?;
        Ok(())
    }

    /// Write the volatile state and the named configurations to their backings.
    pub fn persist_all(&mut self) -> Result<(), FollowerCtrlError> {
        self.persist_volatile()?;

        let text = self.state.configs.to_text();
        let backings = self.backings.as_mut().ok_or(FollowerCtrlError::NotInitialised)?;

        backings.configs.write(&text)?;
        Ok(())
    }

    pub fn status_report(&self) -> StatusReport {
        let weak_signal_ticks = match self.state.ticks_since_update() {
            t if self.target_est.extrapolate && t > self.target_est.max_missing_ticks => Some(t),
            _ => None
        };

        StatusReport {
            mode: self.mode,
            disabled: self.state.disabled,
            configs: self.state.configs.names().map(String::from).collect(),
            active_config: self.state.active_config.clone(),
            offset_m: self.state.offset_m,
            leader_known: self.state.leader.has_leader(),
            weak_signal_ticks,
            under_control: self.arbiter.is_overridden()
        }
    }

    pub fn state(&self) -> &FollowerState {
        &self.state
    }

    pub fn mode(&self) -> FollowerMode {
        self.mode
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Everything in a control tick after the gravity check.
    fn tick(&mut self, input_data: &PlatformSensData) -> Option<ActuatorDems> {
        let leader = match self.state.leader.leader() {
            Some(l) => *l,
            None => {
                self.mode = FollowerMode::Idle;
                return None
            }
        };

        match self.arbiter.step(input_data.under_control) {
            Arbitration::TakeOver => {
                self.mode = FollowerMode::Overridden;
                return Some(ActuatorDems::Reset)
            },
            Arbitration::Overridden => {
                self.mode = FollowerMode::Overridden;
                return None
            },
            Arbitration::ReAnchor => {
                self.state.offset_m = leader.to_leader_frame(&input_data.position_m);
                debug!("Offset re-anchored to {:?}", self.state.offset_m);
                if let Err(e) = self.persist_volatile() {
                    warn!("Could not persist the re-anchored offset: {}", e);
                }
            },
            Arbitration::Automatic => ()
        }

        self.mode = FollowerMode::Tracking;

        let target_m = self.target_est.target(
            &self.state.offset_m,
            &leader,
            self.state.runtime,
            self.state.leader.updated()
        );
        trace!("Target: {:?}", target_m);

        Some(ActuatorDems::Update { target_m })
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// True if the backing is empty or can't be read.
fn is_blank(backing: &dyn Backing) -> bool {
    match backing.read() {
        Ok(s) => s.trim().is_empty(),
        Err(e) => {
            warn!("Could not read persisted state: {}", e);
            true
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
