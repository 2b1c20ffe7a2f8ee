//! Cyclic module interface
//!
//! Anything `follower_exec` drives from its main loop implements [`State`], so that start-up and
//! per-cycle processing look the same regardless of the module.

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A module initialised once and then processed every cycle.
pub trait State {
    /// Everything `init` needs, typically parameters and storage handles.
    type InitData;
    type InitError;

    /// Per-cycle inputs.
    type InputData;
    /// Per-cycle outputs, e.g. demands for the platform.
    type OutputData;
    /// Summary of the cycle for logging or display.
    type StatusReport;
    type ProcError;

    /// Bring the module into a runnable state.
    fn init(&mut self, init_data: Self::InitData) -> Result<(), Self::InitError>;

    /// Run one cycle, returning the outputs alongside a status report.
    fn proc(
        &mut self,
        input_data: &Self::InputData
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError>;
}
