//! # Control Arbiter
//!
//! Decides, once per control tick, whether automatic control may drive the vehicle. If an operator
//! takes the controls the follower hands over cleanly and stays out of the way until they leave.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default, Clone)]
pub struct CtrlArbiter {
    /// If false the under-control flag is ignored and control is always automatic.
    pub auto_stop: bool,

    /// If true, when the operator releases the vehicle its current position relative to the
    /// leader becomes the new offset.
    pub auto_start_here: bool,

    /// The under-control flag observed on the previous tick.
    prev_control: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The result of one arbitration step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arbitration {
    /// Drive towards the target as normal.
    Automatic,

    /// The operator has just released the vehicle. Adopt the current leader-relative position as
    /// the offset, then drive as normal.
    ReAnchor,

    /// The operator has just taken control. Neutralise the actuators and skip this tick.
    TakeOver,

    /// The operator still has control, skip this tick.
    Overridden,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CtrlArbiter {
    pub fn new(auto_stop: bool, auto_start_here: bool) -> Self {
        Self {
            auto_stop,
            auto_start_here,
            prev_control: false
        }
    }

    /// Sample the under-control flag for this tick.
    pub fn step(&mut self, under_control: bool) -> Arbitration {
        if !self.auto_stop {
            return Arbitration::Automatic
        }

        let mut arb = if self.prev_control {
            Arbitration::Overridden
        }
        else {
            Arbitration::Automatic
        };

        if under_control != self.prev_control {
            self.prev_control = under_control;

            if under_control {
                info!("Operator has taken control, suspending automatic control");
                arb = Arbitration::TakeOver;
            }
            else {
                info!("Operator has released control, resuming automatic control");
                arb = if self.auto_start_here {
                    Arbitration::ReAnchor
                }
                else {
                    Arbitration::Automatic
                };
            }
        }

        arb
    }

    /// True if an operator held control as of the last step.
    pub fn is_overridden(&self) -> bool {
        self.auto_stop && self.prev_control
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_edges() {
        let mut arb = CtrlArbiter::new(true, false);

        assert_eq!(arb.step(false), Arbitration::Automatic);
        assert_eq!(arb.step(true), Arbitration::TakeOver);
        assert!(arb.is_overridden());
        assert_eq!(arb.step(true), Arbitration::Overridden);
        assert_eq!(arb.step(true), Arbitration::Overridden);
        assert_eq!(arb.step(false), Arbitration::Automatic);
        assert!(!arb.is_overridden());
        assert_eq!(arb.step(false), Arbitration::Automatic);
    }

    #[test]
    fn test_re_anchor_on_release() {
        let mut arb = CtrlArbiter::new(true, true);

        assert_eq!(arb.step(true), Arbitration::TakeOver);
        assert_eq!(arb.step(false), Arbitration::ReAnchor);
        assert_eq!(arb.step(false), Arbitration::Automatic);
    }

    #[test]
    fn test_auto_stop_disabled() {
        let mut arb = CtrlArbiter::new(false, true);

        assert_eq!(arb.step(true), Arbitration::Automatic);
        assert_eq!(arb.step(false), Arbitration::Automatic);
        assert!(!arb.is_overridden());
    }
}
