//! Status report for the follower's control loop

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt;

use nalgebra::Vector3;

use super::FollowerMode;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A snapshot of the follower's status, rendered for operators by its `Display` impl.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    pub mode: FollowerMode,

    /// True if automatic control has been stopped.
    pub disabled: bool,

    /// All configuration names, sorted.
    pub configs: Vec<String>,

    pub active_config: String,

    /// Units: meters
    pub offset_m: Vector3<f64>,

    /// True if a leader message has been received (and not since cleared).
    pub leader_known: bool,

    /// Set to the number of ticks since the last leader message if that exceeds the
    /// extrapolation limit.
    pub weak_signal_ticks: Option<u64>,

    /// True if an operator currently has control.
    pub under_control: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mode, self.disabled) {
            (FollowerMode::Halted, _) => writeln!(f, "Halted.")?,
            (_, true) => writeln!(f, "Stopped.")?,
            _ => writeln!(f, "Running.")?,
        }

        writeln!(f, "Configs:")?;
        for name in &self.configs {
            if *name == self.active_config {
                writeln!(f, "{}*", name)?;
            }
            else {
                writeln!(f, "{}", name)?;
            }
        }

        write!(
            f,
            "X:{:.2} Y:{:.2} Z:{:.2}",
            self.offset_m.x,
            self.offset_m.y,
            self.offset_m.z
        )?;

        if !self.leader_known {
            write!(f, "\nNo messages received.")?;
        }
        else if let Some(ticks) = self.weak_signal_ticks {
            write!(f, "\nWeak signal, message received {} ticks ago.", ticks)?;
        }

        if self.under_control {
            write!(f, "\nUnder manual control.")?;
        }

        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn report() -> StatusReport {
        StatusReport {
            mode: FollowerMode::Tracking,
            disabled: false,
            configs: vec!["default".into(), "wing".into()],
            active_config: "wing".into(),
            offset_m: Vector3::new(-20.0, 0.126, 15.0),
            leader_known: true,
            weak_signal_ticks: None,
            under_control: false
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(
            report().to_string(),
            "Running.\nConfigs:\ndefault\nwing*\nX:-20.00 Y:0.13 Z:15.00"
        );
    }

    #[test]
    fn test_display_diagnostics() {
        let mut r = report();
        r.leader_known = false;
        r.under_control = true;
        let text = r.to_string();
        assert!(text.ends_with("No messages received.\nUnder manual control."));

        let mut r = report();
        r.weak_signal_ticks = Some(250);
        r.disabled = true;
        let text = r.to_string();
        assert!(text.starts_with("Stopped.\n"));
        assert!(text.ends_with("Weak signal, message received 250 ticks ago."));
    }
}
