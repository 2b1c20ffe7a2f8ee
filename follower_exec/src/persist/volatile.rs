//! Volatile state codec
//!
//! The minimal runtime state is persisted as `disabled;active_config;x;y;z`, where `disabled` is
//! `1` or `0`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;

use super::{parse_vector, PersistError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The follower's runtime state which survives restarts.
#[derive(Debug, Clone, PartialEq)]
pub struct VolatileState {
    /// True if automatic control has been stopped.
    pub disabled: bool,

    /// Name of the selected configuration.
    pub active_config: String,

    /// The working offset in the leader's frame.
    ///
    /// Units: meters
    pub offset_m: Vector3<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl VolatileState {
    /// Parse the state from its persisted text.
    ///
    /// Any value other than `1` in the first field is read as enabled. Fields beyond the fifth
    /// are ignored.
    pub fn parse(text: &str) -> Result<Self, PersistError> {
        let fields: Vec<&str> = text.split(';').collect();
        if fields.len() < 5 {
            return Err(PersistError::MissingFields {
                expected: 5,
                found: fields.len(),
                text: text.to_string()
            })
        }

        Ok(Self {
            disabled: fields[0] == "1",
            active_config: fields[1].to_string(),
            offset_m: parse_vector(fields[2], fields[3], fields[4])?
        })
    }

    /// Serialise the state into its persisted text.
    pub fn to_text(&self) -> String {
        format!(
            "{};{};{};{};{}",
            if self.disabled { "1" } else { "0" },
            self.active_config,
            self.offset_m.x,
            self.offset_m.y,
            self.offset_m.z
        )
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_to_text() {
        let state = VolatileState {
            disabled: true,
            active_config: "convoy".into(),
            offset_m: Vector3::new(-5.5, 0.0, 12.0)
        };
        assert_eq!(state.to_text(), "1;convoy;-5.5;0;12");
    }

    #[test]
    fn test_parse() {
        let state = VolatileState::parse("0;default;50;0;0").unwrap();
        assert!(!state.disabled);
        assert_eq!(state.active_config, "default");
        assert_eq!(state.offset_m, Vector3::new(50.0, 0.0, 0.0));

        // Awkward values survive exactly
        let state = VolatileState {
            disabled: false,
            active_config: "x".into(),
            offset_m: Vector3::new(0.1 + 0.2, 1.0 / 3.0, -1e-300)
        };
        assert_eq!(VolatileState::parse(&state.to_text()).unwrap(), state);
    }

    #[test]
    fn test_parse_errors() {
        assert!(VolatileState::parse("").is_err());
        assert!(VolatileState::parse("0;default;1;2").is_err());
        assert!(VolatileState::parse("0;default;1;2;z").is_err());
    }
}
