//! # Persistence module
//!
//! The follower persists two pieces of text, each to its own [`Backing`]:
//!
//! - The volatile state (`disabled;active_config;x;y;z`), see [`volatile`].
//! - The named configurations (one `name x y z` line per entry), see [`config_store`].
//!
//! Both are parsed all-or-nothing. If either fails to parse the caller is expected to discard
//! both and fall back to the compiled defaults.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod backing;
pub mod config_store;
pub mod volatile;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use nalgebra::Vector3;

pub use backing::{Backing, FileBacking, MemBacking};
pub use config_store::{ConfigStore, DEFAULT_CONFIG};
pub use volatile::VolatileState;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors that can occur while reading, writing or parsing persisted state.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("Could not read from the backing: {0}")]
    ReadError(std::io::Error),

    #[error("Could not write to the backing: {0}")]
    WriteError(std::io::Error),

    #[error("Expected at least {expected} fields but found {found} in \"{text}\"")]
    MissingFields {
        expected: usize,
        found: usize,
        text: String
    },

    #[error("\"{0}\" is not a valid finite number")]
    InvalidNumber(String),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Read and parse both backings.
///
/// The named configurations always contain [`DEFAULT_CONFIG`], resolving to `default_offset_m`
/// unless the persisted text overrides it. If the persisted active configuration does not exist in
/// the store it is replaced by [`DEFAULT_CONFIG`].
pub fn load(
    volatile_backing: &dyn Backing,
    config_backing: &dyn Backing,
    default_offset_m: Vector3<f64>
) -> Result<(ConfigStore, VolatileState), PersistError> {
    let configs = ConfigStore::parse(&config_backing.read()?, default_offset_m)?;
    let mut volatile = VolatileState::parse(&volatile_backing.read()?)?;

    if !configs.contains(&volatile.active_config) {
        debug!(
            "Persisted active configuration \"{}\" doesn't exist, using \"{}\"",
            volatile.active_config,
            DEFAULT_CONFIG
        );
        volatile.active_config = DEFAULT_CONFIG.to_string();
    }

    Ok((configs, volatile))
}

/// Parse a single coordinate, accepting only finite decimal numbers.
///
/// Surrounding whitespace is ignored.
pub fn parse_coord(token: &str) -> Result<f64, PersistError> {
    match token.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PersistError::InvalidNumber(token.to_string()))
    }
}

/// Parse three coordinate tokens into a vector.
pub fn parse_vector(x: &str, y: &str, z: &str) -> Result<Vector3<f64>, PersistError> {
    Ok(Vector3::new(parse_coord(x)?, parse_coord(y)?, parse_coord(z)?))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
