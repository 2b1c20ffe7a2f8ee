//! # Parameters
//!
//! Parameter files are TOML files kept in `$FOLLOWER_SW_ROOT/params`, deserialised straight into
//! the owning module's parameter struct.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::host;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Directory holding parameter files, relative to the software root.
pub const PARAMS_DIR_NAME: &str = "params";

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("FOLLOWER_SW_ROOT is not set")]
    SwRootNotSet,

    #[error("Cannot read the parameter file: {0}")]
    FileLoadError(std::io::Error),

    #[error("Invalid parameter file: {0}")]
    DeserialiseError(toml::de::Error),
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Load the named file from the parameters directory.
pub fn load<P: DeserializeOwned>(file_name: &str) -> Result<P, LoadError> {
    let root = host::get_follower_sw_root().map_err(|_| LoadError::SwRootNotSet)?;

    load_from_path(root.join(PARAMS_DIR_NAME).join(file_name))
}

/// Load a parameter file from anywhere on disk.
pub fn load_from_path<P: DeserializeOwned, F: AsRef<Path>>(path: F) -> Result<P, LoadError> {
    let text = fs::read_to_string(path).map_err(LoadError::FileLoadError)?;

    from_str(&text)
}

/// Parse parameters from TOML text.
pub fn from_str<P: DeserializeOwned>(text: &str) -> Result<P, LoadError> {
    toml::from_str(text).map_err(LoadError::DeserialiseError)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Endpoints {
        bcast_endpoint: String,
        retries: u32,
    }

    #[test]
    fn test_from_str() {
        let p: Endpoints = from_str("bcast_endpoint = \"tcp://localhost:5020\"\nretries = 3\n")
            .unwrap();
        assert_eq!(p, Endpoints { bcast_endpoint: "tcp://localhost:5020".into(), retries: 3 });

        assert!(matches!(
            from_str::<Endpoints>("retries = \"three\""),
            Err(LoadError::DeserialiseError(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_from_path::<Endpoints, _>("/definitely/not/a/params/file.toml"),
            Err(LoadError::FileLoadError(_))
        ));
    }
}
