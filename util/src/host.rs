//! Host platform utility functions

use std::env;
use std::path::PathBuf;

/// Name of the environment variable pointing at the root of the follower software tree.
pub const SW_ROOT_ENV_VAR: &str = "FOLLOWER_SW_ROOT";

/// Get the root directory of the follower software, which contains the `params`, `storage` and
/// `sessions` directories.
pub fn get_follower_sw_root() -> Result<PathBuf, env::VarError> {
    env::var(SW_ROOT_ENV_VAR).map(PathBuf::from)
}
