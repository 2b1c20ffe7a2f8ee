//! Named offset configurations
//!
//! Persisted as one line per configuration:
//!
//! ```text
//! default 50 0 0
//! left_flank -20 0 10
//! ```
//!
//! Fields are separated by single spaces. Blank lines are ignored, fields after the fourth are
//! ignored, and anything else which isn't a name followed by three numbers fails the whole parse.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::collections::BTreeMap;

use nalgebra::Vector3;

use super::{parse_vector, PersistError};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name of the configuration which always exists.
pub const DEFAULT_CONFIG: &str = "default";

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Mapping from configuration name to offset.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigStore {
    configs: BTreeMap<String, Vector3<f64>>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl ConfigStore {
    /// Create a store holding only the default configuration.
    pub fn new(default_offset_m: Vector3<f64>) -> Self {
        let mut configs = BTreeMap::new();
        configs.insert(DEFAULT_CONFIG.to_string(), default_offset_m);
        Self { configs }
    }

    /// Parse a store from its persisted text.
    ///
    /// The default configuration is inserted first, so it exists even if the text doesn't mention
    /// it, but an entry for it in the text takes precedence.
    pub fn parse(text: &str, default_offset_m: Vector3<f64>) -> Result<Self, PersistError> {
        let mut store = Self::new(default_offset_m);

        for line in text.split('\n') {
            if line.trim().is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split(' ').collect();
            if fields.len() < 4 {
                return Err(PersistError::MissingFields {
                    expected: 4,
                    found: fields.len(),
                    text: line.to_string()
                })
            }

            let offset_m = parse_vector(fields[1], fields[2], fields[3])?;
            store.configs.insert(fields[0].to_string(), offset_m);
        }

        Ok(store)
    }

    /// Serialise the store into its persisted text.
    pub fn to_text(&self) -> String {
        self.configs
            .iter()
            .map(|(name, o)| format!("{} {} {} {}\n", name, o.x, o.y, o.z))
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<Vector3<f64>> {
        self.configs.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.configs.contains_key(name)
    }

    /// Insert or overwrite a configuration.
    pub fn insert(&mut self, name: &str, offset_m: Vector3<f64>) {
        self.configs.insert(name.to_string(), offset_m);
    }

    /// Iterate over the configuration names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(|k| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
