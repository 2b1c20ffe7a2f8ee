//! Storage backings for persisted text

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{cell::RefCell, fs, io::ErrorKind, path::PathBuf, rc::Rc};

use super::PersistError;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A place persisted text can be read from and written to.
///
/// A write either replaces the entire previous content or fails leaving it untouched.
pub trait Backing {
    /// Read the whole content. A backing which has never been written reads as an empty string.
    fn read(&self) -> Result<String, PersistError>;

    /// Replace the whole content.
    fn write(&mut self, content: &str) -> Result<(), PersistError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A backing stored in a file on disk.
#[derive(Debug, Clone)]
pub struct FileBacking {
    path: PathBuf
}

/// A backing held in memory.
///
/// Clones share the same content, so a handle can be kept to inspect what was written after the
/// backing has been given away.
#[derive(Debug, Clone, Default)]
pub struct MemBacking {
    content: Rc<RefCell<String>>
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl FileBacking {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl Backing for FileBacking {
    fn read(&self) -> Result<String, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => Ok(s),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(PersistError::ReadError(e))
        }
    }

    fn write(&mut self, content: &str) -> Result<(), PersistError> {
        // Target is only ever replaced whole
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, content).map_err(PersistError::WriteError)?;
        fs::rename(&tmp_path, &self.path).map_err(PersistError::WriteError)
    }
}

impl MemBacking {
    pub fn new(content: &str) -> Self {
        Self {
            content: Rc::new(RefCell::new(content.to_string()))
        }
    }

    /// Get a copy of the current content.
    pub fn contents(&self) -> String {
        self.content.borrow().clone()
    }
}

impl Backing for MemBacking {
    fn read(&self) -> Result<String, PersistError> {
        Ok(self.contents())
    }

    fn write(&mut self, content: &str) -> Result<(), PersistError> {
        *self.content.borrow_mut() = content.to_string();
        Ok(())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
