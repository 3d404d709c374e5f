//! Persistence of the last submitted host list.
//!
//! The CLI saves the host list text it was given so that the next run can
//! reuse it without `--hosts`.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::warn;

use crate::error::{Result, StoreError};

/// Storage for a single blob of input text.
pub trait InputStore {
    /// Load the saved text. Missing or unreadable state yields an empty string.
    fn load(&self) -> String;

    /// Replace the saved text.
    fn save(&self, text: &str) -> Result<()>;
}

/// [`InputStore`] backed by a plain file.
#[derive(Debug, Clone)]
pub struct FileInputStore {
    path: PathBuf,
}

impl FileInputStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl InputStore for FileInputStore {
    fn load(&self) -> String {
        match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                warn!("cannot read saved input {}: {}", self.path.display(), e);
                String::new()
            }
        }
    }

    fn save(&self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, text).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
