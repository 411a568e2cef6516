//! FileStorage - one file per table inside a root directory.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use super::Storage;
use crate::error::{RecordError, Result};

#[derive(Clone, Debug)]
pub struct FileStorage {
    root: PathBuf,
}

impl Default for FileStorage {
    fn default() -> Self {
        FileStorage::new(".")
    }
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path(&self, location: &str) -> PathBuf {
        self.root.join(location)
    }

    fn io_error(&self, location: &str, source: std::io::Error) -> RecordError {
        RecordError::Io {
            location: self.path(location).display().to_string(),
            source,
        }
    }
}

impl Storage for FileStorage {
    fn exists(&self, location: &str) -> Result<bool> {
        Ok(self.path(location).is_file())
    }

    fn read(&self, location: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.path(location)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(self.io_error(location, err)),
        }
    }

    fn write(&self, location: &str, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root).map_err(|err| self.io_error(location, err))?;
        fs::write(self.path(location), bytes).map_err(|err| self.io_error(location, err))
    }
}
