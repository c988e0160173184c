//! File-backed state store.
//!
//! Each namespace is one CBOR file under a directory. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous record intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rangewatch_sdk::{StateStore, StoreError};
use rangewatch_types::PersistedState;
use tracing::trace;

use crate::error::AdapterError;

const EXTENSION: &str = "cbor";

/// A [`StateStore`] writing one file per namespace.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the directory records live in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record for `namespace`.
    ///
    /// Namespaces are flat keys; anything that could escape the directory
    /// is refused.
    pub fn path_for(&self, namespace: &str) -> Result<PathBuf, AdapterError> {
        let valid = !namespace.is_empty()
            && namespace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
            && !namespace.starts_with('.');
        if !valid {
            return Err(AdapterError::InvalidNamespace(namespace.to_string()));
        }
        Ok(self.dir.join(format!("{namespace}.{EXTENSION}")))
    }

    fn write(&self, namespace: &str, record: &PersistedState) -> Result<(), AdapterError> {
        let path = self.path_for(namespace)?;
        let bytes = minicbor::to_vec(record).map_err(|e| AdapterError::Encode(e.to_string()))?;

        fs::create_dir_all(&self.dir)?;
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp, &bytes)?;
        fs::rename(&tmp, &path)?;

        trace!(namespace, path = %path.display(), "Record written");
        Ok(())
    }

    fn read(&self, namespace: &str) -> Result<Option<PersistedState>, AdapterError> {
        let path = self.path_for(namespace)?;
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        minicbor::decode(&bytes)
            .map(Some)
            .map_err(|e| AdapterError::Decode(e.to_string()))
    }
}

impl StateStore for FileStore {
    fn store(&self, namespace: &str, record: &PersistedState) -> Result<(), StoreError> {
        Ok(self.write(namespace, record)?)
    }

    fn load(&self, namespace: &str) -> Result<Option<PersistedState>, StoreError> {
        self.read(namespace).map_err(|e| match e {
            AdapterError::Io(io) => StoreError::Read(io.to_string()),
            other => other.into(),
        })
    }
}
