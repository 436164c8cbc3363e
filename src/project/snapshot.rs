use crate::classifier::{Classifications, KeywordConfig};
use crate::dictionary::Dictionaries;
use crate::error::PersistenceError;
use crate::model::{Connection, Step};
use bincode::config::standard;
use bincode::serde::{decode_from_slice, encode_to_vec};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Everything a project needs to be restored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectSnapshot {
    pub steps: Vec<Step>,
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub classifications: Classifications,
    #[serde(default)]
    pub dictionaries: Dictionaries,
}

/// A storage backend for project snapshots.
pub trait Persistence {
    /// Returns `None` when nothing has been saved yet.
    fn load(&self) -> Result<Option<ProjectSnapshot>, PersistenceError>;

    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), PersistenceError>;
}

/// Stores the snapshot as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Persistence for JsonFile {
    fn load(&self) -> Result<Option<ProjectSnapshot>, PersistenceError> {
        let Some(bytes) = read_if_exists(&self.path)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(snapshot)?;
        write(&self.path, &json)
    }
}

/// Stores the snapshot in the compact bincode format.
#[derive(Debug, Clone)]
pub struct BincodeFile {
    path: PathBuf,
}

impl BincodeFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Persistence for BincodeFile {
    fn load(&self) -> Result<Option<ProjectSnapshot>, PersistenceError> {
        let Some(bytes) = read_if_exists(&self.path)? else {
            return Ok(None);
        };
        decode_from_slice(&bytes, standard())
            .map(|(snapshot, _)| Some(snapshot))
            .map_err(|e| PersistenceError::Bincode(format!("Deserialization failed: {}", e)))
    }

    fn save(&self, snapshot: &ProjectSnapshot) -> Result<(), PersistenceError> {
        let bytes = encode_to_vec(snapshot, standard())
            .map_err(|e| PersistenceError::Bincode(format!("Serialization failed: {}", e)))?;
        write(&self.path, &bytes)
    }
}

fn read_if_exists(path: &Path) -> Result<Option<Vec<u8>>, PersistenceError> {
    match fs::read(path) {
        Ok(bytes) => {
            debug!(path = %path.display(), bytes = bytes.len(), "read snapshot");
            Ok(Some(bytes))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(PersistenceError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), PersistenceError> {
    fs::write(path, bytes).map_err(|source| PersistenceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    debug!(path = %path.display(), bytes = bytes.len(), "wrote snapshot");
    Ok(())
}
