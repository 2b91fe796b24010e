use std::collections::BTreeMap;
use std::convert::Infallible;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::PhotoRecord;

/// Somewhere to keep extracted photos, keyed by their identifier.
///
/// Construct one at startup and pass it to whatever needs it.
pub trait PhotoStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Stores a record, replacing any with the same identifier.
    fn insert(&mut self, record: PhotoRecord) -> Result<(), Self::Error>;

    /// Every stored record, ordered by identifier.
    fn all(&self) -> Result<Vec<PhotoRecord>, Self::Error>;

    /// Removes every record.
    fn clear(&mut self) -> Result<(), Self::Error>;
}

/// An in-memory store backed by a BTreeMap.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: BTreeMap<String, PhotoRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl PhotoStore for MemoryStore {
    type Error = Infallible;

    fn insert(&mut self, record: PhotoRecord) -> Result<(), Self::Error> {
        self.records.insert(record.identifier().to_owned(), record);
        Ok(())
    }

    fn all(&self) -> Result<Vec<PhotoRecord>, Self::Error> {
        Ok(self.records.values().cloned().collect())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.records.clear();
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("there was an i/o error {0} at {}", .1.display())]
    Io(io::Error, PathBuf),
    #[error("the photo store at {} is not valid json: {0}", .1.display())]
    Serde(serde_json::Error, PathBuf),
}

/// A store kept as one JSON object on disk, rewritten after every change.
///
/// Writes go to a temporary file next to the store which is then renamed
/// over it, and the in-memory map only changes once that has succeeded.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    records: BTreeMap<String, PhotoRecord>,
}

impl JsonStore {
    /// Load the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_owned();
        let records = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| StoreError::Serde(e, path.clone()))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e, path)),
        };
        debug!(path = %path.display(), count = records.len(), "opened photo store");
        Ok(Self { path, records })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self, records: &BTreeMap<String, PhotoRecord>) -> Result<(), StoreError> {
        let io_err = |e| StoreError::Io(e, self.path.clone());
        let bytes = serde_json::to_vec(records).map_err(|e| StoreError::Serde(e, self.path.clone()))?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(&bytes).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;
        Ok(())
    }
}

impl PhotoStore for JsonStore {
    type Error = StoreError;

    fn insert(&mut self, record: PhotoRecord) -> Result<(), Self::Error> {
        let mut records = self.records.clone();
        records.insert(record.identifier().to_owned(), record);
        self.save(&records)?;
        self.records = records;
        Ok(())
    }

    fn all(&self) -> Result<Vec<PhotoRecord>, Self::Error> {
        Ok(self.records.values().cloned().collect())
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.save(&BTreeMap::new())?;
        self.records.clear();
        Ok(())
    }
}
