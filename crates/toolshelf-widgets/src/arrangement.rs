#![forbid(unsafe_code)]

//! Persisted arrangement of a toolbar's active side.
//!
//! One record per toolbar, stored as JSON:
//!
//! ```json
//! {
//!   "collection": "Render_toolbar",
//!   "format_version": 1,
//!   "caller_version": 3,
//!   "count": 2,
//!   "labels": ["clip", "paint"]
//! }
//! ```
//!
//! A record is checked in full before anything is touched. Any mismatch
//! rejects the whole record and the toolbar keeps what it had.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use toolshelf_core::{debug, warn};

use crate::toolbar::DragDropToolbar;

/// Version of the record layout written by this crate.
pub const FORMAT_VERSION: u32 = 1;

/// Ordered token names of one collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrangementRecord {
    /// Collection title with spaces replaced by `_`.
    pub collection: String,
    pub format_version: u32,
    /// Opaque caller-supplied version, round-tripped unchanged.
    pub caller_version: u32,
    pub count: usize,
    pub labels: Vec<String>,
}

impl ArrangementRecord {
    /// Record the active side of `toolbar`.
    #[must_use]
    pub fn capture(toolbar: &DragDropToolbar, caller_version: u32) -> Self {
        let labels = toolbar.active().names();
        Self {
            collection: toolbar.active().record_name(),
            format_version: FORMAT_VERSION,
            caller_version,
            count: labels.len(),
            labels,
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, ArrangementError> {
        serde_json::to_vec_pretty(self).map_err(ArrangementError::Encode)
    }

    /// Parse and check a stored record against what the caller expects.
    pub fn decode(
        bytes: &[u8],
        collection: &str,
        caller_version: u32,
    ) -> Result<Self, ArrangementError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(ArrangementError::Empty);
        }
        let record: Self = serde_json::from_slice(bytes).map_err(ArrangementError::Parse)?;
        record.check(collection, caller_version)?;
        Ok(record)
    }

    fn check(&self, collection: &str, caller_version: u32) -> Result<(), ArrangementError> {
        if self.collection != collection {
            return Err(ArrangementError::CollectionMismatch {
                expected: collection.to_owned(),
                found: self.collection.clone(),
            });
        }
        if self.format_version != FORMAT_VERSION {
            return Err(ArrangementError::FormatVersion {
                expected: FORMAT_VERSION,
                found: self.format_version,
            });
        }
        if self.caller_version != caller_version {
            return Err(ArrangementError::CallerVersion {
                expected: caller_version,
                found: self.caller_version,
            });
        }
        if self.count != self.labels.len() {
            return Err(ArrangementError::CountMismatch {
                count: self.count,
                labels: self.labels.len(),
            });
        }
        if self.count == 0 {
            return Err(ArrangementError::NoLabels);
        }
        Ok(())
    }

    /// Make the toolbar's active side match this record. Returns how many
    /// tokens are active afterwards.
    pub fn apply(&self, toolbar: &mut DragDropToolbar) -> usize {
        toolbar.arrange(&self.labels)
    }
}

/// Why a stored arrangement was not restored.
#[derive(Debug)]
pub enum ArrangementError {
    Empty,
    Parse(serde_json::Error),
    Encode(serde_json::Error),
    CollectionMismatch { expected: String, found: String },
    FormatVersion { expected: u32, found: u32 },
    CallerVersion { expected: u32, found: u32 },
    CountMismatch { count: usize, labels: usize },
    NoLabels,
    Storage(StorageError),
}

impl fmt::Display for ArrangementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "arrangement record is empty"),
            Self::Parse(e) => write!(f, "arrangement parse error: {e}"),
            Self::Encode(e) => write!(f, "arrangement encode error: {e}"),
            Self::CollectionMismatch { expected, found } => write!(
                f,
                "arrangement is for collection `{found}`, expected `{expected}`"
            ),
            Self::FormatVersion { expected, found } => write!(
                f,
                "arrangement format version {found} is not supported (expected {expected})"
            ),
            Self::CallerVersion { expected, found } => write!(
                f,
                "arrangement caller version {found} does not match {expected}"
            ),
            Self::CountMismatch { count, labels } => write!(
                f,
                "arrangement declares {count} labels but holds {labels}"
            ),
            Self::NoLabels => write!(f, "arrangement holds no labels"),
            Self::Storage(e) => write!(f, "arrangement storage error: {e}"),
        }
    }
}

impl std::error::Error for ArrangementError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) | Self::Encode(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for ArrangementError {
    fn from(err: StorageError) -> Self {
        Self::Storage(err)
    }
}

// ---------------------------------------------------------------------------
// Storage backends
// ---------------------------------------------------------------------------

/// Persisted-settings backend.
pub trait StorageBackend {
    /// Bytes stored under `key`, or `None` if nothing was saved.
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError>;
}

/// Storage failure.
#[derive(Debug)]
pub enum StorageError {
    Io { key: String, source: io::Error },
    MissingDirectory(PathBuf),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { key, source } => write!(f, "I/O error for `{key}`: {source}"),
            Self::MissingDirectory(path) => {
                write!(f, "storage directory {} does not exist", path.display())
            }
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::MissingDirectory(_) => None,
        }
    }
}

/// In-process storage, mostly for tests and hosts that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    records: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.records.get(key).map(Vec::as_slice)
    }

    pub fn insert(&mut self, key: impl Into<String>, bytes: impl Into<Vec<u8>>) {
        self.records.insert(key.into(), bytes.into());
    }
}

impl StorageBackend for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.records.insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }
}

/// One `<key>.json` file per record in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir`, which must already exist.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(StorageError::MissingDirectory(dir));
        }
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn load(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        match std::fs::read(self.path_for(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                key: key.to_owned(),
                source,
            }),
        }
    }

    fn save(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        std::fs::write(self.path_for(key), bytes).map_err(|source| StorageError::Io {
            key: key.to_owned(),
            source,
        })
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// Saves and restores toolbar arrangements through a backend.
#[derive(Debug, Clone, Default)]
pub struct ArrangementStore<B> {
    backend: B,
}

impl<B: StorageBackend> ArrangementStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_inner(self) -> B {
        self.backend
    }

    /// Persist the active side of `toolbar`.
    ///
    /// An empty active side is written as a `count: 0` record, which
    /// [`restore`](Self::restore) rejects with [`ArrangementError::NoLabels`]
    /// and leaves the toolbar at its defaults.
    pub fn save(
        &mut self,
        toolbar: &DragDropToolbar,
        caller_version: u32,
    ) -> Result<(), ArrangementError> {
        let record = ArrangementRecord::capture(toolbar, caller_version);
        let bytes = record.to_bytes()?;
        self.backend.save(&record.collection, &bytes)?;
        debug!(
            message = "arrangement.save",
            collection = %record.collection,
            count = record.count
        );
        Ok(())
    }

    /// Restore the active side of `toolbar`.
    ///
    /// Returns `Ok(false)` when nothing was stored. A rejected record
    /// leaves the toolbar unchanged.
    pub fn restore(
        &mut self,
        toolbar: &mut DragDropToolbar,
        caller_version: u32,
    ) -> Result<bool, ArrangementError> {
        let key = toolbar.active().record_name();
        let Some(bytes) = self.backend.load(&key)? else {
            return Ok(false);
        };
        let record = match ArrangementRecord::decode(&bytes, &key, caller_version) {
            Ok(record) => record,
            Err(err) => {
                warn!(message = "arrangement.rejected", collection = %key, error = %err);
                return Err(err);
            }
        };
        let active = record.apply(toolbar);
        debug!(message = "arrangement.restore", collection = %key, active);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action_registry::{ActionInfo, FnCommand};
    use crate::config::ToolbarConfig;

    fn toolbar(names: &[&str]) -> DragDropToolbar {
        let mut tb = DragDropToolbar::new("Render toolbar", ToolbarConfig::default());
        for name in names {
            tb.add_action(*name, FnCommand::new(|_| {}), ActionInfo::default())
                .unwrap();
        }
        tb
    }

    fn record(labels: &[&str]) -> ArrangementRecord {
        ArrangementRecord {
            collection: "Render_toolbar".into(),
            format_version: FORMAT_VERSION,
            caller_version: 3,
            count: labels.len(),
            labels: labels.iter().map(|s| (*s).to_owned()).collect(),
        }
    }

    #[test]
    fn capture_uses_underscored_title() {
        let mut tb = toolbar(&["clip", "paint"]);
        tb.activate("paint");
        let rec = ArrangementRecord::capture(&tb, 3);
        assert_eq!(rec, record(&["paint"]));
    }

    #[test]
    fn decode_checks_every_field() {
        let ok = record(&["clip"]);
        let bytes = ok.to_bytes().unwrap();
        assert_eq!(
            ArrangementRecord::decode(&bytes, "Render_toolbar", 3).unwrap(),
            ok
        );

        let cases: Vec<(ArrangementRecord, &str, u32)> = vec![
            (ok.clone(), "Other", 3),
            (ok.clone(), "Render_toolbar", 4),
            (
                ArrangementRecord {
                    format_version: 2,
                    ..ok.clone()
                },
                "Render_toolbar",
                3,
            ),
            (
                ArrangementRecord {
                    count: 5,
                    ..ok.clone()
                },
                "Render_toolbar",
                3,
            ),
            (record(&[]), "Render_toolbar", 3),
        ];
        let mut seen = Vec::new();
        for (rec, collection, caller) in cases {
            let err =
                ArrangementRecord::decode(&rec.to_bytes().unwrap(), collection, caller).unwrap_err();
            seen.push(std::mem::discriminant(&err));
        }
        seen.dedup();
        assert_eq!(seen.len(), 5, "each case fails for its own reason");
    }

    #[test]
    fn empty_and_garbage_are_rejected() {
        assert!(matches!(
            ArrangementRecord::decode(b"  \n", "Render_toolbar", 3),
            Err(ArrangementError::Empty)
        ));
        let err = ArrangementRecord::decode(b"<xml/>", "Render_toolbar", 3).unwrap_err();
        assert!(matches!(err, ArrangementError::Parse(_)));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn restore_without_record_is_false() {
        let mut store = ArrangementStore::new(MemoryStorage::new());
        let mut tb = toolbar(&["clip"]);
        assert!(!store.restore(&mut tb, 3).unwrap());
    }

    #[test]
    fn save_then_restore() {
        let mut store = ArrangementStore::new(MemoryStorage::new());
        let mut tb = toolbar(&["clip", "paint", "ruler"]);
        tb.activate("ruler");
        tb.activate("clip");
        store.save(&tb, 3).unwrap();
        assert!(store.backend().get("Render_toolbar").is_some());

        let mut fresh = toolbar(&["clip", "paint", "ruler"]);
        assert!(store.restore(&mut fresh, 3).unwrap());
        assert_eq!(fresh.active().names(), ["ruler", "clip"]);
        assert_eq!(fresh.palette().names(), ["paint"]);

        let storage = store.into_inner();
        let saved = ArrangementRecord::decode(
            storage.get("Render_toolbar").unwrap(),
            "Render_toolbar",
            3,
        )
        .unwrap();
        assert_eq!(saved.labels, ["ruler", "clip"]);
    }

    #[test]
    fn cleared_toolbar_saves_a_record_restore_rejects() {
        let mut store = ArrangementStore::new(MemoryStorage::new());
        let tb = toolbar(&["clip", "paint"]);
        store.save(&tb, 3).unwrap();

        let mut fresh = toolbar(&["clip", "paint"]);
        fresh.activate("clip");
        let err = store.restore(&mut fresh, 3).unwrap_err();
        assert!(matches!(err, ArrangementError::NoLabels));
        assert_eq!(fresh.active().names(), ["clip"]);
    }

    #[test]
    fn rejected_record_leaves_toolbar_alone() {
        let mut storage = MemoryStorage::new();
        let mut stale = record(&["clip"]);
        stale.format_version = 0;
        storage.insert("Render_toolbar", stale.to_bytes().unwrap());
        let mut store = ArrangementStore::new(storage);

        let mut tb = toolbar(&["clip", "paint"]);
        tb.activate("paint");
        let err = store.restore(&mut tb, 3).unwrap_err();
        assert!(matches!(err, ArrangementError::FormatVersion { found: 0, .. }));
        assert_eq!(tb.active().names(), ["paint"]);
        assert_eq!(tb.palette().names(), ["clip"]);
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ArrangementStore::new(FileStorage::new(dir.path()).unwrap());
        let mut tb = toolbar(&["clip", "paint"]);
        tb.activate("paint");
        store.save(&tb, 1).unwrap();
        assert!(dir.path().join("Render_toolbar.json").is_file());

        let mut fresh = toolbar(&["clip", "paint"]);
        assert!(store.restore(&mut fresh, 1).unwrap());
        assert_eq!(fresh.active().names(), ["paint"]);
    }

    #[test]
    fn file_storage_needs_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(
            FileStorage::new(&missing),
            Err(StorageError::MissingDirectory(p)) if p == missing
        ));
        let storage = FileStorage::new(dir.path()).unwrap();
        assert_eq!(storage.load("absent").unwrap(), None);
    }
}
