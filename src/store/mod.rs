//! JSON-file pathway store.
//!
//! The whole document is held in memory and rewritten on every [`PathwayStore::save`].
//! One writer per backing file is assumed; there is no locking.
//!
//! Stored entries that do not form a valid [`Pathway`] are kept verbatim and
//! written back in their original position, so a save never drops data it
//! could not read.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult, ValidationError};
use crate::models::{parse_timestamp, Pathway, PathwayDraft};

/// Result of [`PathwayStore::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The pathway was appended.
    Added,
    /// A pathway with the same name was already stored; nothing changed.
    Duplicate,
}

/// Document layout on disk, as written.
#[derive(Serialize)]
struct DocumentOut<'a> {
    pathways: Vec<EntryOut<'a>>,
    last_updated: DateTime<Utc>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum EntryOut<'a> {
    Valid(&'a Pathway),
    Raw(&'a serde_json::Value),
}

/// Document layout on disk, as read. Pathways are validated one at a time.
#[derive(Deserialize)]
struct DocumentIn {
    #[serde(default)]
    pathways: Vec<serde_json::Value>,
    #[serde(default)]
    last_updated: Option<serde_json::Value>,
}

/// A stored entry that failed record validation or repeats an earlier name,
/// held for write-back. Only the first holder of a name records it.
#[derive(Debug, Clone)]
struct RejectedEntry {
    /// Number of valid pathways that preceded it in the loaded document.
    position: usize,
    name: Option<String>,
    raw: serde_json::Value,
}

/// In-memory pathway collection backed by a single JSON file.
#[derive(Debug)]
pub struct PathwayStore {
    path: PathBuf,
    pathways: Vec<Pathway>,
    rejected: Vec<RejectedEntry>,
    last_updated: DateTime<Utc>,
}

impl PathwayStore {
    /// Load the store at the configured path.
    pub fn load(config: &StoreConfig) -> Self {
        Self::open(&config.path)
    }

    /// Load the store backed by `path`.
    ///
    /// Never fails: a missing, unreadable, or unparseable file yields an
    /// empty store and the problem is logged.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();

        if let Some(parent) = parent_dir(&path) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "Failed to create store directory");
            }
        }

        let mut store = Self {
            path,
            pathways: Vec::new(),
            rejected: Vec::new(),
            last_updated: Utc::now(),
        };

        if !store.path.exists() {
            debug!(path = %store.path.display(), "No pathway file yet, starting empty");
            return store;
        }

        let contents = match fs::read_to_string(&store.path) {
            Ok(c) => c,
            Err(e) => {
                error!(path = %store.path.display(), error = %e, "Error loading file");
                return store;
            }
        };

        let document: DocumentIn = match serde_json::from_str(&contents) {
            Ok(d) => d,
            Err(e) => {
                error!(path = %store.path.display(), error = %e, "Error loading JSON");
                return store;
            }
        };

        match document.last_updated {
            None | Some(serde_json::Value::Null) => {}
            Some(value) => match value.as_str().and_then(parse_timestamp) {
                Some(ts) => store.last_updated = ts,
                None => warn!(value = %value, "Unreadable document timestamp, using now"),
            },
        }

        for (index, value) in document.pathways.into_iter().enumerate() {
            let reason = match serde_json::from_value::<Pathway>(value.clone()) {
                Ok(pathway) if !store.contains(&pathway.name) => {
                    store.pathways.push(pathway);
                    continue;
                }
                Ok(pathway) => format!("duplicate name {:?}", pathway.name),
                Err(e) => e.to_string(),
            };

            warn!(index, reason = %reason, "Keeping unusable stored pathway unchanged");
            let name = value
                .get("name")
                .and_then(|n| n.as_str())
                .filter(|n| !store.contains(n))
                .map(String::from);
            store.rejected.push(RejectedEntry {
                position: store.pathways.len(),
                name,
                raw: value,
            });
        }

        info!(
            path = %store.path.display(),
            count = store.pathways.len(),
            rejected = store.rejected.len(),
            "Loaded pathways"
        );
        store
    }

    /// Backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Timestamp of the last save (or of the loaded document).
    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }

    /// Valid stored pathways in insertion order.
    pub fn pathways(&self) -> &[Pathway] {
        &self.pathways
    }

    /// Number of valid stored pathways.
    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    /// Whether the store holds no valid pathways.
    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    /// Number of stored entries that failed validation and are kept as-is.
    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    /// Names of all stored entries in document order, including named
    /// entries that failed validation.
    pub fn names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.pathways.len() + self.rejected.len());
        let mut rejected = self.rejected.iter().peekable();
        for (position, pathway) in self.pathways.iter().enumerate() {
            while let Some(entry) = rejected.next_if(|r| r.position <= position) {
                names.extend(entry.name.clone());
            }
            names.push(pathway.name.clone());
        }
        names.extend(rejected.filter_map(|r| r.name.clone()));
        names
    }

    /// Stored names lower-cased, for prompting the discovery model.
    ///
    /// Deduplication itself stays case-sensitive.
    pub fn known_names_lowercase(&self) -> Vec<String> {
        self.names().iter().map(|n| n.to_lowercase()).collect()
    }

    /// Whether an entry with exactly this name is stored.
    pub fn contains(&self, name: &str) -> bool {
        self.pathways.iter().any(|p| p.name == name)
            || self.rejected.iter().any(|r| r.name.as_deref() == Some(name))
    }

    /// Stored pathway with exactly this name.
    pub fn get(&self, name: &str) -> Option<&Pathway> {
        self.pathways.iter().find(|p| p.name == name)
    }

    /// Append `pathway` unless one with the same name is already stored.
    pub fn add(&mut self, pathway: Pathway) -> AddOutcome {
        if self.contains(&pathway.name) {
            info!(name = %pathway.name, "Pathway already exists");
            return AddOutcome::Duplicate;
        }

        info!(name = %pathway.name, id = %pathway.id, "Adding new pathway");
        self.pathways.push(pathway);
        AddOutcome::Added
    }

    /// Validate `draft` and add the resulting pathway.
    pub fn add_draft(&mut self, draft: PathwayDraft) -> Result<AddOutcome, ValidationError> {
        let pathway = Pathway::try_from(draft)?;
        Ok(self.add(pathway))
    }

    /// Write the whole store to its backing file with a fresh timestamp.
    ///
    /// The document goes to a temporary file in the same directory, which
    /// is then renamed over the target.
    pub fn save(&mut self) -> StoreResult<()> {
        let now = Utc::now();
        match self.write_document(now) {
            Ok(()) => {
                self.last_updated = now;
                info!(
                    path = %self.path.display(),
                    count = self.pathways.len(),
                    "Saved pathways"
                );
                Ok(())
            }
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "Error saving database");
                Err(e)
            }
        }
    }

    fn write_document(&self, now: DateTime<Utc>) -> StoreResult<()> {
        let dir = parent_dir(&self.path).unwrap_or_else(|| Path::new("."));
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };

        fs::create_dir_all(dir).map_err(io_err)?;

        let document = DocumentOut {
            pathways: self.document_entries(),
            last_updated: now,
        };

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        serde_json::to_writer_pretty(&mut tmp, &document)?;
        tmp.write_all(b"\n").map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(&self.path).map_err(|e| io_err(e.error))?;

        Ok(())
    }

    /// Valid pathways and rejected raw entries merged back into document order.
    fn document_entries(&self) -> Vec<EntryOut<'_>> {
        let mut entries = Vec::with_capacity(self.pathways.len() + self.rejected.len());
        let mut rejected = self.rejected.iter().peekable();
        for (position, pathway) in self.pathways.iter().enumerate() {
            while let Some(entry) = rejected.next_if(|r| r.position <= position) {
                entries.push(EntryOut::Raw(&entry.raw));
            }
            entries.push(EntryOut::Valid(pathway));
        }
        entries.extend(rejected.map(|r| EntryOut::Raw(&r.raw)));
        entries
    }
}

fn parent_dir(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
