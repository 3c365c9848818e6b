//! Document store access
//!
//! The pipeline only ever lists entry names and reads one entry at a time,
//! so both operations sit behind [`DocumentStore`]. [`FsStore`] backs it
//! with a directory; [`MemoryStore`] with a map, for tests and embedding.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{DocsError, DocsResult};

/// Read-only access to a flat collection of named entries
pub trait DocumentStore: Send + Sync {
    /// Names of all file entries at the store root
    fn list_entries(&self) -> DocsResult<Vec<String>>;

    /// Raw text of one entry, `None` if the store has no such entry
    fn read_entry(&self, name: &str) -> DocsResult<Option<String>>;
}

impl<T: DocumentStore + ?Sized> DocumentStore for &T {
    fn list_entries(&self) -> DocsResult<Vec<String>> {
        (**self).list_entries()
    }

    fn read_entry(&self, name: &str) -> DocsResult<Option<String>> {
        (**self).read_entry(name)
    }
}

/// A directory of markdown files
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn unavailable(&self, source: io::Error) -> DocsError {
        DocsError::StoreUnavailable {
            path: self.root.clone(),
            source,
        }
    }

    fn check_root(&self) -> DocsResult<()> {
        let metadata = fs::metadata(&self.root).map_err(|e| self.unavailable(e))?;
        if !metadata.is_dir() {
            return Err(self.unavailable(io::Error::other("not a directory")));
        }
        Ok(())
    }
}

impl DocumentStore for FsStore {
    fn list_entries(&self) -> DocsResult<Vec<String>> {
        self.check_root()?;

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                // A broken entry is skipped; only the root failing is an outage
                Err(e) if e.depth() > 0 => {
                    tracing::warn!("Skipping unreadable entry in {:?}: {}", self.root, e);
                    continue;
                }
                Err(e) => return Err(self.unavailable(e.into())),
            };
            if !entry.file_type().is_file() {
                continue;
            }
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => tracing::debug!("Skipping non UTF-8 entry {:?}", entry.path()),
            }
        }

        tracing::debug!("Found {} entries in {:?}", names.len(), self.root);
        Ok(names)
    }

    fn read_entry(&self, name: &str) -> DocsResult<Option<String>> {
        let path = self.root.join(name);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // A missing root is the store's problem, not the document's
                self.check_root()?;
                Ok(None)
            }
            Err(e) => match fs::metadata(&path) {
                // Directories are never listed, so they are not documents either
                Ok(metadata) if !metadata.is_file() => Ok(None),
                _ => Err(self.unavailable(e)),
            },
        }
    }
}

/// An in-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with_entry(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.insert(name, text);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(name.into(), text.into());
    }
}

impl DocumentStore for MemoryStore {
    fn list_entries(&self) -> DocsResult<Vec<String>> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn read_entry(&self, name: &str) -> DocsResult<Option<String>> {
        Ok(self.entries.get(name).cloned())
    }
}
