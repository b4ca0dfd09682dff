//! Document storage
//!
//! The styling engine only ever receives raw text. Where that text comes
//! from is a [`DocumentStore`]: a directory of `.txt` files here, or a
//! [`NoteBook`](crate::notes::NoteBook).

use std::fmt::Debug;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::{debug, info};

use crate::error::StoreError;

/// Extension given to every file in a [`FileLibrary`]
pub const TEXT_EXTENSION: &str = "txt";

/// One listed document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEntry<Id> {
    pub id: Id,
    pub title: String,
    pub last_modified: SystemTime,
}

/// Source of raw text addressed by an opaque id
pub trait DocumentStore {
    type Id: Clone + Debug + PartialEq;

    fn read_text(&self, id: &Self::Id) -> Result<String, StoreError>;

    /// Every document, most recently modified first
    fn list(&self) -> Result<Vec<DocumentEntry<Self::Id>>, StoreError>;

    fn create(&mut self, name: &str, text: &str) -> Result<Self::Id, StoreError>;

    /// Rename a document; the returned id replaces `id`
    fn rename(&mut self, id: &Self::Id, name: &str) -> Result<Self::Id, StoreError>;

    fn delete(&mut self, id: &Self::Id) -> Result<(), StoreError>;

    /// Entries whose title contains `term`, ignoring case; a blank term lists all
    fn search(&self, term: &str) -> Result<Vec<DocumentEntry<Self::Id>>, StoreError> {
        let needle = term.trim().to_lowercase();
        let entries = self.list()?;
        if needle.is_empty() {
            return Ok(entries);
        }
        Ok(entries
            .into_iter()
            .filter(|entry| entry.title.to_lowercase().contains(&needle))
            .collect())
    }
}

/// Sort newest first, breaking ties by title
pub(crate) fn sort_newest_first<Id>(entries: &mut [DocumentEntry<Id>]) {
    entries.sort_by(|a, b| {
        b.last_modified
            .cmp(&a.last_modified)
            .then_with(|| a.title.cmp(&b.title))
    });
}

/// Validate a user-supplied file name and give it the text extension
pub fn normalize_file_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    let invalid = || StoreError::InvalidName(name.to_string());

    if trimmed.is_empty() || trimmed.contains(|c| c == '/' || c == '\\' || c == '\0') {
        return Err(invalid());
    }

    let suffix = format!(".{}", TEXT_EXTENSION);
    let stem = trimmed.strip_suffix(&suffix).unwrap_or(trimmed);
    if stem.trim().is_empty() || stem == "." || stem == ".." {
        return Err(invalid());
    }

    Ok(format!("{}{}", stem, suffix))
}

/// A flat directory of plain text files
#[derive(Debug, Clone)]
pub struct FileLibrary {
    dir: PathBuf,
}

impl FileLibrary {
    /// Open a library rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a name would be stored under
    pub fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.dir.join(normalize_file_name(name)?))
    }

    /// Replace the contents of an existing file
    pub fn write_text(&mut self, id: &PathBuf, text: &str) -> Result<(), StoreError> {
        self.ensure_known(id)?;
        fs::write(id, text)?;
        debug!("updated {}", id.display());
        Ok(())
    }

    fn ensure_known(&self, id: &Path) -> Result<(), StoreError> {
        if id.parent() != Some(self.dir.as_path()) || !id.is_file() {
            return Err(StoreError::NotFound(id.display().to_string()));
        }
        Ok(())
    }

    fn title_of(path: &Path) -> String {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl DocumentStore for FileLibrary {
    type Id = PathBuf;

    fn read_text(&self, id: &PathBuf) -> Result<String, StoreError> {
        self.ensure_known(id)?;
        match fs::read_to_string(id) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(id.display().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<DocumentEntry<PathBuf>>, StoreError> {
        let reader = match fs::read_dir(&self.dir) {
            Ok(reader) => reader,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for item in reader {
            let item = item?;
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(TEXT_EXTENSION) {
                continue;
            }
            let metadata = item.metadata()?;
            if !metadata.is_file() {
                continue;
            }
            entries.push(DocumentEntry {
                title: Self::title_of(&path),
                last_modified: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
                id: path,
            });
        }

        sort_newest_first(&mut entries);
        Ok(entries)
    }

    fn create(&mut self, name: &str, text: &str) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name)?;
        fs::create_dir_all(&self.dir)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(Self::title_of(&path)));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(text.as_bytes())?;
        info!("created {}", path.display());
        Ok(path)
    }

    fn rename(&mut self, id: &PathBuf, name: &str) -> Result<PathBuf, StoreError> {
        self.ensure_known(id)?;
        let target = self.path_for(name)?;
        if &target == id {
            return Ok(target);
        }
        // linking fails instead of replacing an existing target
        match fs::hard_link(id, &target) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(Self::title_of(&target)));
            }
            Err(e) => return Err(e.into()),
        }
        fs::remove_file(id)?;
        info!("renamed {} to {}", id.display(), target.display());
        Ok(target)
    }

    fn delete(&mut self, id: &PathBuf) -> Result<(), StoreError> {
        self.ensure_known(id)?;
        fs::remove_file(id)?;
        info!("deleted {}", id.display());
        Ok(())
    }
}
