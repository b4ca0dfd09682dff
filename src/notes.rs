//! Notes
//!
//! A small collection of titled notes kept as one JSON array on disk.
//! Every mutation rewrites the whole file when the notebook is file-backed.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::color_space::Rgb;
use crate::documents::{sort_newest_first, DocumentEntry, DocumentStore};
use crate::error::StoreError;

/// Card color given to new notes
pub const DEFAULT_NOTE_COLOR: Rgb = Rgb::new(0x6C, 0x93, 0xA3);

/// Colors offered when recoloring a note card
pub const NOTE_PRESET_COLORS: [Rgb; 10] = [
    Rgb::new(0x6C, 0x93, 0xA3),
    Rgb::new(0xA3, 0xC9, 0x93),
    Rgb::new(0xE8, 0xB4, 0xA3),
    Rgb::new(0xB4, 0xA3, 0xD6),
    Rgb::new(0xF4, 0xC2, 0xC2),
    Rgb::new(0xFF, 0xD9, 0x3D),
    Rgb::new(0x6B, 0xCB, 0x77),
    Rgb::new(0xFF, 0x6B, 0x6B),
    Rgb::new(0x4E, 0xCD, 0xC4),
    Rgb::new(0x95, 0xE1, 0xD3),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub color: Rgb,
    pub updated_at: SystemTime,
}

impl Note {
    fn new(title: String, content: String, updated_at: SystemTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            title,
            content,
            color: DEFAULT_NOTE_COLOR,
            updated_at,
        }
    }

    /// Title shown for a note whose title is blank
    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            "Untitled"
        } else {
            &self.title
        }
    }
}

fn normalize_title(title: &str) -> Result<String, StoreError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(StoreError::InvalidName(title.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Ordered collection of notes, optionally persisted as JSON
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: Vec<Note>,
    path: Option<PathBuf>,
}

impl NoteBook {
    /// Notebook that lives only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the notebook at `path`; a missing file is an empty notebook
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let notes = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            if contents.trim().is_empty() {
                Vec::new()
            } else {
                serde_json::from_str(&contents).map_err(|e| StoreError::Corrupt {
                    path: path.display().to_string(),
                    reason: e.to_string(),
                })?
            }
        } else {
            debug!("no notes at {}, starting empty", path.display());
            Vec::new()
        };
        debug!("loaded {} notes", notes.len());
        Ok(Self {
            notes,
            path: Some(path),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Notes in stored order
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: Uuid) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    /// Resolve a full id or a unique id prefix, as typed on a command line
    pub fn find_by_prefix(&self, prefix: &str) -> Result<Uuid, StoreError> {
        let prefix = prefix.trim().to_lowercase();
        if let Ok(id) = Uuid::parse_str(&prefix) {
            return self
                .get(id)
                .map(|n| n.id)
                .ok_or_else(|| StoreError::NotFound(prefix.clone()));
        }

        let mut matches = self
            .notes
            .iter()
            .filter(|n| !prefix.is_empty() && n.id.to_string().starts_with(&prefix));
        match (matches.next(), matches.next()) {
            (Some(note), None) => Ok(note.id),
            (Some(_), Some(_)) => Err(StoreError::InvalidName(format!(
                "ambiguous note id prefix {}",
                prefix
            ))),
            _ => Err(StoreError::NotFound(prefix.clone())),
        }
    }

    /// Notes whose title contains `search`, ignoring case, newest first
    pub fn filtered(&self, search: &str) -> Vec<&Note> {
        let needle = search.trim().to_lowercase();
        let mut notes: Vec<&Note> = self
            .notes
            .iter()
            .filter(|n| needle.is_empty() || n.title.to_lowercase().contains(&needle))
            .collect();
        notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        notes
    }

    /// Add an empty note at the front
    pub fn create(&mut self, title: &str) -> Result<Uuid, StoreError> {
        self.create_with_content(title, "")
    }

    pub fn create_with_content(&mut self, title: &str, content: &str) -> Result<Uuid, StoreError> {
        let title = normalize_title(title)?;
        let note = Note::new(title, content.to_string(), self.next_timestamp());
        let id = note.id;
        let mut notes = self.notes.clone();
        notes.insert(0, note);
        self.commit(notes)?;
        info!("created note {}", id);
        Ok(id)
    }

    pub fn rename(&mut self, id: Uuid, title: &str) -> Result<(), StoreError> {
        let title = normalize_title(title)?;
        self.modify(id, |note| note.title = title)
    }

    pub fn update_content(&mut self, id: Uuid, content: &str) -> Result<(), StoreError> {
        self.modify(id, |note| note.content = content.to_string())
    }

    pub fn update_color(&mut self, id: Uuid, color: Rgb) -> Result<(), StoreError> {
        self.modify(id, |note| note.color = color)
    }

    /// Copy a note under a fresh id, placed right after the original
    pub fn duplicate(&mut self, id: Uuid) -> Result<Uuid, StoreError> {
        let index = self.index_of(id)?;
        let mut copy = self.notes[index].clone();
        copy.id = Uuid::new_v4();
        copy.updated_at = self.next_timestamp();
        let copy_id = copy.id;
        let mut notes = self.notes.clone();
        notes.insert(index + 1, copy);
        self.commit(notes)?;
        info!("duplicated note {} as {}", id, copy_id);
        Ok(copy_id)
    }

    pub fn delete(&mut self, id: Uuid) -> Result<Note, StoreError> {
        let index = self.index_of(id)?;
        let mut notes = self.notes.clone();
        let note = notes.remove(index);
        self.commit(notes)?;
        info!("deleted note {}", id);
        Ok(note)
    }

    fn index_of(&self, id: Uuid) -> Result<usize, StoreError> {
        self.notes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn modify(&mut self, id: Uuid, change: impl FnOnce(&mut Note)) -> Result<(), StoreError> {
        let index = self.index_of(id)?;
        let updated_at = self.next_timestamp();
        let mut notes = self.notes.clone();
        let note = &mut notes[index];
        change(note);
        note.updated_at = updated_at;
        self.commit(notes)
    }

    /// Write `notes` out, then adopt them; a failed write leaves the
    /// notebook as it was
    fn commit(&mut self, notes: Vec<Note>) -> Result<(), StoreError> {
        self.persist(&notes)?;
        self.notes = notes;
        Ok(())
    }

    /// Current time, nudged past every stored timestamp so the note
    /// touched last always sorts first
    fn next_timestamp(&self) -> SystemTime {
        let now = SystemTime::now();
        match self.notes.iter().map(|n| n.updated_at).max() {
            Some(latest) if latest >= now => latest + Duration::from_micros(1),
            _ => now,
        }
    }

    fn persist(&self, notes: &[Note]) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(notes)?;
        std::fs::write(path, json)?;
        debug!("wrote {} notes to {}", notes.len(), path.display());
        Ok(())
    }
}

impl DocumentStore for NoteBook {
    type Id = Uuid;

    fn read_text(&self, id: &Uuid) -> Result<String, StoreError> {
        self.get(*id)
            .map(|n| n.content.clone())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list(&self) -> Result<Vec<DocumentEntry<Uuid>>, StoreError> {
        let mut entries: Vec<DocumentEntry<Uuid>> = self
            .notes
            .iter()
            .map(|n| DocumentEntry {
                id: n.id,
                title: n.title.clone(),
                last_modified: n.updated_at,
            })
            .collect();
        sort_newest_first(&mut entries);
        Ok(entries)
    }

    fn create(&mut self, name: &str, text: &str) -> Result<Uuid, StoreError> {
        self.create_with_content(name, text)
    }

    fn rename(&mut self, id: &Uuid, name: &str) -> Result<Uuid, StoreError> {
        NoteBook::rename(self, *id, name)?;
        Ok(*id)
    }

    fn delete(&mut self, id: &Uuid) -> Result<(), StoreError> {
        NoteBook::delete(self, *id).map(|_| ())
    }
}
