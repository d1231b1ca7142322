//! File-per-note store with an in-memory index

use crate::atomic::{retry_once, write_atomic, TEMP_SUFFIX};
use crate::StoreError;
use chrono::{DateTime, Utc};
use scrivener_domain::{NewNote, Note, NoteId, NoteUpdate};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension of persisted note records
const RECORD_EXTENSION: &str = "json";

/// Name of the file used to check that the directory is writable
const PROBE_FILE: &str = ".write-probe";

/// A record that was not loaded at startup
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    /// Path of the offending file
    pub path: PathBuf,
    /// Why it was skipped
    pub reason: String,
}

/// Outcome of rebuilding the index from disk
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Number of notes loaded
    pub loaded: usize,
    /// Records that failed to read, parse or validate
    pub skipped: Vec<SkippedRecord>,
    /// Stale temporary files removed
    pub removed_temp_files: usize,
}

impl LoadReport {
    fn skip(&mut self, path: PathBuf, reason: String) {
        warn!("Skipping note record {}: {}", path.display(), reason);
        self.skipped.push(SkippedRecord { path, reason });
    }
}

/// Note store backed by one JSON file per note
///
/// The store assumes it is the only writer of its directory.
pub struct FileStore {
    dir: PathBuf,
    notes: BTreeMap<NoteId, Note>,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir` and load every
    /// record in it
    ///
    /// Unreadable records never abort loading; they are reported in the
    /// returned [`LoadReport`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Directory`] if the directory cannot be created,
    /// listed or written.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<(Self, LoadReport), StoreError> {
        let dir = dir.as_ref().to_path_buf();
        let dir_error = |source: io::Error| StoreError::Directory {
            path: dir.clone(),
            source,
        };

        fs::create_dir_all(&dir).map_err(dir_error)?;
        let probe = dir.join(PROBE_FILE);
        fs::write(&probe, b"").map_err(dir_error)?;
        fs::remove_file(&probe).map_err(dir_error)?;

        let mut report = LoadReport::default();
        let mut paths = Vec::new();
        for entry in fs::read_dir(&dir).map_err(dir_error)? {
            match entry {
                Ok(entry) => paths.push(entry.path()),
                Err(e) => report.skip(dir.clone(), format!("directory entry unreadable: {}", e)),
            }
        }
        paths.sort();

        let mut store = Self {
            dir: dir.clone(),
            notes: BTreeMap::new(),
        };

        for path in paths {
            let name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    report.skip(path, "file name is not valid UTF-8".to_string());
                    continue;
                }
            };

            if name.ends_with(&format!(".{}{}", RECORD_EXTENSION, TEMP_SUFFIX)) {
                match fs::remove_file(&path) {
                    Ok(()) => {
                        debug!("Removed stale temp file {}", path.display());
                        report.removed_temp_files += 1;
                    }
                    Err(e) => warn!("Could not remove stale temp file {}: {}", path.display(), e),
                }
                continue;
            }

            if path.extension().and_then(|e| e.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }

            match Self::load_record(&path) {
                Ok(note) => {
                    store.notes.insert(note.id.clone(), note);
                    report.loaded += 1;
                }
                Err(reason) => report.skip(path, reason),
            }
        }

        info!(
            "Opened note store at {}: {} loaded, {} skipped",
            dir.display(),
            report.loaded,
            report.skipped.len()
        );

        Ok((store, report))
    }

    /// Read and validate a single record
    fn load_record(path: &Path) -> Result<Note, String> {
        let bytes = fs::read(path).map_err(|e| format!("read failed: {}", e))?;
        let note: Note =
            serde_json::from_slice(&bytes).map_err(|e| format!("parse failed: {}", e))?;

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        if note.id.as_str() != stem {
            return Err(format!("record id '{}' does not match file name", note.id));
        }
        note.validate()?;
        Ok(note)
    }

    /// Storage directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of notes in the store
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// True when the store holds no notes
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Path of the record for `id`
    pub fn record_path(&self, id: &NoteId) -> PathBuf {
        self.dir.join(format!("{}.{}", id, RECORD_EXTENSION))
    }

    /// Create a note stamped with the current time
    pub fn create(&mut self, new: NewNote) -> Result<Note, StoreError> {
        self.create_at(new, Utc::now())
    }

    /// Create a note stamped with `now`
    ///
    /// The id is derived from `now`; a numeric suffix is appended when that
    /// id is already taken, in memory or on disk.
    pub fn create_at(&mut self, new: NewNote, now: DateTime<Utc>) -> Result<Note, StoreError> {
        if new.title.trim().is_empty() {
            return Err(StoreError::InvalidData("Title cannot be empty".to_string()));
        }

        let note = Note {
            id: self.fresh_id(now),
            title: new.title,
            content: new.content,
            tags: new.tags,
            auto_tagged: new.auto_tagged,
            created_at: now,
            updated_at: now,
        };

        self.persist(&note)?;
        info!("Created note {} ({} tags)", note.id, note.tags.len());
        self.notes.insert(note.id.clone(), note.clone());
        Ok(note)
    }

    fn fresh_id(&self, now: DateTime<Utc>) -> NoteId {
        let base = NoteId::from_timestamp(now);
        let mut candidate = base.clone();
        let mut n = 0;
        while self.notes.contains_key(&candidate) || self.record_path(&candidate).exists() {
            n += 1;
            candidate = base.with_suffix(n);
        }
        candidate
    }

    /// Get a note by id
    pub fn get(&self, id: &NoteId) -> Result<&Note, StoreError> {
        self.notes
            .get(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Merge the supplied fields into an existing note
    ///
    /// Supplied tags are treated as manual tags and clear `auto_tagged`.
    /// The classifier is never consulted here.
    pub fn update(&mut self, id: &NoteId, update: NoteUpdate) -> Result<Note, StoreError> {
        let mut note = self.get(id)?.clone();

        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(StoreError::InvalidData("Title cannot be empty".to_string()));
            }
            note.title = title;
        }
        if let Some(content) = update.content {
            note.content = content;
        }
        if let Some(tags) = update.tags {
            note.tags = tags;
            note.auto_tagged = false;
        }

        self.commit(note)
    }

    /// Replace a note's tags with a fresh classification result
    pub fn retag(&mut self, id: &NoteId, tags: Vec<String>) -> Result<Note, StoreError> {
        let mut note = self.get(id)?.clone();
        note.tags = tags;
        note.auto_tagged = true;
        self.commit(note)
    }

    /// Stamp, persist, then publish a modified note
    fn commit(&mut self, mut note: Note) -> Result<Note, StoreError> {
        note.updated_at = note.next_update_time(Utc::now());
        self.persist(&note)?;
        debug!("Updated note {}", note.id);
        self.notes.insert(note.id.clone(), note.clone());
        Ok(note)
    }

    /// Delete a note, returning the removed record
    ///
    /// Deleting an absent id reports [`StoreError::NotFound`].
    pub fn delete(&mut self, id: &NoteId) -> Result<Note, StoreError> {
        if !self.notes.contains_key(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        let path = self.record_path(id);
        retry_once("delete note record", || match fs::remove_file(&path) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        })?;

        info!("Deleted note {}", id);
        self.notes
            .remove(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Case-insensitive substring search over title, content and tags
    pub fn search(&self, query: &str) -> Vec<Note> {
        self.sorted(|note| note.matches_query(query))
    }

    /// Notes carrying `tag` (case-insensitive exact match)
    pub fn search_by_tag(&self, tag: &str) -> Vec<Note> {
        self.sorted(|note| note.has_tag(tag))
    }

    /// All notes, optionally truncated to `limit`
    pub fn list(&self, limit: Option<usize>) -> Vec<Note> {
        let mut notes = self.sorted(|_| true);
        if let Some(limit) = limit {
            notes.truncate(limit);
        }
        notes
    }

    /// Matching notes, most recently updated first
    fn sorted(&self, mut keep: impl FnMut(&Note) -> bool) -> Vec<Note> {
        let mut notes: Vec<Note> = self.notes.values().filter(|n| keep(n)).cloned().collect();
        notes.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        notes
    }

    /// Write a record atomically, retrying once
    fn persist(&self, note: &Note) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(note)?;
        let path = self.record_path(&note.id);
        retry_once("write note record", || write_atomic(&path, &bytes))?;
        Ok(())
    }
}
