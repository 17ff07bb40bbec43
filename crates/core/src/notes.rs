//! Per-person, per-day free-text notes.
//!
//! Notes share the (person, date) coordinate with statuses but are stored and
//! mutated independently; a note may sit on a day with no status. Absence of
//! a key is the only "no note" state: empty text never reaches the map.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::CoreError;
use crate::record::NoteMap;
use crate::types::DbId;

/// Maximum length of a note in characters.
pub const MAX_NOTE_LENGTH: usize = 2_000;

/// Normalize raw note text.
///
/// Returns `Ok(None)` for empty or whitespace-only input (meaning "clear"),
/// the trimmed text otherwise. Text over [`MAX_NOTE_LENGTH`] is rejected.
pub fn normalize_note(text: &str) -> Result<Option<String>, CoreError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > MAX_NOTE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Note exceeds maximum length of {MAX_NOTE_LENGTH} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

#[derive(Debug, Clone, Default)]
pub struct NoteLedger {
    by_person: HashMap<DbId, NoteMap>,
}

impl NoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, person_id: DbId, date: NaiveDate) -> Option<&str> {
        self.by_person
            .get(&person_id)
            .and_then(|notes| notes.get(&date))
            .map(String::as_str)
    }

    /// Set a note, clearing it when `text` is blank. Returns the stored text.
    pub fn set(
        &mut self,
        person_id: DbId,
        date: NaiveDate,
        text: &str,
    ) -> Result<Option<String>, CoreError> {
        match normalize_note(text)? {
            Some(note) => {
                self.by_person
                    .entry(person_id)
                    .or_default()
                    .insert(date, note.clone());
                Ok(Some(note))
            }
            None => {
                self.clear(person_id, date);
                Ok(None)
            }
        }
    }

    /// Remove a note. Returns `true` if one existed.
    pub fn clear(&mut self, person_id: DbId, date: NaiveDate) -> bool {
        let Some(notes) = self.by_person.get_mut(&person_id) else {
            return false;
        };
        let removed = notes.remove(&date).is_some();
        if notes.is_empty() {
            self.by_person.remove(&person_id);
        }
        removed
    }

    /// Replace every note for one person, dropping blank entries.
    pub fn load_person(&mut self, person_id: DbId, notes: NoteMap) {
        let notes: NoteMap = notes
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .collect();
        if notes.is_empty() {
            self.by_person.remove(&person_id);
        } else {
            self.by_person.insert(person_id, notes);
        }
    }

    pub fn for_person(&self, person_id: DbId) -> Option<&NoteMap> {
        self.by_person.get(&person_id)
    }

    pub fn remove_person(&mut self, person_id: DbId) {
        self.by_person.remove(&person_id);
    }
}
