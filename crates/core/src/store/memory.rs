//! In-process [`AttendanceStore`] backed by hash maps.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{AttendanceStore, MonthSnapshot, StoreError};
use crate::month::MonthKey;
use crate::people::{NewPerson, Person};
use crate::record::AttendanceRecord;
use crate::status::DayStatus;
use crate::types::DbId;

#[derive(Debug, Default)]
struct State {
    next_id: DbId,
    people: BTreeMap<DbId, Person>,
    records: HashMap<(DbId, MonthKey), AttendanceRecord>,
}

/// Hash-map store. Writes can be made to fail on demand to exercise the
/// optimistic update path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent day/note write fail with a backend error.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Backend("simulated write failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn record_mut<'a>(
        state: &'a mut State,
        person_id: DbId,
        month: MonthKey,
    ) -> Result<&'a mut AttendanceRecord, StoreError> {
        if !state.people.contains_key(&person_id) {
            return Err(StoreError::UnknownPerson(person_id));
        }
        Ok(state
            .records
            .entry((person_id, month))
            .or_insert_with(|| AttendanceRecord::empty(person_id, month)))
    }
}

#[async_trait]
impl AttendanceStore for MemoryStore {
    async fn load_month(&self, month: MonthKey) -> Result<MonthSnapshot, StoreError> {
        let state = self.lock()?;
        let people = state
            .people
            .values()
            .filter(|p| p.active || state.records.contains_key(&(p.id, month)))
            .cloned()
            .collect();
        let records = state
            .records
            .values()
            .filter(|r| r.month == month)
            .cloned()
            .collect();
        Ok(MonthSnapshot { people, records })
    }

    async fn write_day_status(
        &self,
        person_id: DbId,
        date: NaiveDate,
        month: MonthKey,
        status: DayStatus,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.lock()?;
        Self::record_mut(&mut state, person_id, month)?
            .days
            .insert(date, status);
        Ok(())
    }

    async fn write_note(
        &self,
        person_id: DbId,
        date: NaiveDate,
        month: MonthKey,
        text: Option<&str>,
    ) -> Result<(), StoreError> {
        self.check_writable()?;
        let mut state = self.lock()?;
        let record = Self::record_mut(&mut state, person_id, month)?;
        match text {
            Some(text) => {
                record.notes.insert(date, text.to_string());
            }
            None => {
                record.notes.remove(&date);
            }
        }
        Ok(())
    }

    async fn create_person(&self, input: &NewPerson) -> Result<Person, StoreError> {
        let mut state = self.lock()?;
        if state
            .people
            .values()
            .any(|p| p.document_number == input.document_number)
        {
            return Err(StoreError::Conflict(format!(
                "Document number {} already registered",
                input.document_number
            )));
        }
        state.next_id += 1;
        let person = Person {
            id: state.next_id,
            full_name: input.full_name.clone(),
            document_number: input.document_number.clone(),
            active: true,
        };
        state.people.insert(person.id, person.clone());
        Ok(person)
    }

    async fn set_person_active(
        &self,
        person_id: DbId,
        active: bool,
    ) -> Result<Option<Person>, StoreError> {
        let mut state = self.lock()?;
        Ok(state.people.get_mut(&person_id).map(|person| {
            person.active = active;
            person.clone()
        }))
    }

    async fn delete_person(&self, person_id: DbId) -> Result<bool, StoreError> {
        let mut state = self.lock()?;
        let existed = state.people.remove(&person_id).is_some();
        state.records.retain(|(owner, _), _| *owner != person_id);
        Ok(existed)
    }
}
