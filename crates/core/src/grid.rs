//! The monthly attendance grid engine.
//!
//! One [`AttendanceGrid`] serves one session. It holds the loaded month, the
//! session's weekend exception ledger and an optimistic local copy of every
//! day map and note. Mutations are applied locally first, then issued to the
//! store one at a time. A failed write is logged and reported back but never
//! rolled back; the local view may diverge from the store until the next load.
//!
//! Cell and note edits come in two phases. `stage_*` applies the local change
//! and returns a [`Staged`] outcome that owns its pending write, so a caller
//! holding the grid behind a lock can release it before awaiting the store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::calendar::{build_calendar, CalendarDay};
use crate::error::CoreError;
use crate::exceptions::WeekendExceptions;
use crate::month::MonthKey;
use crate::notes::NoteLedger;
use crate::people::{NewPerson, Person};
use crate::record::{DayMap, NoteMap};
use crate::status::{display_value, next_status, CellValue, DayStatus};
use crate::store::AttendanceStore;
use crate::totals::{compute_totals, AttendanceTotals};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// What happened to the store write behind an optimistic mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteResult {
    /// No write was needed (locked weekend cell).
    Skipped,
    Persisted,
    /// The store rejected or failed the write; the local value stands.
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellOutcome {
    pub person_id: DbId,
    pub date: NaiveDate,
    pub value: CellValue,
    pub totals: AttendanceTotals,
    pub write: WriteResult,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleOutcome {
    pub date: NaiveDate,
    pub unlocked: bool,
    /// Recomputed totals for every person in the view.
    pub totals: BTreeMap<DbId, AttendanceTotals>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteOutcome {
    pub person_id: DbId,
    pub date: NaiveDate,
    /// Stored text, `None` once cleared.
    pub note: Option<String>,
    pub write: WriteResult,
}

/// An outcome whose `write` field is settled when its pending write commits.
pub trait WriteTracked {
    fn record_write(&mut self, write: WriteResult);
}

impl WriteTracked for CellOutcome {
    fn record_write(&mut self, write: WriteResult) {
        self.write = write;
    }
}

impl WriteTracked for NoteOutcome {
    fn record_write(&mut self, write: WriteResult) {
        self.write = write;
    }
}

#[derive(Debug, Clone)]
enum PendingValue {
    DayStatus(DayStatus),
    Note(Option<String>),
}

/// One store write captured from a local edit. Holds its own store handle
/// and borrows nothing from the grid.
pub struct PendingWrite<S: ?Sized> {
    store: Arc<S>,
    person_id: DbId,
    date: NaiveDate,
    month: MonthKey,
    value: PendingValue,
}

impl<S: AttendanceStore + ?Sized> PendingWrite<S> {
    async fn commit(self) -> WriteResult {
        let Self {
            store,
            person_id,
            date,
            month,
            value,
        } = self;

        match value {
            PendingValue::DayStatus(status) => {
                match store.write_day_status(person_id, date, month, status).await {
                    Ok(()) => {
                        tracing::info!(person_id, %date, %month, %status, "Day status recorded");
                        WriteResult::Persisted
                    }
                    Err(e) => {
                        tracing::warn!(
                            person_id,
                            %date,
                            %month,
                            %status,
                            error = %e,
                            "Day status write failed, local value kept until reload"
                        );
                        WriteResult::Failed
                    }
                }
            }
            PendingValue::Note(note) => {
                match store.write_note(person_id, date, month, note.as_deref()).await {
                    Ok(()) => {
                        tracing::info!(
                            person_id,
                            %date,
                            %month,
                            cleared = note.is_none(),
                            "Note saved"
                        );
                        WriteResult::Persisted
                    }
                    Err(e) => {
                        tracing::warn!(
                            person_id,
                            %date,
                            %month,
                            error = %e,
                            "Note write failed, local value kept until reload"
                        );
                        WriteResult::Failed
                    }
                }
            }
        }
    }
}

/// A locally applied edit and the store write still owed for it.
///
/// Until [`Staged::commit`] runs, `outcome.write` reads [`WriteResult::Skipped`].
pub struct Staged<T, S: ?Sized> {
    pub outcome: T,
    pending: Option<PendingWrite<S>>,
}

impl<T: WriteTracked, S: AttendanceStore + ?Sized> Staged<T, S> {
    /// Whether a store write is still owed.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Issue the pending write, if any, and settle `outcome.write`.
    pub async fn commit(self) -> T {
        let mut outcome = self.outcome;
        if let Some(pending) = self.pending {
            outcome.record_write(pending.commit().await);
        }
        outcome
    }
}

/// Everything a presentation layer needs to draw one month.
#[derive(Debug, Clone, Serialize)]
pub struct MonthView {
    pub month: MonthKey,
    pub calendar_days: Vec<CalendarDay>,
    pub unlocked_dates: Vec<NaiveDate>,
    pub people: Vec<Person>,
    pub day_maps: BTreeMap<DbId, DayMap>,
    /// Display value per calendar day, in calendar order.
    pub cells: BTreeMap<DbId, Vec<CellValue>>,
    pub notes: BTreeMap<DbId, NoteMap>,
    pub totals: BTreeMap<DbId, AttendanceTotals>,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct LoadedMonth {
    month: MonthKey,
    calendar: Vec<CalendarDay>,
    people: Vec<Person>,
    days: HashMap<DbId, DayMap>,
    notes: NoteLedger,
}

impl LoadedMonth {
    fn calendar_day(&self, date: NaiveDate) -> Result<&CalendarDay, CoreError> {
        self.month.ensure_contains(date)?;
        self.calendar
            .get(date.day0() as usize)
            .ok_or_else(|| CoreError::Validation(format!("Date {date} not in calendar")))
    }

    fn ensure_person(&self, person_id: DbId) -> Result<(), CoreError> {
        if self.people.iter().any(|p| p.id == person_id) {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Person",
                id: person_id,
            })
        }
    }

    fn sort_people(&mut self) {
        self.people
            .sort_by(|a, b| a.full_name.cmp(&b.full_name).then(a.id.cmp(&b.id)));
    }
}

/// Per-session grid engine over an [`AttendanceStore`].
pub struct AttendanceGrid<S: ?Sized> {
    store: Arc<S>,
    exceptions: WeekendExceptions,
    loaded: Option<LoadedMonth>,
}

impl<S: AttendanceStore + ?Sized> AttendanceGrid<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            exceptions: WeekendExceptions::new(),
            loaded: None,
        }
    }

    /// The month currently loaded, if any.
    pub fn month(&self) -> Option<MonthKey> {
        self.loaded.as_ref().map(|l| l.month)
    }

    fn loaded(&self) -> Result<&LoadedMonth, CoreError> {
        self.loaded.as_ref().ok_or(CoreError::NoMonthLoaded)
    }

    fn loaded_mut(&mut self) -> Result<&mut LoadedMonth, CoreError> {
        self.loaded.as_mut().ok_or(CoreError::NoMonthLoaded)
    }

    /// Load `month` from the store, replacing the local view.
    ///
    /// The session's weekend exceptions survive reloads.
    pub async fn load_month(&mut self, month: MonthKey) -> Result<MonthView, CoreError> {
        let snapshot = self.store.load_month(month).await?;

        let mut days = HashMap::new();
        let mut notes = NoteLedger::new();
        for mut record in snapshot.records {
            if record.month != month {
                tracing::warn!(
                    person_id = record.person_id,
                    record_month = %record.month,
                    %month,
                    "Store returned record for another month, skipping"
                );
                continue;
            }
            let dropped = record.retain_in_month();
            if dropped > 0 {
                tracing::warn!(
                    person_id = record.person_id,
                    %month,
                    dropped,
                    "Dropped out-of-month or blank entries from attendance record"
                );
            }
            notes.load_person(record.person_id, record.notes);
            days.insert(record.person_id, record.days);
        }

        let mut loaded = LoadedMonth {
            month,
            calendar: build_calendar(month),
            people: snapshot.people,
            days,
            notes,
        };
        loaded.sort_people();

        tracing::debug!(
            %month,
            people = loaded.people.len(),
            "Attendance month loaded"
        );
        self.loaded = Some(loaded);
        self.month_view()
    }

    /// Build the full view of the loaded month with fresh totals.
    pub fn month_view(&self) -> Result<MonthView, CoreError> {
        let loaded = self.loaded()?;
        let empty = DayMap::new();

        let mut day_maps = BTreeMap::new();
        let mut cells = BTreeMap::new();
        let mut notes = BTreeMap::new();
        let mut totals = BTreeMap::new();

        for person in &loaded.people {
            let days = loaded.days.get(&person.id).unwrap_or(&empty);
            let row = loaded
                .calendar
                .iter()
                .map(|day| {
                    display_value(
                        days.get(&day.iso_date).copied(),
                        day.is_weekend,
                        self.exceptions.is_unlocked(day.iso_date),
                    )
                })
                .collect();

            totals.insert(
                person.id,
                compute_totals(days, &loaded.calendar, &self.exceptions),
            );
            cells.insert(person.id, row);
            day_maps.insert(person.id, days.clone());
            notes.insert(
                person.id,
                loaded.notes.for_person(person.id).cloned().unwrap_or_default(),
            );
        }

        Ok(MonthView {
            month: loaded.month,
            calendar_days: loaded.calendar.clone(),
            unlocked_dates: self.exceptions.unlocked_in(loaded.month),
            people: loaded.people.clone(),
            day_maps,
            cells,
            notes,
            totals,
        })
    }

    /// Totals for one person in the loaded month.
    pub fn totals_for(&self, person_id: DbId) -> Result<AttendanceTotals, CoreError> {
        let loaded = self.loaded()?;
        loaded.ensure_person(person_id)?;
        let empty = DayMap::new();
        let days = loaded.days.get(&person_id).unwrap_or(&empty);
        Ok(compute_totals(days, &loaded.calendar, &self.exceptions))
    }

    /// Totals for every person in the loaded month.
    pub fn all_totals(&self) -> Result<BTreeMap<DbId, AttendanceTotals>, CoreError> {
        let loaded = self.loaded()?;
        let empty = DayMap::new();
        Ok(loaded
            .people
            .iter()
            .map(|person| {
                let days = loaded.days.get(&person.id).unwrap_or(&empty);
                (
                    person.id,
                    compute_totals(days, &loaded.calendar, &self.exceptions),
                )
            })
            .collect())
    }

    /// Advance one cell around the status ring and persist the result.
    ///
    /// Locked weekend cells report [`CellValue::NotApplicable`] and touch
    /// neither the local view nor the store.
    pub async fn handle_cell_interaction(
        &mut self,
        person_id: DbId,
        date: NaiveDate,
    ) -> Result<CellOutcome, CoreError> {
        Ok(self.stage_cell_interaction(person_id, date)?.commit().await)
    }

    /// Apply a cell click locally and return the write it owes the store.
    pub fn stage_cell_interaction(
        &mut self,
        person_id: DbId,
        date: NaiveDate,
    ) -> Result<Staged<CellOutcome, S>, CoreError> {
        let exception_active = self.exceptions.is_unlocked(date);
        let loaded = self.loaded_mut()?;
        let month = loaded.month;
        let is_weekend = loaded.calendar_day(date)?.is_weekend;
        loaded.ensure_person(person_id)?;

        let current = loaded
            .days
            .get(&person_id)
            .and_then(|days| days.get(&date))
            .copied();
        let value = next_status(current, is_weekend, exception_active);

        let pending = match value.persistable() {
            Some(status) => {
                loaded.days.entry(person_id).or_default().insert(date, status);
                Some(PendingWrite {
                    store: Arc::clone(&self.store),
                    person_id,
                    date,
                    month,
                    value: PendingValue::DayStatus(status),
                })
            }
            None => None,
        };

        Ok(Staged {
            outcome: CellOutcome {
                person_id,
                date,
                value,
                totals: self.totals_for(person_id)?,
                write: WriteResult::Skipped,
            },
            pending,
        })
    }

    /// Lock or unlock a weekend date and recompute everyone's totals.
    pub fn toggle_weekend_exception(&mut self, date: NaiveDate) -> Result<ToggleOutcome, CoreError> {
        let loaded = self.loaded()?;
        if !loaded.calendar_day(date)?.is_weekend {
            return Err(CoreError::Validation(format!(
                "Date {date} is not a weekend day"
            )));
        }

        let unlocked = self.exceptions.toggle(date);
        tracing::debug!(%date, unlocked, "Weekend exception toggled");

        Ok(ToggleOutcome {
            date,
            unlocked,
            totals: self.all_totals()?,
        })
    }

    /// Note for one cell of the loaded month.
    pub fn note(&self, person_id: DbId, date: NaiveDate) -> Result<Option<&str>, CoreError> {
        let loaded = self.loaded()?;
        loaded.month.ensure_contains(date)?;
        loaded.ensure_person(person_id)?;
        Ok(loaded.notes.get(person_id, date))
    }

    /// Set or clear (blank `text`) one cell's note and persist it.
    pub async fn set_note(
        &mut self,
        person_id: DbId,
        date: NaiveDate,
        text: &str,
    ) -> Result<NoteOutcome, CoreError> {
        Ok(self.stage_note(person_id, date, text)?.commit().await)
    }

    /// Apply a note edit locally and return the write it owes the store.
    pub fn stage_note(
        &mut self,
        person_id: DbId,
        date: NaiveDate,
        text: &str,
    ) -> Result<Staged<NoteOutcome, S>, CoreError> {
        let loaded = self.loaded_mut()?;
        let month = loaded.month;
        loaded.month.ensure_contains(date)?;
        loaded.ensure_person(person_id)?;

        let note = loaded.notes.set(person_id, date, text)?;

        Ok(Staged {
            outcome: NoteOutcome {
                person_id,
                date,
                note: note.clone(),
                write: WriteResult::Skipped,
            },
            pending: Some(PendingWrite {
                store: Arc::clone(&self.store),
                person_id,
                date,
                month,
                value: PendingValue::Note(note),
            }),
        })
    }

    /// Create a person through the store and add them to the loaded view.
    pub async fn create_person(&mut self, input: &NewPerson) -> Result<Person, CoreError> {
        let input = input.normalized().map_err(CoreError::Validation)?;
        let person = self.store.create_person(&input).await?;

        if let Some(loaded) = self.loaded.as_mut() {
            loaded.people.push(person.clone());
            loaded.sort_people();
        }
        tracing::info!(person_id = person.id, "Person created");
        Ok(person)
    }

    /// Soft (de)activate a person. The loaded view keeps them until reload.
    pub async fn set_person_active(
        &mut self,
        person_id: DbId,
        active: bool,
    ) -> Result<Person, CoreError> {
        let person = self
            .store
            .set_person_active(person_id, active)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Person",
                id: person_id,
            })?;

        if let Some(loaded) = self.loaded.as_mut() {
            match loaded.people.iter_mut().find(|p| p.id == person_id) {
                Some(existing) => *existing = person.clone(),
                None if person.active => {
                    loaded.people.push(person.clone());
                    loaded.sort_people();
                }
                None => {}
            }
        }
        tracing::info!(person_id, active, "Person activation changed");
        Ok(person)
    }

    /// Drop a person from the loaded view without touching the store.
    ///
    /// Used when another session deleted them.
    pub fn forget_person(&mut self, person_id: DbId) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.people.retain(|p| p.id != person_id);
            loaded.days.remove(&person_id);
            loaded.notes.remove_person(person_id);
        }
    }

    /// Delete a person through the store and drop them from the view.
    pub async fn delete_person(&mut self, person_id: DbId) -> Result<(), CoreError> {
        let existed = self.store.delete_person(person_id).await?;
        self.forget_person(person_id);

        if !existed {
            return Err(CoreError::NotFound {
                entity: "Person",
                id: person_id,
            });
        }
        tracing::info!(person_id, "Person deleted with attendance and notes");
        Ok(())
    }
}
