//! Per-caller grid sessions.
//!
//! Each authenticated caller (JWT subject) owns one [`AttendanceGrid`] behind
//! its own mutex, so at most one mutation per session is in flight. The
//! session holds the weekend exception ledger; it lives until the session is
//! evicted for inactivity or the process restarts.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use asistencia_core::grid::AttendanceGrid;
use asistencia_core::store::AttendanceStore;
use asistencia_core::types::DbId;
use tokio::sync::{Mutex, RwLock};

pub type SessionGrid = AttendanceGrid<dyn AttendanceStore>;

/// Interval between idle-session sweeps.
const SWEEP_INTERVAL_SECS: u64 = 60;

struct SessionEntry {
    grid: Arc<Mutex<SessionGrid>>,
    last_used: Instant,
}

/// Registry of session grids keyed by account id.
///
/// Designed to be wrapped in `Arc` and shared through the app state.
pub struct GridSessions {
    store: Arc<dyn AttendanceStore>,
    sessions: RwLock<HashMap<DbId, SessionEntry>>,
}

impl GridSessions {
    pub fn new(store: Arc<dyn AttendanceStore>) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// The caller's grid, created empty on first use.
    pub async fn grid_for(&self, user_id: DbId) -> Arc<Mutex<SessionGrid>> {
        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(user_id).or_insert_with(|| {
            tracing::debug!(user_id, "Session grid created");
            SessionEntry {
                grid: Arc::new(Mutex::new(AttendanceGrid::new(Arc::clone(&self.store)))),
                last_used: Instant::now(),
            }
        });
        entry.last_used = Instant::now();
        Arc::clone(&entry.grid)
    }

    /// Drop a deleted person from every session except `deleted_by`'s.
    pub async fn forget_person(&self, person_id: DbId, deleted_by: DbId) {
        let grids: Vec<_> = self
            .sessions
            .read()
            .await
            .iter()
            .filter(|(user_id, _)| **user_id != deleted_by)
            .map(|(_, entry)| Arc::clone(&entry.grid))
            .collect();

        for grid in grids {
            grid.lock().await.forget_person(person_id);
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Remove sessions unused for at least `max_idle`. Returns how many went.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_used.elapsed() < max_idle);
        before - sessions.len()
    }
}

/// Spawn a background task that evicts idle sessions every minute.
///
/// Evicted sessions lose their weekend exceptions; the next request starts a
/// fresh grid.
pub fn start_session_sweeper(
    sessions: Arc<GridSessions>,
    max_idle: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));

        loop {
            interval.tick().await;
            let evicted = sessions.evict_idle(max_idle).await;
            if evicted > 0 {
                tracing::info!(evicted, "Evicted idle grid sessions");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use asistencia_core::month::MonthKey;
    use asistencia_core::people::NewPerson;
    use asistencia_core::store::memory::MemoryStore;

    fn sessions() -> GridSessions {
        GridSessions::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn same_user_gets_same_grid() {
        let sessions = sessions();
        let a = sessions.grid_for(1).await;
        let b = sessions.grid_for(1).await;
        let c = sessions.grid_for(2).await;
        assert!(Arc::ptr_eq(&a, &b));
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(sessions.session_count().await, 2);
    }

    #[tokio::test]
    async fn evict_idle_drops_sessions() {
        let sessions = sessions();
        sessions.grid_for(1).await;
        assert_eq!(sessions.evict_idle(Duration::from_secs(3600)).await, 0);
        assert_eq!(sessions.evict_idle(Duration::ZERO).await, 1);
        assert_eq!(sessions.session_count().await, 0);
    }

    #[tokio::test]
    async fn forget_person_reaches_other_sessions() {
        let sessions = sessions();
        let month = MonthKey::parse("2024-04").unwrap();

        let admin = sessions.grid_for(1).await;
        let person = admin
            .lock()
            .await
            .create_person(&NewPerson {
                full_name: "Ana Soto".into(),
                document_number: "100".into(),
            })
            .await
            .unwrap();

        let other = sessions.grid_for(2).await;
        other.lock().await.load_month(month).await.unwrap();
        assert_eq!(other.lock().await.month_view().unwrap().people.len(), 1);

        sessions.forget_person(person.id, 1).await;
        assert!(other.lock().await.month_view().unwrap().people.is_empty());
    }

    #[tokio::test]
    async fn staged_write_commits_outside_the_session_lock() {
        let sessions = sessions();
        let month = MonthKey::parse("2024-04").unwrap();
        let monday = chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();

        let grid = sessions.grid_for(1).await;
        let staged = {
            let mut guard = grid.lock().await;
            let person = guard
                .create_person(&NewPerson {
                    full_name: "Ana Soto".into(),
                    document_number: "100".into(),
                })
                .await
                .unwrap();
            guard.load_month(month).await.unwrap();
            guard.stage_cell_interaction(person.id, monday).unwrap()
        };

        // The write is still owed, yet the session is free for the next click.
        assert!(staged.is_pending());
        assert!(grid.try_lock().is_ok());

        let outcome = staged.commit().await;
        assert_eq!(outcome.write, asistencia_core::grid::WriteResult::Persisted);
    }
}
