use std::sync::Arc;

use crate::config::ServerConfig;
use crate::session::GridSessions;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool, used directly for read-only listings.
    pub pool: asistencia_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// One attendance grid per authenticated caller.
    pub sessions: Arc<GridSessions>,
}

impl AppState {
    /// Build state with a Postgres-backed session registry over `pool`.
    pub fn new(pool: asistencia_db::DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(asistencia_db::PgAttendanceStore::new(pool.clone()));
        Self {
            pool,
            config: Arc::new(config),
            sessions: Arc::new(GridSessions::new(store)),
        }
    }
}
