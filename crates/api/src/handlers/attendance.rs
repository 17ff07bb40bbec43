//! Handlers for the monthly attendance grid.
//!
//! Every handler works on the caller's session grid. If the month in the path
//! is not the one the session has loaded, it is loaded first.
//!
//! Cell and note edits are staged under the session lock and committed to the
//! store after it is released, so a slow write never stalls the rest of the
//! session's grid.

use asistencia_core::month::{parse_date_in_month, MonthKey};
use asistencia_core::types::DbId;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::session::SessionGrid;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CellInput {
    pub person_id: DbId,
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct NoteInput {
    pub person_id: DbId,
    pub date: String,
    /// Blank text clears the note.
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct NoteBody {
    pub person_id: DbId,
    pub date: NaiveDate,
    pub note: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load `month` into `grid` unless it is already the loaded month.
async fn ensure_month(grid: &mut SessionGrid, month: MonthKey) -> AppResult<()> {
    if grid.month() != Some(month) {
        grid.load_month(month).await?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /attendance/{month}
///
/// Reload the month from the store and return the full view.
pub async fn get_month(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> AppResult<impl IntoResponse> {
    let month = MonthKey::parse(&month)?;
    let grid = state.sessions.grid_for(auth.user_id).await;
    let mut grid = grid.lock().await;

    let view = grid.load_month(month).await?;
    tracing::debug!(user_id = auth.user_id, %month, people = view.people.len(), "Month view served");

    Ok(Json(DataResponse { data: view }))
}

/// POST /attendance/{month}/cells
///
/// Advance one cell around the status ring.
pub async fn cycle_cell(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(month): Path<String>,
    Json(input): Json<CellInput>,
) -> AppResult<impl IntoResponse> {
    let month = MonthKey::parse(&month)?;
    let date = parse_date_in_month(&input.date, month)?;
    let grid = state.sessions.grid_for(auth.user_id).await;
    let staged = {
        let mut grid = grid.lock().await;
        ensure_month(&mut grid, month).await?;
        grid.stage_cell_interaction(input.person_id, date)?
    };

    let outcome = staged.commit().await;
    tracing::info!(
        user_id = auth.user_id,
        person_id = input.person_id,
        %date,
        value = outcome.value.as_str(),
        write = ?outcome.write,
        "Attendance cell cycled"
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// POST /attendance/{month}/weekend-exceptions/{date}
///
/// Lock or unlock one weekend date for this session.
pub async fn toggle_weekend_exception(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((month, date)): Path<(String, String)>,
) -> AppResult<impl IntoResponse> {
    let month = MonthKey::parse(&month)?;
    let date = parse_date_in_month(&date, month)?;
    let grid = state.sessions.grid_for(auth.user_id).await;
    let mut grid = grid.lock().await;
    ensure_month(&mut grid, month).await?;

    let outcome = grid.toggle_weekend_exception(date)?;
    tracing::info!(
        user_id = auth.user_id,
        %date,
        unlocked = outcome.unlocked,
        "Weekend exception toggled"
    );

    Ok(Json(DataResponse { data: outcome }))
}

/// GET /attendance/{month}/notes/{person_id}/{date}
pub async fn get_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((month, person_id, date)): Path<(String, DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let month = MonthKey::parse(&month)?;
    let date = parse_date_in_month(&date, month)?;
    let grid = state.sessions.grid_for(auth.user_id).await;
    let mut grid = grid.lock().await;
    ensure_month(&mut grid, month).await?;

    let note = grid.note(person_id, date)?.map(str::to_string);

    Ok(Json(DataResponse {
        data: NoteBody {
            person_id,
            date,
            note,
        },
    }))
}

/// PUT /attendance/{month}/notes
///
/// Set or clear one cell's note.
pub async fn put_note(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(month): Path<String>,
    Json(input): Json<NoteInput>,
) -> AppResult<impl IntoResponse> {
    let month = MonthKey::parse(&month)?;
    let date = parse_date_in_month(&input.date, month)?;
    let grid = state.sessions.grid_for(auth.user_id).await;
    let staged = {
        let mut grid = grid.lock().await;
        ensure_month(&mut grid, month).await?;
        grid.stage_note(input.person_id, date, &input.text)?
    };

    let outcome = staged.commit().await;
    tracing::info!(
        user_id = auth.user_id,
        person_id = input.person_id,
        %date,
        cleared = outcome.note.is_none(),
        "Attendance note updated"
    );

    Ok(Json(DataResponse { data: outcome }))
}
