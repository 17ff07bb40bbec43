//! Handlers for people administration.
//!
//! Listing reads the repository directly. Mutations go through the caller's
//! session grid so its loaded view stays in step.

use asistencia_core::people::NewPerson;
use asistencia_core::types::DbId;
use asistencia_db::repositories::PersonRepo;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequirePeopleAdmin;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetActiveInput {
    pub active: bool,
}

/// GET /people?include_inactive=
pub async fn list_people(
    _auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let people = PersonRepo::list(&state.pool, params.include_inactive).await?;
    Ok(Json(DataResponse { data: people }))
}

/// POST /people
pub async fn create_person(
    RequirePeopleAdmin(admin): RequirePeopleAdmin,
    State(state): State<AppState>,
    Json(input): Json<NewPerson>,
) -> AppResult<impl IntoResponse> {
    let grid = state.sessions.grid_for(admin.user_id).await;
    let person = grid.lock().await.create_person(&input).await?;

    tracing::info!(user_id = admin.user_id, person_id = person.id, "Person registered");

    Ok((StatusCode::CREATED, Json(DataResponse { data: person })))
}

/// PATCH /people/{id}/active
pub async fn set_person_active(
    RequirePeopleAdmin(admin): RequirePeopleAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetActiveInput>,
) -> AppResult<impl IntoResponse> {
    let grid = state.sessions.grid_for(admin.user_id).await;
    let person = grid
        .lock()
        .await
        .set_person_active(id, input.active)
        .await?;

    tracing::info!(
        user_id = admin.user_id,
        person_id = id,
        active = input.active,
        "Person activation updated"
    );

    Ok(Json(DataResponse { data: person }))
}

/// DELETE /people/{id}
///
/// Removes the person with all attendance and notes.
pub async fn delete_person(
    RequirePeopleAdmin(admin): RequirePeopleAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let grid = state.sessions.grid_for(admin.user_id).await;
    grid.lock().await.delete_person(id).await?;
    state.sessions.forget_person(id, admin.user_id).await;

    tracing::info!(user_id = admin.user_id, person_id = id, "Person deleted");

    Ok(StatusCode::NO_CONTENT)
}
