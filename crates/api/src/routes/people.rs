//! Route definitions for people administration.
//!
//! Mounted at `/people` by `api_routes()`.

use axum::routing::{delete, get, patch};
use axum::Router;

use crate::handlers::people;
use crate::state::AppState;

/// People routes.
///
/// ```text
/// GET    /                   -> list_people (?include_inactive)
/// POST   /                   -> create_person (admin)
/// PATCH  /{id}/active        -> set_person_active (admin)
/// DELETE /{id}               -> delete_person (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(people::list_people).post(people::create_person))
        .route("/{id}/active", patch(people::set_person_active))
        .route("/{id}", delete(people::delete_person))
}
