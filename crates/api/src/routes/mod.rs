pub mod attendance;
pub mod health;
pub mod people;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree. Every route requires a Bearer token.
///
/// ```text
/// /attendance/{month}                               month view (GET)
/// /attendance/{month}/cells                         cycle a cell (POST)
/// /attendance/{month}/weekend-exceptions/{date}     toggle exception (POST)
/// /attendance/{month}/notes/{person_id}/{date}      read note (GET)
/// /attendance/{month}/notes                         set/clear note (PUT)
///
/// /people                                           list, create (create: admin)
/// /people/{id}/active                               (de)activate (admin)
/// /people/{id}                                      delete (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/attendance", attendance::router())
        .nest("/people", people::router())
}
