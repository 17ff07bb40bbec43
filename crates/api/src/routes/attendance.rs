//! Route definitions for the attendance grid.
//!
//! Mounted at `/attendance` by `api_routes()`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Attendance routes. `{month}` is `YYYY-MM`, `{date}` is `YYYY-MM-DD`.
///
/// ```text
/// GET    /{month}                                  -> get_month
/// POST   /{month}/cells                            -> cycle_cell
/// POST   /{month}/weekend-exceptions/{date}        -> toggle_weekend_exception
/// GET    /{month}/notes/{person_id}/{date}         -> get_note
/// PUT    /{month}/notes                            -> put_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{month}", get(attendance::get_month))
        .route("/{month}/cells", post(attendance::cycle_cell))
        .route(
            "/{month}/weekend-exceptions/{date}",
            post(attendance::toggle_weekend_exception),
        )
        .route(
            "/{month}/notes/{person_id}/{date}",
            get(attendance::get_note),
        )
        .route("/{month}/notes", put(attendance::put_note))
}
