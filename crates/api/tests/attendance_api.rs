//! HTTP-level integration tests for the attendance grid endpoints.
//!
//! April 2024 is used throughout: 30 days, 22 weekdays, and 2024-04-06 is a
//! Saturday.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_person, get_auth, post_auth, post_json_auth, put_json_auth,
    supervisor_token, token, OTHER_SUPERVISOR_ID,
};
use serde_json::json;
use sqlx::PgPool;

const MONTH_URI: &str = "/api/v1/attendance/2024-04";

// ---------------------------------------------------------------------------
// Month view
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_month_requires_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, MONTH_URI).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_month_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/attendance/2024-13", &supervisor_token()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_month_view_shape(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;

    let response = get_auth(app, MONTH_URI, &supervisor_token()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["month"], "2024-04");
    assert_eq!(data["calendar_days"].as_array().unwrap().len(), 30);
    assert_eq!(data["calendar_days"][5]["iso_date"], "2024-04-06");
    assert_eq!(data["calendar_days"][5]["is_weekend"], true);
    assert_eq!(data["people"][0]["full_name"], "Ana Soto");

    let key = id.to_string();
    assert_eq!(data["totals"][&key]["laborables"], 22);
    assert_eq!(data["totals"][&key]["asistencia"], 0.0);
    assert_eq!(data["cells"][&key][0], "unset");
    assert_eq!(data["cells"][&key][5], "not_applicable");
}

// ---------------------------------------------------------------------------
// Cell interaction
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cycle_cell_persists(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;
    let uri = format!("{MONTH_URI}/cells");

    let response = post_json_auth(
        app.clone(),
        &uri,
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["value"], "present");
    assert_eq!(data["write"], "persisted");
    assert_eq!(data["totals"]["presentes"], 1);

    let response = post_json_auth(
        app.clone(),
        &uri,
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-01"}),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["value"], "absent");
    assert_eq!(data["totals"]["ausencia"], 1);

    // A different session sees the stored value.
    let other = token(OTHER_SUPERVISOR_ID, "supervisor");
    let response = get_auth(app, MONTH_URI, &other).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["day_maps"][id.to_string()]["2024-04-01"], "absent");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_locked_weekend_cell_is_skipped(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;

    let response = post_json_auth(
        app,
        &format!("{MONTH_URI}/cells"),
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-06"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["value"], "not_applicable");
    assert_eq!(data["write"], "skipped");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cell_outside_month_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;

    let response = post_json_auth(
        app,
        &format!("{MONTH_URI}/cells"),
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-05-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_cell_for_unknown_person_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        &format!("{MONTH_URI}/cells"),
        &supervisor_token(),
        json!({"person_id": 999_999, "date": "2024-04-01"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Weekend exceptions
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weekend_exception_is_session_local(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;
    let key = id.to_string();

    let response = post_auth(
        app.clone(),
        &format!("{MONTH_URI}/weekend-exceptions/2024-04-06"),
        &supervisor_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["unlocked"], true);
    assert_eq!(data["totals"][&key]["laborables"], 23);

    let response = post_json_auth(
        app.clone(),
        &format!("{MONTH_URI}/cells"),
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-06"}),
    )
    .await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["value"], "present");
    assert_eq!(data["totals"]["presentes"], 1);

    // The same session keeps the exception across a reload.
    let response = get_auth(app.clone(), MONTH_URI, &supervisor_token()).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["unlocked_dates"], json!(["2024-04-06"]));
    assert_eq!(data["cells"][&key][5], "present");

    // Another session sees the day locked and uncounted.
    let other = token(OTHER_SUPERVISOR_ID, "supervisor");
    let response = get_auth(app, MONTH_URI, &other).await;
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["cells"][&key][5], "not_applicable");
    assert_eq!(data["totals"][&key]["laborables"], 22);
    assert_eq!(data["totals"][&key]["presentes"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_weekday_exception_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_auth(
        app,
        &format!("{MONTH_URI}/weekend-exceptions/2024-04-01"),
        &supervisor_token(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Notes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_note_set_read_and_clear(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;
    let notes_uri = format!("{MONTH_URI}/notes");
    let note_uri = format!("{MONTH_URI}/notes/{id}/2024-04-03");

    let response = put_json_auth(
        app.clone(),
        &notes_uri,
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-03", "text": "  dentist  "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["note"], "dentist");
    assert_eq!(data["write"], "persisted");

    let response = get_auth(app.clone(), &note_uri, &supervisor_token()).await;
    assert_eq!(body_json(response).await["data"]["note"], "dentist");

    let response = put_json_auth(
        app.clone(),
        &notes_uri,
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-03", "text": "   "}),
    )
    .await;
    assert!(body_json(response).await["data"]["note"].is_null());

    // A fresh session reads the cleared state from the store.
    let other = token(OTHER_SUPERVISOR_ID, "supervisor");
    let response = get_auth(app, &note_uri, &other).await;
    assert!(body_json(response).await["data"]["note"].is_null());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_oversized_note_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = create_person(&app, "Ana Soto", "100").await;

    let response = put_json_auth(
        app,
        &format!("{MONTH_URI}/notes"),
        &supervisor_token(),
        json!({"person_id": id, "date": "2024-04-03", "text": "x".repeat(2_001)}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
