pub mod health;

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /stories                       submit (POST), list (GET)
/// /stories/{id}                  poll one job (GET)
/// /stories/{id}/animate          trigger stage-2 animation (POST)
///
/// /uploads                       upload seed image (POST, multipart)
/// /uploads/{id}                  delete seed image (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/stories",
            post(handlers::stories::submit_story).get(handlers::stories::list_stories),
        )
        .route("/stories/{id}", get(handlers::stories::get_story))
        .route(
            "/stories/{id}/animate",
            post(handlers::stories::animate_story),
        )
        .route("/uploads", post(handlers::uploads::upload_image))
        .route("/uploads/{id}", delete(handlers::uploads::delete_upload))
}
