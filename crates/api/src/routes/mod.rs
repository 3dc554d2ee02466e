pub mod categories;
pub mod health;
pub mod uploads;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                      list (?parent=<id|root>), create
/// /categories/form                 empty add form
/// /categories/{id}                 get row, update, delete
/// /categories/{id}/form            edit form
/// /categories/{id}/ancestors       breadcrumb rows
///
/// /uploads                         stage an image (multipart)
/// ```
pub fn api_routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/uploads", uploads::router(max_upload_bytes))
}
