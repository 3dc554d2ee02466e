use axum::routing::get;
use axum::Router;

use crate::handlers::categories;
use crate::state::AppState;

/// Category grid routes mounted at `/categories`.
///
/// ```text
/// GET    /                 -> list
/// POST   /                 -> create
/// GET    /form             -> new_form
/// GET    /{id}             -> get_row
/// PUT    /{id}             -> update
/// DELETE /{id}             -> delete
/// GET    /{id}/form        -> edit_form
/// GET    /{id}/ancestors   -> ancestors
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(categories::list).post(categories::create))
        .route("/form", get(categories::new_form))
        .route(
            "/{id}",
            get(categories::get_row)
                .put(categories::update)
                .delete(categories::delete),
        )
        .route("/{id}/form", get(categories::edit_form))
        .route("/{id}/ancestors", get(categories::ancestors))
}
