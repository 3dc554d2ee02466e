//! Handlers for the category grid.
//!
//! Every endpoint requires a category-managing role; the tenant comes from
//! the caller's token, never from the request path.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use pressgrid_core::types::DbId;
use pressgrid_grid::{CategoryPayload, DataChanged, RowForm, RowView, SubmitOutcome};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::locale::ActiveLocale;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for listing rows.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Parent category id, or `root` (the default) for top-level rows.
    pub parent: Option<String>,
}

fn parse_parent(raw: Option<&str>) -> AppResult<Option<DbId>> {
    match raw.map(str::trim) {
        None | Some("") | Some("root") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(|_| {
            AppError::BadRequest(format!(
                "Invalid parent '{value}'. Expected a category id or 'root'"
            ))
        }),
    }
}

fn into_changed(outcome: SubmitOutcome) -> AppResult<DataChanged> {
    match outcome {
        SubmitOutcome::Changed(changed) => Ok(changed),
        SubmitOutcome::Invalid(form) => Err(AppError::InvalidForm(Box::new(form))),
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// GET /api/v1/categories?parent=<id|root>
pub async fn list(
    RequireManager(ctx): RequireManager,
    locale: ActiveLocale,
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<RowView>>>> {
    let renderer = locale.renderer(&state);
    let rows = match parse_parent(params.parent.as_deref())? {
        None => state.grid.list_roots(&ctx, &renderer).await?,
        Some(parent_id) => state.grid.list_children(&ctx, parent_id, &renderer).await?,
    };
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/categories/{id}
pub async fn get_row(
    RequireManager(ctx): RequireManager,
    locale: ActiveLocale,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RowView>>> {
    let row = state
        .grid
        .fetch_row(&ctx, id, &locale.renderer(&state))
        .await?;
    Ok(Json(DataResponse { data: row }))
}

/// GET /api/v1/categories/{id}/ancestors
///
/// Breadcrumb rows from the root down to the category's parent.
pub async fn ancestors(
    RequireManager(ctx): RequireManager,
    locale: ActiveLocale,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RowView>>>> {
    let rows = state
        .grid
        .ancestors(&ctx, id, &locale.renderer(&state))
        .await?;
    Ok(Json(DataResponse { data: rows }))
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// GET /api/v1/categories/form
pub async fn new_form(
    RequireManager(ctx): RequireManager,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<RowForm>>> {
    let form = state.grid.fetch_row_form(&ctx, None).await?;
    Ok(Json(DataResponse { data: form }))
}

/// GET /api/v1/categories/{id}/form
pub async fn edit_form(
    RequireManager(ctx): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RowForm>>> {
    let form = state.grid.fetch_row_form(&ctx, Some(id)).await?;
    Ok(Json(DataResponse { data: form }))
}

// ---------------------------------------------------------------------------
// Mutations
// ---------------------------------------------------------------------------

/// POST /api/v1/categories
///
/// Returns 201 with the data-changed signal, or 400 with the annotated form.
pub async fn create(
    RequireManager(ctx): RequireManager,
    State(state): State<AppState>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<(StatusCode, Json<DataResponse<DataChanged>>)> {
    let changed = into_changed(state.grid.submit(&ctx, payload, None).await?)?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: changed })))
}

/// PUT /api/v1/categories/{id}
pub async fn update(
    RequireManager(ctx): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(payload): Json<CategoryPayload>,
) -> AppResult<Json<DataResponse<DataChanged>>> {
    let changed = into_changed(state.grid.submit(&ctx, payload, Some(id)).await?)?;
    Ok(Json(DataResponse { data: changed }))
}

/// DELETE /api/v1/categories/{id}
///
/// Returns the data-changed signal keyed by the former parent. 409 when the
/// delete policy rejects a category that still has children.
pub async fn delete(
    RequireManager(ctx): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DataChanged>>> {
    let changed = state.grid.remove(&ctx, id).await?;
    Ok(Json(DataResponse { data: changed }))
}
