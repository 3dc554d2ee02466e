//! Image uploads staged for a later category save.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::Json;
use pressgrid_grid::UploadReceipt;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/uploads
///
/// Accepts multipart form data with a `file` field. Returns 201 with the
/// temporary file id to reference as `image_id` when saving a category.
pub async fn upload(
    RequireManager(ctx): RequireManager,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadReceipt>>)> {
    let mut file_data: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        file_data = Some((filename, data.to_vec()));
    }

    let (filename, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let receipt = state.grid.upload_asset(&ctx, &data, &filename).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: receipt })))
}
