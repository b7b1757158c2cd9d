//! Stock file download for approved partners
//!
//! GET /api/partner/stock-files/download — stream the active stock file

use axum::{
    Extension,
    body::Body,
    extract::State,
    http::header,
    response::Response,
};
use shared::error::{AppError, ErrorCode};
use tokio_util::io::ReaderStream;

use crate::auth::Identity;
use crate::db;
use crate::state::AppState;
use crate::util::now_millis;

/// GET /api/partner/stock-files/download
pub async fn download_stock_file(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, AppError> {
    let file = db::stock_files::find_active(&state.pool)
        .await
        .map_err(|e| {
            tracing::error!("DB error loading active stock file: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(|| AppError::new(ErrorCode::NoActiveStockFile))?;

    let (handle, size) = state.documents.open(&file.file_name).await.map_err(|e| {
        tracing::error!(
            stock_file_id = %file.id,
            file = %file.file_name,
            error = %e,
            "Active stock file missing on disk"
        );
        AppError::new(ErrorCode::StockFileNotFound)
    })?;

    let now = now_millis();
    if let Err(e) = db::audit::log(
        &state.pool,
        &identity.user_id,
        "stock_file.downloaded",
        Some(&serde_json::json!({ "stock_file_id": file.id })),
        now,
    )
    .await
    {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    tracing::info!(
        user_id = %identity.user_id,
        stock_file_id = %file.id,
        "Stock file download started"
    );

    let disposition = format!("attachment; filename=\"{}\"", file.original_name);

    Response::builder()
        .header(header::CONTENT_TYPE, file.content_type.as_str())
        .header(header::CONTENT_LENGTH, size)
        .header(header::CONTENT_DISPOSITION, disposition)
        .body(Body::from_stream(ReaderStream::new(handle)))
        .map_err(|e| {
            tracing::error!("Response build failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })
}
