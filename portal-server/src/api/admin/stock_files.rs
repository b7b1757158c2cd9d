//! Stock file administration
//!
//! POST /api/admin/stock-files               — upload a new stock file
//! GET  /api/admin/stock-files               — list uploaded files
//! PUT  /api/admin/stock-files/{id}/activate — make one file the active download

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
};
use axum::http::StatusCode;
use shared::error::{AppError, ErrorCode};

use crate::auth::Identity;
use crate::db::{self, stock_files::StockFile};
use crate::state::AppState;
use crate::storage::DocumentStore;
use crate::util::now_millis;

use crate::api::ApiResult;

/// Maximum stock file size (20MB)
const MAX_STOCK_FILE_SIZE: usize = 20 * 1024 * 1024;

/// Accepted stock file extensions
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "csv", "xls", "xlsx", "zip"];

/// POST /api/admin/stock-files
pub async fn upload_stock_file(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StockFile>), AppError> {
    let mut title: Option<String> = None;
    let mut file_bytes: Option<Vec<u8>> = None;
    let mut original_name = String::new();
    let mut content_type = "application/octet-stream".to_string();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name() {
            Some("title") => title = Some(field.text().await.map_err(multipart_error)?),
            Some("file") => {
                original_name = field.file_name().unwrap_or_default().to_string();
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                file_bytes = Some(field.bytes().await.map_err(multipart_error)?.to_vec());
            }
            _ => {}
        }
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::validation("Title is required"))?;

    let bytes = file_bytes
        .filter(|b| !b.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::DocumentMissing))?;

    if bytes.len() > MAX_STOCK_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::DocumentTooLarge,
            format!("File too large: {} bytes (max {MAX_STOCK_FILE_SIZE})", bytes.len()),
        ));
    }

    let ext = std::path::Path::new(&original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::DocumentTypeUnsupported,
            format!("Unsupported file type: {ext}. Supported: pdf, csv, xls, xlsx, zip"),
        ));
    }

    let id = uuid::Uuid::new_v4().to_string();
    let file_name = DocumentStore::generated_name(&id, &original_name);
    let stored = state.documents.store(&file_name, &bytes).await.map_err(|e| {
        tracing::error!(error = %e, "Stock file write failed");
        AppError::new(ErrorCode::StorageError)
    })?;

    let now = now_millis();
    if let Err(e) = db::stock_files::create(
        &state.pool,
        &id,
        &title,
        &stored.file_name,
        &original_name,
        stored.size as i64,
        &content_type,
        now,
    )
    .await
    {
        // Keep DB and disk consistent when the insert fails
        if let Err(remove_err) = state.documents.remove(&stored.file_name).await {
            tracing::warn!(file = %stored.file_name, error = %remove_err, "Orphaned stock file cleanup failed");
        }
        return Err(db_error(e));
    }

    if let Err(e) = db::audit::log(
        &state.pool,
        &admin.user_id,
        "stock_file.uploaded",
        Some(&serde_json::json!({ "stock_file_id": id, "title": title })),
        now,
    )
    .await
    {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    tracing::info!(admin_id = %admin.user_id, stock_file_id = %id, "Stock file uploaded");

    let file = db::stock_files::find_by_id(&state.pool, &id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;

    Ok((StatusCode::CREATED, Json(file)))
}

/// GET /api/admin/stock-files
pub async fn list_stock_files(State(state): State<AppState>) -> ApiResult<Vec<StockFile>> {
    let files = db::stock_files::list(&state.pool).await.map_err(db_error)?;
    Ok(Json(files))
}

/// PUT /api/admin/stock-files/{id}/activate
pub async fn activate_stock_file(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    Path(id): Path<String>,
) -> ApiResult<StockFile> {
    let mut tx = state.pool.begin().await.map_err(db_error)?;

    let activated = db::stock_files::activate(&mut tx, &id).await.map_err(db_error)?;
    if !activated {
        if let Err(e) = tx.rollback().await {
            tracing::warn!(error = %e, "Transaction rollback failed");
        }
        return Err(AppError::new(ErrorCode::StockFileNotFound));
    }

    tx.commit().await.map_err(db_error)?;

    let now = now_millis();
    if let Err(e) = db::audit::log(
        &state.pool,
        &admin.user_id,
        "stock_file.activated",
        Some(&serde_json::json!({ "stock_file_id": id })),
        now,
    )
    .await
    {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    tracing::info!(admin_id = %admin.user_id, stock_file_id = %id, "Stock file activated");

    let file = db::stock_files::find_by_id(&state.pool, &id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::StockFileNotFound))?;

    Ok(Json(file))
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}

fn db_error(e: sqlx::Error) -> AppError {
    tracing::error!("DB error: {e}");
    AppError::new(ErrorCode::InternalError)
}
