use sqlx::{PgPool, Postgres, Transaction};

#[derive(sqlx::FromRow, serde::Serialize)]
pub struct StockFile {
    pub id: String,
    pub title: String,
    #[serde(skip)]
    pub file_name: String,
    pub original_name: String,
    pub size_bytes: i64,
    pub content_type: String,
    pub active: bool,
    pub created_at: i64,
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    id: &str,
    title: &str,
    file_name: &str,
    original_name: &str,
    size_bytes: i64,
    content_type: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO stock_files
            (id, title, file_name, original_name, size_bytes, content_type, active, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, FALSE, $7)",
    )
    .bind(id)
    .bind(title)
    .bind(file_name)
    .bind(original_name)
    .bind(size_bytes)
    .bind(content_type)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list(pool: &PgPool) -> Result<Vec<StockFile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM stock_files ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<StockFile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM stock_files WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// The single file served to partners, if one has been activated.
pub async fn find_active(pool: &PgPool) -> Result<Option<StockFile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM stock_files WHERE active = TRUE")
        .fetch_optional(pool)
        .await
}

/// Activate one file and deactivate all others, atomically. Returns
/// false when `id` does not exist (nothing is changed in that case
/// because the caller rolls the transaction back).
pub async fn activate(tx: &mut Transaction<'_, Postgres>, id: &str) -> Result<bool, sqlx::Error> {
    sqlx::query("UPDATE stock_files SET active = FALSE WHERE active = TRUE")
        .execute(&mut **tx)
        .await?;
    let result = sqlx::query("UPDATE stock_files SET active = TRUE WHERE id = $1")
        .bind(id)
        .execute(&mut **tx)
        .await?;
    Ok(result.rows_affected() > 0)
}
