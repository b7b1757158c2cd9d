//! Audit log operations

use sqlx::PgPool;

/// Write an audit log entry. Failures are the caller's concern; most
/// call sites log and continue.
pub async fn log(
    pool: &PgPool,
    actor_id: &str,
    action: &str,
    detail: Option<&serde_json::Value>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO audit_logs (actor_id, action, detail, created_at) VALUES ($1, $2, $3, $4)")
        .bind(actor_id)
        .bind(action)
        .bind(detail)
        .bind(now)
        .execute(pool)
        .await?;
    Ok(())
}
