use sqlx::{PgConnection, PgPool};

#[derive(sqlx::FromRow)]
#[allow(dead_code)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub hashed_password: String,
    pub role: String,
    pub status: String,
    pub email_verified_at: Option<i64>,
    pub created_at: i64,
}

/// Insert a new user inside the caller's transaction.
pub async fn create(
    conn: &mut PgConnection,
    id: &str,
    name: &str,
    email: &str,
    hashed_password: &str,
    role: &str,
    status: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, name, email, hashed_password, role, status, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(hashed_password)
    .bind(role)
    .bind(status)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn set_status(pool: &PgPool, user_id: &str, status: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Mark the email as verified and move the account to the given status.
pub async fn set_verified(
    pool: &PgPool,
    user_id: &str,
    status: &str,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE users SET status = $1, email_verified_at = $2 WHERE id = $3")
        .bind(status)
        .bind(now)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Seed the bootstrap admin account. Returns true when a row was
/// actually inserted (first run), false when the email already exists.
pub async fn ensure_admin(
    pool: &PgPool,
    email: &str,
    hashed_password: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (id, name, email, hashed_password, role, status, email_verified_at, created_at)
         VALUES ($1, 'Administrator', $2, $3, 'admin', 'active', $4, $4)
         ON CONFLICT (email) DO NOTHING",
    )
    .bind(uuid::Uuid::new_v4().to_string())
    .bind(email)
    .bind(hashed_password)
    .bind(crate::util::now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
