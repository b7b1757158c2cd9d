use sqlx::{PgConnection, PgPool};

/// Insert a new partner profile inside the caller's transaction.
pub async fn create(
    conn: &mut PgConnection,
    user_id: &str,
    company_name: &str,
    phone_number: &str,
    document_path: &str,
    business_model: Option<&str>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO partner_profiles
            (user_id, company_name, phone_number, document_path, business_model, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user_id)
    .bind(company_name)
    .bind(phone_number)
    .bind(document_path)
    .bind(business_model)
    .bind(now)
    .execute(conn)
    .await?;
    Ok(())
}

/// Partial profile update. `None` fields keep their current value.
pub async fn update(
    pool: &PgPool,
    user_id: &str,
    company_name: Option<&str>,
    phone_number: Option<&str>,
    business_model: Option<&str>,
    discount_percent: Option<f64>,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE partner_profiles SET
            company_name = COALESCE($2, company_name),
            phone_number = COALESCE($3, phone_number),
            business_model = COALESCE($4, business_model),
            discount_percent = COALESCE($5, discount_percent)
         WHERE user_id = $1",
    )
    .bind(user_id)
    .bind(company_name)
    .bind(phone_number)
    .bind(business_model)
    .bind(discount_percent)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// One joined row of the admin partner listing
#[derive(sqlx::FromRow)]
pub struct PartnerRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: String,
    pub company_name: String,
    pub phone_number: String,
    pub business_model: Option<String>,
    pub discount_percent: Option<f64>,
    pub created_at: i64,
}

/// List partner accounts with optional role/status filters and a free
/// text search over name, email and company name.
pub async fn list(
    pool: &PgPool,
    role: Option<&str>,
    status: Option<&str>,
    search: Option<&str>,
    limit: i64,
    offset: i64,
) -> Result<Vec<PartnerRow>, sqlx::Error> {
    let pattern = search.map(|s| format!("%{s}%"));
    sqlx::query_as(
        "SELECT u.id, u.name, u.email, u.role, u.status,
                p.company_name, p.phone_number, p.business_model, p.discount_percent,
                u.created_at
         FROM users u
         JOIN partner_profiles p ON p.user_id = u.id
         WHERE ($1::text IS NULL OR u.role = $1)
           AND ($2::text IS NULL OR u.status = $2)
           AND ($3::text IS NULL OR u.name ILIKE $3 OR u.email ILIKE $3 OR p.company_name ILIKE $3)
         ORDER BY u.created_at DESC
         LIMIT $4 OFFSET $5",
    )
    .bind(role)
    .bind(status)
    .bind(pattern.as_deref())
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

/// Total row count for the same filters as [`list`].
pub async fn count(
    pool: &PgPool,
    role: Option<&str>,
    status: Option<&str>,
    search: Option<&str>,
) -> Result<i64, sqlx::Error> {
    let pattern = search.map(|s| format!("%{s}%"));
    let (total,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*)
         FROM users u
         JOIN partner_profiles p ON p.user_id = u.id
         WHERE ($1::text IS NULL OR u.role = $1)
           AND ($2::text IS NULL OR u.status = $2)
           AND ($3::text IS NULL OR u.name ILIKE $3 OR u.email ILIKE $3 OR p.company_name ILIKE $3)",
    )
    .bind(role)
    .bind(status)
    .bind(pattern.as_deref())
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Single partner with profile, as shown in the admin listing.
pub async fn find_with_profile(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<PartnerRow>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.id, u.name, u.email, u.role, u.status,
                p.company_name, p.phone_number, p.business_model, p.discount_percent,
                u.created_at
         FROM users u
         JOIN partner_profiles p ON p.user_id = u.id
         WHERE u.id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
