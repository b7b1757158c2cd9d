//! Partner registration service
//!
//! Creates the user, partner profile, licence document and pending
//! verification code as one unit. The database side is a transaction;
//! the document write is compensated by an explicit delete when a later
//! step fails, so a failed registration leaves neither a half-created
//! account nor an orphaned file behind.

use shared::error::{AppError, ErrorCode};
use shared::models::{ProfileSummary, UserSummary};
use shared::{BusinessModel, PartnerStatus, Role};

use crate::error::{ServiceError, ServiceResult};
use crate::notify::Notification;
use crate::state::AppState;
use crate::storage::DocumentStore;
use crate::util::{generate_code, hash_password, now_millis};
use crate::db;

/// Verification codes are valid for 5 minutes
pub const CODE_TTL_MILLIS: i64 = 5 * 60 * 1000;

/// Validated registration input
pub struct NewPartner {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub company_name: String,
    pub phone_number: String,
    pub business_model: Option<BusinessModel>,
}

/// Licence document extracted from the multipart body
pub struct UploadedDocument {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

pub struct RegisteredPartner {
    pub user: UserSummary,
    pub profile: ProfileSummary,
}

/// Register a new partner account.
///
/// Step order matters: the user row is inserted first so the document
/// is named after a real ID, the document lands on disk before the
/// profile row references its path, and the commit comes last. Any
/// failure after the document write removes the file again.
pub async fn register_partner(
    state: &AppState,
    input: NewPartner,
    document: UploadedDocument,
) -> ServiceResult<RegisteredPartner> {
    let now = now_millis();

    // Fast pre-check. The unique constraint on users.email still backs
    // this up against concurrent registrations.
    if db::users::find_by_email(&state.pool, &input.email)
        .await?
        .is_some()
    {
        return Err(email_taken().into());
    }

    let hashed_password = hash_password(&input.password)
        .map_err(|e| ServiceError::Db(format!("Password hash error: {e}").into()))?;

    let code = generate_code();
    let code_hash = hash_password(&code)
        .map_err(|e| ServiceError::Db(format!("Code hash error: {e}").into()))?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let status = PartnerStatus::PendingEmailValidation;

    let mut tx = state.pool.begin().await?;

    if let Err(e) = db::users::create(
        &mut tx,
        &user_id,
        &input.name,
        &input.email,
        &hashed_password,
        input.role.as_db(),
        status.as_db(),
        now,
    )
    .await
    {
        rollback_quiet(tx).await;
        return Err(map_unique(e));
    }

    let file_name = DocumentStore::generated_name(&user_id, &document.original_name);
    let stored = match state.documents.store(&file_name, &document.bytes).await {
        Ok(stored) => stored,
        Err(e) => {
            rollback_quiet(tx).await;
            tracing::error!(error = %e, "Licence document write failed");
            return Err(AppError::new(ErrorCode::StorageError).into());
        }
    };

    if let Err(e) = db::partner_profiles::create(
        &mut tx,
        &user_id,
        &input.company_name,
        &input.phone_number,
        &stored.file_name,
        input.business_model.map(|m| m.as_db()),
        now,
    )
    .await
    {
        rollback_quiet(tx).await;
        remove_quiet(&state.documents, &stored.file_name).await;
        return Err(e.into());
    }

    if let Err(e) = db::email_verifications::upsert(
        &mut tx,
        &input.email,
        &code_hash,
        now + CODE_TTL_MILLIS,
        now,
    )
    .await
    {
        rollback_quiet(tx).await;
        remove_quiet(&state.documents, &stored.file_name).await;
        return Err(e.into());
    }

    state.notifier.dispatch(Notification::VerifyEmail {
        to: input.email.clone(),
        name: input.name.clone(),
        code,
    });

    if let Err(e) = tx.commit().await {
        remove_quiet(&state.documents, &stored.file_name).await;
        return Err(map_unique(e));
    }

    if let Err(e) = db::audit::log(
        &state.pool,
        &user_id,
        "partner.registered",
        Some(&serde_json::json!({ "role": input.role.as_db() })),
        now,
    )
    .await
    {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    tracing::info!(user_id = %user_id, email = %input.email, role = %input.role.as_db(), "Partner registered, verification code sent");

    Ok(RegisteredPartner {
        user: UserSummary {
            id: user_id,
            name: input.name,
            email: input.email,
            role: input.role,
            status,
        },
        profile: ProfileSummary {
            company_name: input.company_name,
            phone_number: input.phone_number,
            business_model: input.business_model,
            discount_percent: None,
        },
    })
}

fn email_taken() -> AppError {
    AppError::with_message(
        ErrorCode::EmailAlreadyRegistered,
        "This email address is already registered",
    )
}

/// Map a unique-constraint violation on users.email to the business
/// error, everything else stays an infrastructure error.
fn map_unique(e: sqlx::Error) -> ServiceError {
    if matches!(&e, sqlx::Error::Database(db) if db.is_unique_violation()) {
        email_taken().into()
    } else {
        e.into()
    }
}

async fn rollback_quiet(tx: sqlx::Transaction<'_, sqlx::Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(error = %e, "Transaction rollback failed");
    }
}

async fn remove_quiet(documents: &DocumentStore, file_name: &str) {
    if let Err(e) = documents.remove(file_name).await {
        tracing::warn!(file = file_name, error = %e, "Orphaned document cleanup failed");
    }
}
