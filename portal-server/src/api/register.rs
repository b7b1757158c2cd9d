//! Registration API handlers
//!
//! POST /api/register     — multipart form + licence document → create partner (pending)
//! POST /api/verify-email — verify code → account moves to pending_approval
//! POST /api/resend-code  — resend verification code

use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::json;
use shared::error::{AppError, ErrorCode};
use shared::models::{ProfileSummary, UserSummary};
use shared::{BusinessModel, PartnerStatus, Role};
use validator::Validate;

use crate::registration::{self, CODE_TTL_MILLIS, NewPartner, UploadedDocument};
use crate::state::AppState;
use crate::util::{generate_code, hash_password, now_millis, verify_password};
use crate::{db, notify};

use super::ApiResult;

/// Maximum licence document size (2MB)
const MAX_DOCUMENT_SIZE: usize = 2 * 1024 * 1024;

/// Accepted licence document extensions
const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// Multipart field name of the licence document
const DOCUMENT_FIELD: &str = "alvara";

// ── Request types ──

#[derive(Debug, Default, Validate)]
struct RegisterForm {
    #[validate(length(min = 1, max = 120, message = "Name is required"))]
    name: String,
    #[validate(email(message = "Invalid email address"))]
    email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    password: String,
    password_confirmation: String,
    #[validate(length(min = 1, max = 160, message = "Company name is required"))]
    company_name: String,
    #[validate(length(min = 5, max = 32, message = "Invalid phone number"))]
    phone_number: String,
    business_model: Option<String>,
    role: Option<String>,
}

#[derive(serde::Serialize)]
pub struct RegisterResponse {
    pub user: UserSummary,
    pub profile: ProfileSummary,
}

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub email: String,
    pub code: String,
}

#[derive(Deserialize)]
pub struct ResendRequest {
    pub email: String,
}

// ── Helpers ──

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
}

/// Convert validator output into one 422 with per-field details.
fn validation_error(errors: validator::ValidationErrors) -> AppError {
    let mut err = AppError::new(ErrorCode::ValidationFailed);
    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {field}"))
            })
            .collect();
        err = err.with_detail(field.to_string(), messages.join(", "));
    }
    err
}

/// Parse the multipart body into the form fields and the licence document.
async fn parse_register_body(
    mut multipart: Multipart,
) -> Result<(RegisterForm, Option<UploadedDocument>), AppError> {
    let mut form = RegisterForm::default();
    let mut document: Option<UploadedDocument> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };

        if name == DOCUMENT_FIELD {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(multipart_error)?.to_vec();
            document = Some(UploadedDocument {
                original_name,
                bytes,
            });
            continue;
        }

        let value = field.text().await.map_err(multipart_error)?;
        match name.as_str() {
            "name" => form.name = value.trim().to_string(),
            "email" => form.email = value.trim().to_lowercase(),
            "password" => form.password = value,
            "password_confirmation" => form.password_confirmation = value,
            "company_name" => form.company_name = value.trim().to_string(),
            "phone_number" => form.phone_number = value.trim().to_string(),
            "business_model" => form.business_model = Some(value),
            "role" => form.role = Some(value),
            // Unknown fields are ignored
            _ => {}
        }
    }

    Ok((form, document))
}

fn check_document(document: &UploadedDocument) -> Result<(), AppError> {
    if document.bytes.is_empty() {
        return Err(AppError::new(ErrorCode::DocumentMissing));
    }
    if document.bytes.len() > MAX_DOCUMENT_SIZE {
        return Err(AppError::with_message(
            ErrorCode::DocumentTooLarge,
            format!(
                "Document too large: {} bytes (max {MAX_DOCUMENT_SIZE})",
                document.bytes.len()
            ),
        ));
    }

    let ext = std::path::Path::new(&document.original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::DocumentTypeUnsupported,
            format!("Unsupported document type: {ext}. Supported: pdf, jpg, jpeg, png"),
        ));
    }
    Ok(())
}

// ── POST /api/register ──

pub async fn register(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let (form, document) = parse_register_body(multipart).await?;

    form.validate().map_err(validation_error)?;

    if form.password != form.password_confirmation {
        return Err(AppError::new(ErrorCode::PasswordMismatch));
    }

    let role = match form.role.as_deref() {
        None | Some("") => Role::Reseller,
        Some(s) => match Role::from_db(s) {
            Some(Role::Admin) | None => {
                return Err(AppError::with_message(
                    ErrorCode::InvalidRole,
                    format!("Invalid partner role: {s}"),
                ));
            }
            Some(role) => role,
        },
    };

    let business_model = match form.business_model.as_deref() {
        None | Some("") => None,
        Some(s) => Some(BusinessModel::from_db(s).ok_or_else(|| {
            AppError::validation(format!("Invalid business model: {s}"))
        })?),
    };

    let document = document.ok_or_else(|| AppError::new(ErrorCode::DocumentMissing))?;
    check_document(&document)?;

    let registered = registration::register_partner(
        &state,
        NewPartner {
            name: form.name,
            email: form.email,
            password: form.password,
            role,
            company_name: form.company_name,
            phone_number: form.phone_number,
            business_model,
        },
        document,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: registered.user,
            profile: registered.profile,
        }),
    ))
}

// ── POST /api/verify-email ──

pub async fn verify_email(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<serde_json::Value> {
    let email = req.email.trim().to_lowercase();
    let now = now_millis();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::PartnerNotFound))?;

    if PartnerStatus::from_db(&user.status) != Some(PartnerStatus::PendingEmailValidation) {
        return Err(AppError::new(ErrorCode::EmailAlreadyVerified));
    }

    let record = db::email_verifications::find(&state.pool, &email)
        .await
        .map_err(db_error)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotFound, "No verification pending for this email")
        })?;

    if now > record.expires_at {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }

    if record.attempts >= 3 {
        return Err(AppError::with_message(
            ErrorCode::TooManyAttempts,
            "Too many attempts, request a new code",
        ));
    }

    let _ = db::email_verifications::increment_attempts(&state.pool, &email).await;

    if !verify_password(&req.code, &record.code) {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }

    db::users::set_verified(&state.pool, &user.id, PartnerStatus::PendingApproval.as_db(), now)
        .await
        .map_err(db_error)?;

    let _ = db::email_verifications::delete(&state.pool, &email).await;

    tracing::info!(user_id = %user.id, email = %email, "Email verified, awaiting approval");

    Ok(Json(json!({
        "message": "Email verified. Your registration is now awaiting approval."
    })))
}

// ── POST /api/resend-code ──

pub async fn resend_code(
    State(state): State<AppState>,
    Json(req): Json<ResendRequest>,
) -> ApiResult<serde_json::Value> {
    let email = req.email.trim().to_lowercase();
    let now = now_millis();

    let user = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::PartnerNotFound))?;

    if PartnerStatus::from_db(&user.status) != Some(PartnerStatus::PendingEmailValidation) {
        return Err(AppError::new(ErrorCode::EmailAlreadyVerified));
    }

    let code = generate_code();
    let code_hash = hash_password(&code).map_err(|e| {
        tracing::error!("Code hash error: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let mut conn = state.pool.acquire().await.map_err(db_error)?;
    db::email_verifications::upsert(&mut conn, &email, &code_hash, now + CODE_TTL_MILLIS, now)
        .await
        .map_err(db_error)?;

    state.notifier.dispatch(notify::Notification::VerifyEmail {
        to: email.clone(),
        name: user.name,
        code,
    });

    tracing::info!(email = %email, "Verification code resent");

    Ok(Json(json!({ "message": "Verification code resent" })))
}

fn db_error(e: sqlx::Error) -> AppError {
    tracing::error!("DB error: {e}");
    AppError::new(ErrorCode::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(name: &str, size: usize) -> UploadedDocument {
        UploadedDocument {
            original_name: name.to_string(),
            bytes: vec![0u8; size],
        }
    }

    #[test]
    fn test_document_extension_allow_list() {
        assert!(check_document(&document("alvara.pdf", 100)).is_ok());
        assert!(check_document(&document("ALVARA.PDF", 100)).is_ok());
        assert!(check_document(&document("scan.jpeg", 100)).is_ok());

        let err = check_document(&document("alvara.docx", 100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentTypeUnsupported);
        let err = check_document(&document("noextension", 100)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentTypeUnsupported);
    }

    #[test]
    fn test_document_size_cap() {
        assert!(check_document(&document("alvara.pdf", MAX_DOCUMENT_SIZE)).is_ok());
        let err = check_document(&document("alvara.pdf", MAX_DOCUMENT_SIZE + 1)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentTooLarge);
    }

    #[test]
    fn test_empty_document_is_missing() {
        let err = check_document(&document("alvara.pdf", 0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DocumentMissing);
    }

    #[test]
    fn test_validation_error_carries_field_details() {
        let form = RegisterForm {
            name: "Ana".into(),
            email: "not-an-email".into(),
            password: "short".into(),
            password_confirmation: "short".into(),
            company_name: "Acme".into(),
            phone_number: "912345678".into(),
            business_model: None,
            role: None,
        };
        let err = validation_error(form.validate().unwrap_err());
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert!(details.contains_key("email"));
        assert!(details.contains_key("password"));
        assert!(!details.contains_key("name"));
    }
}
