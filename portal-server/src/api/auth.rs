//! Login endpoints
//!
//! POST /api/auth/login  — partner login, gated on account status
//! POST /api/admin/login — admin login
//!
//! Both return the same shape; the separate admin route lets a
//! non-admin credential fail fast instead of receiving a token that
//! every admin route would reject anyway.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use shared::error::{AppError, ErrorCode};
use shared::models::UserSummary;
use shared::{PartnerStatus, Role};

use crate::auth::jwt;
use crate::state::AppState;
use crate::util::{now_millis, verify_password};
use crate::db;

use super::ApiResult;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(serde::Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserSummary,
}

async fn authenticate(state: &AppState, req: &LoginRequest) -> Result<db::users::User, AppError> {
    let user = db::users::find_by_email(&state.pool, &req.email.trim().to_lowercase())
        .await
        .map_err(|e| {
            tracing::error!("DB error during login: {e}");
            AppError::new(ErrorCode::InternalError)
        })?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &user.hashed_password) {
        return Err(AppError::invalid_credentials());
    }

    Ok(user)
}

fn parse_identity(user: &db::users::User) -> Result<(Role, PartnerStatus), AppError> {
    let (Some(role), Some(status)) = (
        Role::from_db(&user.role),
        PartnerStatus::from_db(&user.status),
    ) else {
        tracing::error!(user_id = %user.id, "User row has unparseable role or status");
        return Err(AppError::new(ErrorCode::InternalError));
    };
    Ok((role, status))
}

fn issue_token(
    state: &AppState,
    user: db::users::User,
    role: Role,
    status: PartnerStatus,
) -> Result<LoginResponse, AppError> {
    let token = jwt::create_token(&user.id, &user.email, &state.jwt_secret).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(LoginResponse {
        token,
        user: UserSummary {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
            status,
        },
    })
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = authenticate(&state, &req).await?;
    let (role, status) = parse_identity(&user)?;

    // Partners must be approved before they can log in. Admins are only
    // gated on their own status being active.
    if !status.is_active() {
        return Err(AppError::with_message(
            ErrorCode::PartnerNotActive,
            status.denial_reason(),
        ));
    }

    let now = now_millis();
    if let Err(e) = db::audit::log(&state.pool, &user.id, "login", None, now).await {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    tracing::info!(user_id = %user.id, role = %user.role, "Login successful");

    Ok(Json(issue_token(&state, user, role, status)?))
}

/// POST /api/admin/login
pub async fn admin_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let user = authenticate(&state, &req).await?;
    let (role, status) = parse_identity(&user)?;

    if role != Role::Admin {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    if !status.is_active() {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let now = now_millis();
    if let Err(e) = db::audit::log(&state.pool, &user.id, "admin.login", None, now).await {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    tracing::info!(user_id = %user.id, "Admin login successful");

    Ok(Json(issue_token(&state, user, role, status)?))
}
