//! JWT authentication for partner and admin routes
//!
//! Tokens only carry identity (`sub`, `email`). Role and status are
//! re-read from the database on every request, so an admin decision
//! (suspend, reject) takes effect immediately even for tokens issued
//! before it.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::{PartnerStatus, Role};

use crate::db;
use crate::state::AppState;

/// JWT claims for portal authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct PortalClaims {
    /// User ID
    pub sub: String,
    /// User email
    pub email: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated identity with fresh role and status from the database
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub role: Role,
    pub status: PartnerStatus,
}

const JWT_EXPIRY_HOURS: i64 = 24;

/// Create a JWT token for a user
pub fn create_token(
    user_id: &str,
    email: &str,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = PortalClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Middleware that verifies the bearer token, loads the user and
/// injects an [`Identity`] into request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotAuthenticated, "Missing Authorization header")
        })?;

    let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
        AppError::with_message(ErrorCode::NotAuthenticated, "Invalid Authorization format")
    })?;

    let token_data = jsonwebtoken::decode::<PortalClaims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user = db::users::find_by_id(&state.pool, &token_data.claims.sub)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to load user for auth");
            AppError::internal("Authentication failed")
        })?
        .ok_or_else(|| AppError::invalid_token("Account no longer exists"))?;

    let (Some(role), Some(status)) = (
        Role::from_db(&user.role),
        PartnerStatus::from_db(&user.status),
    ) else {
        tracing::error!(
            user_id = %user.id,
            role = %user.role,
            status = %user.status,
            "User row has unparseable role or status"
        );
        return Err(AppError::internal("Authentication failed"));
    };

    let identity = Identity {
        user_id: user.id,
        email: user.email,
        role,
        status,
    };

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    #[test]
    fn test_token_round_trip() {
        let token = create_token("u-1", "ana@example.com", SECRET).unwrap();
        let data = jsonwebtoken::decode::<PortalClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(data.claims.sub, "u-1");
        assert_eq!(data.claims.email, "ana@example.com");
        assert_eq!(
            data.claims.exp - data.claims.iat,
            (JWT_EXPIRY_HOURS * 3600) as usize
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("u-1", "ana@example.com", SECRET).unwrap();
        let result = jsonwebtoken::decode::<PortalClaims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_expired_token_reports_expired_signature() {
        // Well past the default leeway so the expiry check is what fails
        let now = chrono::Utc::now().timestamp();
        let claims = PortalClaims {
            sub: "u-1".into(),
            email: "ana@example.com".into(),
            exp: (now - 7200) as usize,
            iat: (now - 10_000) as usize,
        };
        let token = jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        let err = jsonwebtoken::decode::<PortalClaims>(
            &token,
            &DecodingKey::from_secret(SECRET.as_bytes()),
            &Validation::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.kind(),
            jsonwebtoken::errors::ErrorKind::ExpiredSignature
        ));
    }
}
