//! Role and status access gate
//!
//! Runs after [`auth_middleware`](crate::auth::jwt::auth_middleware) so
//! role and status are already fresh from the database. The checks are
//! ordered: role membership first, then partner status. An admin is
//! never subject to the status check on partner routes they are not
//! allowed on anyway.

use axum::{extract::Request, middleware::Next, response::Response};
use shared::error::{AppError, ErrorCode};
use shared::{PartnerStatus, Role};

use super::Identity;

/// Core gate decision, separated from the middleware plumbing.
pub fn evaluate(role: Role, status: PartnerStatus, allowed: &[Role]) -> Result<(), AppError> {
    if !allowed.contains(&role) {
        return Err(AppError::new(ErrorCode::PermissionDenied));
    }
    if role.is_partner() && !status.is_active() {
        return Err(AppError::with_message(
            ErrorCode::PartnerNotActive,
            status.denial_reason(),
        ));
    }
    Ok(())
}

fn identity(request: &Request) -> Result<&Identity, AppError> {
    request
        .extensions()
        .get::<Identity>()
        .ok_or_else(AppError::unauthorized)
}

/// Middleware: admin role required
pub async fn require_admin(request: Request, next: Next) -> Result<Response, AppError> {
    let id = identity(&request)?;
    if id.role != Role::Admin {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    Ok(next.run(request).await)
}

/// Middleware: active partner (reseller or distributor) required
pub async fn require_active_partner(request: Request, next: Next) -> Result<Response, AppError> {
    let id = identity(&request)?;
    evaluate(id.role, id.status, &[Role::Reseller, Role::Distributor])?;
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARTNERS: [Role; 2] = [Role::Reseller, Role::Distributor];

    const ALL_STATUSES: [PartnerStatus; 6] = [
        PartnerStatus::PendingEmailValidation,
        PartnerStatus::PendingApproval,
        PartnerStatus::Active,
        PartnerStatus::Rejected,
        PartnerStatus::Suspended,
        PartnerStatus::Inactive,
    ];

    #[test]
    fn test_active_partner_passes() {
        for role in PARTNERS {
            assert!(evaluate(role, PartnerStatus::Active, &PARTNERS).is_ok());
        }
    }

    #[test]
    fn test_non_active_partner_denied_with_status_code() {
        for role in PARTNERS {
            for status in ALL_STATUSES {
                if status == PartnerStatus::Active {
                    continue;
                }
                let err = evaluate(role, status, &PARTNERS).unwrap_err();
                assert_eq!(err.code, ErrorCode::PartnerNotActive);
                assert_eq!(err.message, status.denial_reason());
            }
        }
    }

    #[test]
    fn test_role_check_runs_before_status_check() {
        // An admin with a non-active status hits the role error, never
        // the status error, on a partner-only route.
        for status in ALL_STATUSES {
            let err = evaluate(Role::Admin, status, &PARTNERS).unwrap_err();
            assert_eq!(err.code, ErrorCode::PermissionDenied);
        }
    }

    #[test]
    fn test_admin_allowed_on_admin_routes_regardless_of_status() {
        for status in ALL_STATUSES {
            assert!(evaluate(Role::Admin, status, &[Role::Admin]).is_ok());
        }
    }

    #[test]
    fn test_partner_denied_on_admin_routes() {
        for role in PARTNERS {
            let err = evaluate(role, PartnerStatus::Active, &[Role::Admin]).unwrap_err();
            assert_eq!(err.code, ErrorCode::PermissionDenied);
        }
    }
}
