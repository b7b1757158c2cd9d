//! Partner administration
//!
//! GET /api/admin/partners              — filtered, paginated listing
//! PUT /api/admin/partners/{id}/status  — approval workflow transitions
//! PUT /api/admin/partners/{id}/profile — profile corrections

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::Paginated;
use shared::error::{AppError, ErrorCode};
use shared::models::{BusinessModel, PartnerListItem, PartnerStatus, Role};

use crate::auth::Identity;
use crate::db;
use crate::notify::Notification;
use crate::state::AppState;
use crate::util::now_millis;

use crate::api::ApiResult;

#[derive(Deserialize)]
pub struct PartnersQuery {
    pub role: Option<String>,
    pub status: Option<String>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

fn to_list_item(row: db::partner_profiles::PartnerRow) -> Result<PartnerListItem, AppError> {
    let (Some(role), Some(status)) = (
        Role::from_db(&row.role),
        PartnerStatus::from_db(&row.status),
    ) else {
        tracing::error!(user_id = %row.id, "Partner row has unparseable role or status");
        return Err(AppError::new(ErrorCode::InternalError));
    };
    Ok(PartnerListItem {
        id: row.id,
        name: row.name,
        email: row.email,
        role,
        status,
        company_name: row.company_name,
        phone_number: row.phone_number,
        business_model: row.business_model.as_deref().and_then(BusinessModel::from_db),
        discount_percent: row.discount_percent,
        created_at: row.created_at,
    })
}

fn parse_role_filter(role: Option<&str>) -> Result<Option<Role>, AppError> {
    match role {
        None | Some("") => Ok(None),
        Some(s) => match Role::from_db(s) {
            Some(Role::Admin) | None => Err(AppError::with_message(
                ErrorCode::InvalidRole,
                format!("Invalid partner role: {s}"),
            )),
            Some(role) => Ok(Some(role)),
        },
    }
}

fn parse_status_filter(status: Option<&str>) -> Result<Option<PartnerStatus>, AppError> {
    match status {
        None | Some("") => Ok(None),
        Some(s) => PartnerStatus::from_db(s).map(Some).ok_or_else(|| {
            AppError::with_message(ErrorCode::InvalidStatus, format!("Invalid status: {s}"))
        }),
    }
}

const MAX_PAGE: i64 = 1_000_000;

/// Normalize page/per_page query values into (page, per_page, offset).
/// Both are clamped so the offset multiply can never overflow.
fn page_window(page: Option<i64>, per_page: Option<i64>) -> (i64, i64, i64) {
    let per_page = per_page.unwrap_or(20).clamp(1, 100);
    let page = page.unwrap_or(1).clamp(1, MAX_PAGE);
    (page, per_page, (page - 1) * per_page)
}

/// GET /api/admin/partners
pub async fn list_partners(
    State(state): State<AppState>,
    Query(query): Query<PartnersQuery>,
) -> ApiResult<Paginated<PartnerListItem>> {
    let role = parse_role_filter(query.role.as_deref())?;
    let status = parse_status_filter(query.status.as_deref())?;
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let (page, per_page, offset) = page_window(query.page, query.per_page);

    let rows = db::partner_profiles::list(
        &state.pool,
        role.map(|r| r.as_db()),
        status.map(|s| s.as_db()),
        search,
        per_page,
        offset,
    )
    .await
    .map_err(db_error)?;

    let total = db::partner_profiles::count(
        &state.pool,
        role.map(|r| r.as_db()),
        status.map(|s| s.as_db()),
        search,
    )
    .await
    .map_err(db_error)?;

    let items = rows
        .into_iter()
        .map(to_list_item)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(Paginated {
        items,
        page,
        per_page,
        total,
    }))
}

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

/// PUT /api/admin/partners/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<SetStatusRequest>,
) -> ApiResult<PartnerListItem> {
    let new_status = PartnerStatus::from_db(&req.status)
        .filter(PartnerStatus::admin_assignable)
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::InvalidStatus,
                format!("Status cannot be assigned: {}", req.status),
            )
        })?;

    let partner = db::partner_profiles::find_with_profile(&state.pool, &id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::PartnerNotFound))?;

    let old_status = PartnerStatus::from_db(&partner.status);

    db::users::set_status(&state.pool, &id, new_status.as_db())
        .await
        .map_err(db_error)?;

    let now = now_millis();
    if let Err(e) = db::audit::log(
        &state.pool,
        &admin.user_id,
        "partner.status_changed",
        Some(&serde_json::json!({
            "partner_id": id,
            "from": partner.status,
            "to": new_status.as_db(),
        })),
        now,
    )
    .await
    {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    // Notify the partner only on a real transition into a decision state
    if old_status != Some(new_status) {
        match new_status {
            PartnerStatus::Active => state.notifier.dispatch(Notification::PartnerApproved {
                to: partner.email.clone(),
                name: partner.name.clone(),
            }),
            PartnerStatus::Rejected => state.notifier.dispatch(Notification::PartnerRejected {
                to: partner.email.clone(),
                name: partner.name.clone(),
            }),
            _ => {}
        }
    }

    tracing::info!(
        admin_id = %admin.user_id,
        partner_id = %id,
        status = %new_status.as_db(),
        "Partner status updated"
    );

    let updated = db::partner_profiles::find_with_profile(&state.pool, &id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::PartnerNotFound))?;

    Ok(Json(to_list_item(updated)?))
}

#[derive(Deserialize)]
pub struct UpdateProfileRequest {
    pub company_name: Option<String>,
    pub phone_number: Option<String>,
    pub business_model: Option<String>,
    pub discount_percent: Option<f64>,
}

/// PUT /api/admin/partners/{id}/profile
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(admin): Extension<Identity>,
    Path(id): Path<String>,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<PartnerListItem> {
    let business_model = match req.business_model.as_deref() {
        None => None,
        Some(s) => Some(BusinessModel::from_db(s).ok_or_else(|| {
            AppError::validation(format!("Invalid business model: {s}"))
        })?),
    };

    if let Some(discount) = req.discount_percent
        && !(0.0..=100.0).contains(&discount)
    {
        return Err(AppError::validation("Discount must be between 0 and 100"));
    }

    let updated = db::partner_profiles::update(
        &state.pool,
        &id,
        req.company_name.as_deref().map(str::trim),
        req.phone_number.as_deref().map(str::trim),
        business_model.map(|m| m.as_db()),
        req.discount_percent,
    )
    .await
    .map_err(db_error)?;

    if !updated {
        return Err(AppError::new(ErrorCode::PartnerNotFound));
    }

    let now = now_millis();
    if let Err(e) = db::audit::log(
        &state.pool,
        &admin.user_id,
        "partner.profile_updated",
        Some(&serde_json::json!({ "partner_id": id })),
        now,
    )
    .await
    {
        tracing::warn!(error = %e, "Audit log write failed");
    }

    let row = db::partner_profiles::find_with_profile(&state.pool, &id)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::new(ErrorCode::PartnerNotFound))?;

    Ok(Json(to_list_item(row)?))
}

fn db_error(e: sqlx::Error) -> AppError {
    tracing::error!("DB error: {e}");
    AppError::new(ErrorCode::InternalError)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_filter_rejects_admin() {
        assert!(parse_role_filter(Some("admin")).is_err());
        assert!(parse_role_filter(Some("wholesale")).is_err());
        assert_eq!(parse_role_filter(Some("reseller")).unwrap(), Some(Role::Reseller));
        assert_eq!(parse_role_filter(None).unwrap(), None);
        assert_eq!(parse_role_filter(Some("")).unwrap(), None);
    }

    #[test]
    fn test_page_window_defaults_and_clamps() {
        assert_eq!(page_window(None, None), (1, 20, 0));
        assert_eq!(page_window(Some(3), Some(50)), (3, 50, 100));
        assert_eq!(page_window(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(page_window(Some(-5), Some(500)), (1, 100, 0));
        assert_eq!(
            page_window(Some(i64::MAX), Some(i64::MAX)),
            (MAX_PAGE, 100, (MAX_PAGE - 1) * 100)
        );
    }

    #[test]
    fn test_status_filter() {
        assert_eq!(
            parse_status_filter(Some("active")).unwrap(),
            Some(PartnerStatus::Active)
        );
        assert!(parse_status_filter(Some("pending")).is_err());
        assert_eq!(parse_status_filter(None).unwrap(), None);
    }
}
