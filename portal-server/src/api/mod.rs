//! API routes for portal-server

pub mod admin;
pub mod auth;
pub mod health;
pub mod partner;
pub mod register;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::{Router, middleware};
use http::{HeaderName, HeaderValue};
use shared::error::AppError;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::{gate, jwt, rate_limit};
use crate::state::AppState;

pub type ApiResult<T> = Result<axum::Json<T>, AppError>;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Create the combined router
pub fn router(state: AppState) -> Router {
    // Public registration (rate limited per IP). The body limit leaves
    // headroom above the 2MB document cap for the form fields.
    let registration = Router::new()
        .route("/api/register", post(register::register))
        .route("/api/verify-email", post(register::verify_email))
        .route("/api/resend-code", post(register::resend_code))
        .layer(DefaultBodyLimit::max(4 * 1024 * 1024))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::register_rate_limit,
        ));

    // Public login (rate limited per IP)
    let login = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/admin/login", post(auth::admin_login))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::login_rate_limit,
        ));

    // Admin management (JWT + admin role). Layers run bottom-up, so the
    // JWT middleware is added last to run first.
    let admin = Router::new()
        .route("/api/admin/partners", get(admin::list_partners))
        .route("/api/admin/partners/{id}/status", put(admin::set_status))
        .route("/api/admin/partners/{id}/profile", put(admin::update_profile))
        .route(
            "/api/admin/stock-files",
            post(admin::upload_stock_file).get(admin::list_stock_files),
        )
        .route(
            "/api/admin/stock-files/{id}/activate",
            put(admin::activate_stock_file),
        )
        .layer(DefaultBodyLimit::max(25 * 1024 * 1024))
        .layer(middleware::from_fn(gate::require_admin))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt::auth_middleware,
        ));

    // Partner downloads (JWT + active partner status)
    let partner = Router::new()
        .route(
            "/api/partner/stock-files/download",
            get(partner::download_stock_file),
        )
        .layer(middleware::from_fn(gate::require_active_partner))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            jwt::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health::health_check))
        .merge(registration)
        .merge(login)
        .merge(admin)
        .merge(partner)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        .with_state(state)
}
