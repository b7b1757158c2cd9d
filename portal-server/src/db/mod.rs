//! Database access layer
//!
//! Thin free functions over sqlx. Business rules live in the API and
//! service layers, not here.

pub mod audit;
pub mod email_verifications;
pub mod partner_profiles;
pub mod stock_files;
pub mod users;
