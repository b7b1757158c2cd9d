//! Shared types for the partner portal
//!
//! Common types used by the portal server and any future clients:
//! the unified error system, role/status enums, and wire DTOs.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};

pub use models::{BusinessModel, Paginated, PartnerStatus, Role};
