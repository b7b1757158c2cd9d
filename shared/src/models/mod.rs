//! Data models
//!
//! Shared between the portal server and frontend (via API).
//! Role/status enums carry their database string codecs
//! (`from_db`/`as_db`) so the server and clients agree on the wire form.

pub mod partner;
pub mod role;
pub mod status;

// Re-exports
pub use partner::*;
pub use role::*;
pub use status::*;
