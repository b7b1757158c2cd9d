//! Admin management API endpoints — split into sub-modules by domain

mod partners;
mod stock_files;

// Re-export all handlers for route registration
pub use partners::{list_partners, set_status, update_profile};

pub use stock_files::{activate_stock_file, list_stock_files, upload_stock_file};
