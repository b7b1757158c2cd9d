//! Partner-facing API endpoints

mod stock_files;

pub use stock_files::download_stock_file;
