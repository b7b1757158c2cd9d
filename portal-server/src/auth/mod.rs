pub mod gate;
pub mod jwt;
pub mod rate_limit;

pub use jwt::Identity;
