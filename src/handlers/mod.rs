pub mod company_handlers;
pub mod health_handlers;

pub use health_handlers::{health_check, health_check_simple};
