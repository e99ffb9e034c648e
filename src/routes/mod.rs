pub mod analyze;
pub mod models;
