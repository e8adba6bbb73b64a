pub mod analyze;
pub mod batch;
pub mod classify;
pub mod config;
