//! Backend library for the Platewise marketing site: careers listings
//! with dashboard stats, and public lead capture with outbound
//! notifications.

pub mod config;
pub mod error;
pub mod site;
pub mod telemetry;

pub use error::AppError;
