//! Common utilities shared across the services and the gateway.
//!
//! This crate provides:
//! - Unified error handling with HTTP conversion
//! - Page-number pagination primitives
//! - Configuration structures
//! - The shared database wrapper (feature `database`)

pub mod config;
#[cfg(feature = "database")]
pub mod db;
pub mod error;
pub mod pagination;

pub use config::*;
#[cfg(feature = "database")]
pub use db::Database;
pub use error::{AppError, AppResult, FieldErrors, OptionExt};
pub use pagination::{Page, PageNumber, PageRequest, PageWindow};
