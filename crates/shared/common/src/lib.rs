//! Common utilities shared by the marketplace crates.
//!
//! This crate provides:
//! - Unified error handling mapped onto HTTP responses
//! - Configuration structures
//! - Pagination query/response types

pub mod config;
pub mod error;
pub mod pagination;

pub use config::*;
pub use error::{AppError, AppResult, OptionExt};
pub use pagination::{Paginated, PaginationMeta, PaginationParams};
