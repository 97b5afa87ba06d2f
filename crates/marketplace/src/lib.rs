//! Hyperlocal multi-vendor marketplace service.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: Command-line interface and its implementations
//! - **config**: Environment configuration
//! - **infra**: Database, migrations, Redis, transactions
//! - **repository**: SeaORM-backed persistence behind traits
//! - **service**: Business workflows (catalog quotas, orders, approvals)
//! - **api**: HTTP handlers, middleware, and routes
//!
//! # CLI Usage
//!
//! ```bash
//! marketplace migrate up
//! marketplace seed-plans
//! marketplace serve --port 3000
//! marketplace token --email seller@example.com
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

pub use api::{create_router, AppState};
pub use config::MarketplaceConfig;
pub use service::Services;
