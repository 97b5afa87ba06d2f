//! Command-line interface.
//!
//! - `serve` - Start the HTTP server
//! - `migrate` - Database migrations
//! - `seed-plans` - Install the default plan catalogue
//! - `token` - Mint a bearer token for an existing user

pub mod args;

pub use args::{Cli, Commands};
