//! Infrastructure layer - database, migrations, Redis and transactions.

mod cache;
mod db;
pub mod migrations;
mod transaction;

pub use cache::Cache;
pub use db::Database;
pub use migrations::Migrator;
pub use transaction::{in_transaction, TxFuture};
