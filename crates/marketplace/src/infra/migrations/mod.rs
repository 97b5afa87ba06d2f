//! Database migrations.
//!
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_subscription_plans_table;
mod m20240101_000003_create_sellers_table;
mod m20240101_000004_create_stores_table;
mod m20240101_000005_create_catalog_tables;
mod m20240101_000006_create_orders_and_bookings_tables;
mod m20240101_000007_create_admin_logs_table;
mod m20240101_000008_create_seller_documents_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_subscription_plans_table::Migration),
            Box::new(m20240101_000003_create_sellers_table::Migration),
            Box::new(m20240101_000004_create_stores_table::Migration),
            Box::new(m20240101_000005_create_catalog_tables::Migration),
            Box::new(m20240101_000006_create_orders_and_bookings_tables::Migration),
            Box::new(m20240101_000007_create_admin_logs_table::Migration),
            Box::new(m20240101_000008_create_seller_documents_table::Migration),
        ]
    }
}
