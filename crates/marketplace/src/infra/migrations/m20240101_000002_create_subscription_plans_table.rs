//! Migration: Create subscription plans table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SubscriptionPlans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubscriptionPlans::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(SubscriptionPlans::Name).string().not_null())
                    .col(
                        ColumnDef::new(SubscriptionPlans::Slug)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(SubscriptionPlans::Description).text().null())
                    .col(ColumnDef::new(SubscriptionPlans::Price).big_integer().not_null())
                    .col(ColumnDef::new(SubscriptionPlans::MaxProducts).integer().not_null())
                    .col(ColumnDef::new(SubscriptionPlans::MaxServices).integer().not_null())
                    .col(ColumnDef::new(SubscriptionPlans::Features).json_binary().not_null())
                    .col(ColumnDef::new(SubscriptionPlans::CommissionRate).double().not_null())
                    .col(
                        ColumnDef::new(SubscriptionPlans::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::AnalyticsAccess)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::Priority)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SubscriptionPlans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SubscriptionPlans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum SubscriptionPlans {
    Table,
    Id,
    Name,
    Slug,
    Description,
    Price,
    MaxProducts,
    MaxServices,
    Features,
    CommissionRate,
    IsFeatured,
    AnalyticsAccess,
    Priority,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
