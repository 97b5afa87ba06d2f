//! Migration: Create sellers table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000002_create_subscription_plans_table::SubscriptionPlans;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Sellers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Sellers::UserId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Sellers::OwnerName).string().not_null())
                    .col(ColumnDef::new(Sellers::BusinessType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Sellers::VerificationStatus)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Sellers::SubscriptionPlanId).uuid().null())
                    .col(
                        ColumnDef::new(Sellers::SubscriptionStatus)
                            .string_len(16)
                            .not_null()
                            .default("expired"),
                    )
                    .col(
                        ColumnDef::new(Sellers::SubscriptionExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Sellers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Sellers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sellers_user")
                            .from(Sellers::Table, Sellers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_sellers_plan")
                            .from(Sellers::Table, Sellers::SubscriptionPlanId)
                            .to(SubscriptionPlans::Table, SubscriptionPlans::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Sellers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Sellers {
    Table,
    Id,
    UserId,
    OwnerName,
    BusinessType,
    VerificationStatus,
    SubscriptionPlanId,
    SubscriptionStatus,
    SubscriptionExpiresAt,
    CreatedAt,
    UpdatedAt,
}
