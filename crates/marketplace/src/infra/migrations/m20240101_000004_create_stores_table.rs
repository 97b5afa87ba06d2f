//! Migration: Create stores table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;
use super::m20240101_000003_create_sellers_table::Sellers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stores::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stores::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stores::SellerId).uuid().not_null().unique_key())
                    .col(ColumnDef::new(Stores::Name).string().not_null())
                    .col(ColumnDef::new(Stores::Description).text().null())
                    .col(ColumnDef::new(Stores::Category).string().not_null())
                    .col(ColumnDef::new(Stores::Address).json_binary().not_null())
                    .col(ColumnDef::new(Stores::ContactPhone).string_len(20).not_null())
                    .col(ColumnDef::new(Stores::ContactEmail).string().not_null())
                    .col(ColumnDef::new(Stores::Logo).string().null())
                    .col(ColumnDef::new(Stores::CoverImage).string().null())
                    .col(
                        ColumnDef::new(Stores::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Stores::IsFeatured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Stores::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Stores::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Stores::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Stores::ApprovedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stores_seller")
                            .from(Stores::Table, Stores::SellerId)
                            .to(Sellers::Table, Sellers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_stores_approved_by")
                            .from(Stores::Table, Stores::ApprovedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stores_status")
                    .table(Stores::Table)
                    .col(Stores::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_stores_category")
                    .table(Stores::Table)
                    .col(Stores::Category)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stores::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Stores {
    Table,
    Id,
    SellerId,
    Name,
    Description,
    Category,
    Address,
    ContactPhone,
    ContactEmail,
    Logo,
    CoverImage,
    Status,
    IsFeatured,
    CreatedAt,
    UpdatedAt,
    ApprovedAt,
    ApprovedBy,
}
