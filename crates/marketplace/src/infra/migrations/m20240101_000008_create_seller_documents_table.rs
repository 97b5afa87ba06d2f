//! Migration: Create seller verification documents table.

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
                    .table(SellerDocuments::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SellerDocuments::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SellerDocuments::SellerId).uuid().not_null())
                    .col(ColumnDef::new(SellerDocuments::DocType).string_len(32).not_null())
                    .col(ColumnDef::new(SellerDocuments::FileUrl).text().not_null())
                    .col(ColumnDef::new(SellerDocuments::FileName).string().not_null())
                    .col(ColumnDef::new(SellerDocuments::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(SellerDocuments::MimeType).string_len(128).not_null())
                    .col(
                        ColumnDef::new(SellerDocuments::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SellerDocuments::VerifiedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(SellerDocuments::VerifiedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_documents_seller")
                            .from(SellerDocuments::Table, SellerDocuments::SellerId)
                            .to(Sellers::Table, Sellers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_seller_documents_verifier")
                            .from(SellerDocuments::Table, SellerDocuments::VerifiedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_seller_documents_seller")
                    .table(SellerDocuments::Table)
                    .col(SellerDocuments::SellerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(SellerDocuments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum SellerDocuments {
    Table,
    Id,
    SellerId,
    DocType,
    FileUrl,
    FileName,
    FileSize,
    MimeType,
    UploadedAt,
    VerifiedAt,
    VerifiedBy,
}
