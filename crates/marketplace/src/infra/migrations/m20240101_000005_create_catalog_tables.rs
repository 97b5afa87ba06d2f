//! Migration: Create products, product variants and services tables.

use sea_orm_migration::prelude::*;

use super::m20240101_000004_create_stores_table::Stores;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn created_at<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .default(Expr::current_timestamp())
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Products::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Products::StoreId).uuid().not_null())
                    .col(ColumnDef::new(Products::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(ColumnDef::new(Products::Category).string().not_null())
                    .col(ColumnDef::new(Products::Images).json_binary().not_null())
                    .col(
                        ColumnDef::new(Products::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Products::IsDraft)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut created_at(Products::CreatedAt))
                    .col(&mut created_at(Products::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_store")
                            .from(Products::Table, Products::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_store_status")
                    .table(Products::Table)
                    .col(Products::StoreId)
                    .col(Products::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ProductVariants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductVariants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductVariants::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(ProductVariants::Sku)
                            .string_len(64)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(ProductVariants::Name).string().not_null())
                    .col(ColumnDef::new(ProductVariants::Attributes).json_binary().not_null())
                    .col(ColumnDef::new(ProductVariants::Price).big_integer().not_null())
                    .col(ColumnDef::new(ProductVariants::CompareAtPrice).big_integer().null())
                    .col(
                        ColumnDef::new(ProductVariants::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductVariants::IsAvailable)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(ProductVariants::Images).json_binary().not_null())
                    .col(&mut created_at(ProductVariants::CreatedAt))
                    .col(&mut created_at(ProductVariants::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_variants_product")
                            .from(ProductVariants::Table, ProductVariants::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Services::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Services::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Services::StoreId).uuid().not_null())
                    .col(ColumnDef::new(Services::Title).string_len(200).not_null())
                    .col(ColumnDef::new(Services::Description).text().null())
                    .col(ColumnDef::new(Services::Category).string().not_null())
                    .col(ColumnDef::new(Services::Images).json_binary().not_null())
                    .col(ColumnDef::new(Services::Duration).integer().not_null())
                    .col(ColumnDef::new(Services::BasePrice).big_integer().not_null())
                    .col(ColumnDef::new(Services::PriceVariants).json_binary().not_null())
                    .col(ColumnDef::new(Services::Availability).json_binary().null())
                    .col(
                        ColumnDef::new(Services::LocationType)
                            .string_len(16)
                            .not_null()
                            .default("at_store"),
                    )
                    .col(
                        ColumnDef::new(Services::Status)
                            .string_len(16)
                            .not_null()
                            .default("draft"),
                    )
                    .col(
                        ColumnDef::new(Services::IsDraft)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(&mut created_at(Services::CreatedAt))
                    .col(&mut created_at(Services::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_services_store")
                            .from(Services::Table, Services::StoreId)
                            .to(Stores::Table, Stores::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_services_store_status")
                    .table(Services::Table)
                    .col(Services::StoreId)
                    .col(Services::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Services::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Products {
    Table,
    Id,
    StoreId,
    Title,
    Description,
    Category,
    Images,
    Status,
    IsDraft,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum ProductVariants {
    Table,
    Id,
    ProductId,
    Sku,
    Name,
    Attributes,
    Price,
    CompareAtPrice,
    Stock,
    IsAvailable,
    Images,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum Services {
    Table,
    Id,
    StoreId,
    Title,
    Description,
    Category,
    Images,
    Duration,
    BasePrice,
    PriceVariants,
    Availability,
    LocationType,
    Status,
    IsDraft,
    CreatedAt,
    UpdatedAt,
}
