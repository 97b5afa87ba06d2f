//! Migration: Create admin audit log table.

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users_table::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AdminLogs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AdminLogs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AdminLogs::AdminId).uuid().not_null())
                    .col(ColumnDef::new(AdminLogs::Action).string_len(32).not_null())
                    .col(ColumnDef::new(AdminLogs::TargetType).string_len(16).not_null())
                    .col(ColumnDef::new(AdminLogs::TargetId).uuid().not_null())
                    .col(ColumnDef::new(AdminLogs::Details).json_binary().null())
                    .col(ColumnDef::new(AdminLogs::IpAddress).string_len(64).null())
                    .col(
                        ColumnDef::new(AdminLogs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_admin_logs_admin")
                            .from(AdminLogs::Table, AdminLogs::AdminId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admin_logs_created_at")
                    .table(AdminLogs::Table)
                    .col(AdminLogs::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AdminLogs::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AdminLogs {
    Table,
    Id,
    AdminId,
    Action,
    TargetType,
    TargetId,
    Details,
    IpAddress,
    CreatedAt,
}
