//! Create `users` table.
//!
//! The unique key on `email` is what serializes concurrent registrations.
//! Email and role are unbounded `text`; the service accepts strings of any length.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(uuid(Users::Id).primary_key())
                    .col(text(Users::Email).unique_key().not_null())
                    .col(text(Users::PasswordHash).not_null())
                    .col(text(Users::Role).not_null())
                    .col(timestamp_with_time_zone(Users::CreatedAt).not_null())
                    .col(
                        ColumnDef::new(Users::LastLoginAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, Email, PasswordHash, Role, CreatedAt, LastLoginAt }
