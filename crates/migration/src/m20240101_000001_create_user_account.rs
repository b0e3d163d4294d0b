//! Create `user_account` table.
//!
//! The username is the primary key, so the database itself rejects a second
//! row for the same name.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UserAccount::Table)
                    .if_not_exists()
                    .col(string_len(UserAccount::Username, 255).primary_key())
                    .col(string_len(UserAccount::Password, 255).not_null())
                    .col(timestamp_with_time_zone(UserAccount::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(UserAccount::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum UserAccount { Table, Username, Password, CreatedAt }
