//! Files catalog migration.
//!
//! Creates the files table and the unique index on storage names. Built with the schema builder
//! so the same migration runs on Postgres and SQLite.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Files::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Files::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Files::OriginalName).text().not_null())
                    .col(ColumnDef::new(Files::StorageName).string().not_null())
                    .col(ColumnDef::new(Files::Path).text().not_null())
                    .col(ColumnDef::new(Files::Size).big_integer().not_null())
                    .col(ColumnDef::new(Files::StorageType).string().not_null())
                    .col(
                        ColumnDef::new(Files::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Files::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(STORAGE_NAME_INDEX)
                    .table(Files::Table)
                    .col(Files::StorageName)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Files::Table).if_exists().to_owned())
            .await
    }
}

const STORAGE_NAME_INDEX: &str = "idx_files_storage_name";

#[derive(DeriveIden)]
enum Files {
    Table,
    Id,
    OriginalName,
    StorageName,
    Path,
    Size,
    StorageType,
    CreatedAt,
    IsDeleted,
}
