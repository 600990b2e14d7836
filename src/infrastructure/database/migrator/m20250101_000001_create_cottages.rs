//! Create cottages table
//!
//! Registry slice used by the reservation engine: identity and ownership.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Cottages::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Cottages::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Cottages::Name).string().not_null())
                    .col(ColumnDef::new(Cottages::Location).string().not_null())
                    .col(ColumnDef::new(Cottages::OwnerId).string().not_null())
                    .col(
                        ColumnDef::new(Cottages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cottages_owner")
                    .table(Cottages::Table)
                    .col(Cottages::OwnerId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Cottages::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Cottages {
    Table,
    Id,
    Name,
    Location,
    OwnerId,
    CreatedAt,
}
