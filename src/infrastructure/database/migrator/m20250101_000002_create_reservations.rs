//! Create reservations table
//!
//! Stays are stored as absolute UTC instants. Deleting a cottage removes
//! its reservations.

use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_cottages::Cottages;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Reservations::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Reservations::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Reservations::TouristId).string().not_null())
                    .col(ColumnDef::new(Reservations::CottageId).string().not_null())
                    .col(
                        ColumnDef::new(Reservations::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Reservations::Status)
                            .string()
                            .not_null()
                            .default("unresolved"),
                    )
                    .col(ColumnDef::new(Reservations::DenyComment).string())
                    .col(
                        ColumnDef::new(Reservations::IsReviewed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Reservations::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reservations_cottage")
                            .from(Reservations::Table, Reservations::CottageId)
                            .to(Cottages::Table, Cottages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_cottage_status")
                    .table(Reservations::Table)
                    .col(Reservations::CottageId)
                    .col(Reservations::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reservations_tourist")
                    .table(Reservations::Table)
                    .col(Reservations::TouristId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reservations::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Reservations {
    Table,
    Id,
    TouristId,
    CottageId,
    StartDate,
    EndDate,
    Status,
    DenyComment,
    IsReviewed,
    CreatedAt,
}
