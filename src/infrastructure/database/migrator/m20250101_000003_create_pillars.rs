use sea_orm_migration::prelude::*;

use super::m20250101_000002_create_stations::Stations;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pillars::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Pillars::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Pillars::StationId).integer().not_null())
                    .col(ColumnDef::new(Pillars::Code).string().not_null())
                    .col(
                        ColumnDef::new(Pillars::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pillars_station")
                            .from(Pillars::Table, Pillars::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pillars_station_code")
                    .table(Pillars::Table)
                    .col(Pillars::StationId)
                    .col(Pillars::Code)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pillars::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Pillars {
    Table,
    Id,
    StationId,
    Code,
    CreatedAt,
}
