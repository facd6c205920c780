//! Create pillar slots table
//!
//! A slot holds at most one battery and a battery sits in at most one slot.
//! The (station_id, status) index backs the booking lock query.

use sea_orm_migration::prelude::*;

use super::m20250101_000003_create_pillars::Pillars;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PillarSlots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PillarSlots::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PillarSlots::PillarId).integer().not_null())
                    .col(ColumnDef::new(PillarSlots::StationId).integer().not_null())
                    .col(ColumnDef::new(PillarSlots::SlotNumber).integer().not_null())
                    .col(
                        ColumnDef::new(PillarSlots::Status)
                            .string()
                            .not_null()
                            .default("Available"),
                    )
                    .col(ColumnDef::new(PillarSlots::BatteryId).string().unique_key())
                    .col(ColumnDef::new(PillarSlots::AppointmentId).integer())
                    .col(
                        ColumnDef::new(PillarSlots::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_pillar_slots_pillar")
                            .from(PillarSlots::Table, PillarSlots::PillarId)
                            .to(Pillars::Table, Pillars::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pillar_slots_pillar_number")
                    .table(PillarSlots::Table)
                    .col(PillarSlots::PillarId)
                    .col(PillarSlots::SlotNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pillar_slots_station_status")
                    .table(PillarSlots::Table)
                    .col(PillarSlots::StationId)
                    .col(PillarSlots::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_pillar_slots_appointment")
                    .table(PillarSlots::Table)
                    .col(PillarSlots::AppointmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PillarSlots::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum PillarSlots {
    Table,
    Id,
    PillarId,
    StationId,
    SlotNumber,
    Status,
    BatteryId,
    AppointmentId,
    UpdatedAt,
}
