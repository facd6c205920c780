use sea_orm_migration::prelude::*;

use super::m20250101_000008_create_appointments::Appointments;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BatterySwaps::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BatterySwaps::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BatterySwaps::AppointmentId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BatterySwaps::StationId).integer().not_null())
                    .col(ColumnDef::new(BatterySwaps::UserId).string().not_null())
                    .col(ColumnDef::new(BatterySwaps::SlotId).integer().not_null())
                    .col(ColumnDef::new(BatterySwaps::BatteryOutId).string().not_null())
                    .col(ColumnDef::new(BatterySwaps::BatteryInId).string())
                    .col(
                        ColumnDef::new(BatterySwaps::SwappedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_battery_swaps_appointment")
                            .from(BatterySwaps::Table, BatterySwaps::AppointmentId)
                            .to(Appointments::Table, Appointments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BatterySwaps::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum BatterySwaps {
    Table,
    Id,
    AppointmentId,
    StationId,
    UserId,
    SlotId,
    BatteryOutId,
    BatteryInId,
    SwappedAt,
}
