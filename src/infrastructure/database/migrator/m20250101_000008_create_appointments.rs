use sea_orm_migration::prelude::*;

use super::m20250101_000001_create_users::Users;
use super::m20250101_000002_create_stations::Stations;
use super::m20250101_000007_create_subscriptions::Subscriptions;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appointments::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Appointments::SubscriptionId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Appointments::StationId).integer().not_null())
                    .col(
                        ColumnDef::new(Appointments::ScheduledAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string()
                            .not_null()
                            .default("Confirmed"),
                    )
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Appointments::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_user")
                            .from(Appointments::Table, Appointments::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_subscription")
                            .from(Appointments::Table, Appointments::SubscriptionId)
                            .to(Subscriptions::Table, Subscriptions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_station")
                            .from(Appointments::Table, Appointments::StationId)
                            .to(Stations::Table, Stations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_appointments_status_scheduled")
                    .table(Appointments::Table)
                    .col(Appointments::Status)
                    .col(Appointments::ScheduledAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Appointments {
    Table,
    Id,
    UserId,
    SubscriptionId,
    StationId,
    ScheduledAt,
    Status,
    CreatedAt,
    UpdatedAt,
}
