use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Plans::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Plans::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Plans::Name).string().not_null())
                    .col(ColumnDef::new(Plans::Description).text())
                    .col(ColumnDef::new(Plans::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(Plans::Currency)
                            .string_len(3)
                            .not_null()
                            .default("VND"),
                    )
                    .col(ColumnDef::new(Plans::DurationDays).integer().not_null())
                    .col(ColumnDef::new(Plans::SwapLimit).integer().not_null())
                    .col(
                        ColumnDef::new(Plans::BatteryCount)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Plans::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Plans::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Plans::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Plans::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Plans {
    Table,
    Id,
    Name,
    Description,
    Price,
    Currency,
    DurationDays,
    SwapLimit,
    BatteryCount,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
