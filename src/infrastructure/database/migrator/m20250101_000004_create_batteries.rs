use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Batteries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Batteries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Batteries::Model).string().not_null())
                    .col(ColumnDef::new(Batteries::CapacityKwh).double().not_null())
                    .col(
                        ColumnDef::new(Batteries::StateOfCharge)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(Batteries::StateOfHealth)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(Batteries::Status)
                            .string()
                            .not_null()
                            .default("Ready"),
                    )
                    .col(ColumnDef::new(Batteries::StationId).integer())
                    .col(
                        ColumnDef::new(Batteries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Batteries::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_batteries_status")
                    .table(Batteries::Table)
                    .col(Batteries::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Batteries::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Batteries {
    Table,
    Id,
    Model,
    CapacityKwh,
    StateOfCharge,
    StateOfHealth,
    Status,
    StationId,
    CreatedAt,
    UpdatedAt,
}
