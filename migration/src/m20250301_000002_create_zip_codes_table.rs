use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `zip_codes` reference table.
#[derive(DeriveIden)]
enum ZipCodes {
    Table,
    Zip,
    City,
    State,
    Lat,
    Lon,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ZipCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ZipCodes::Zip)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ZipCodes::City).string())
                    .col(ColumnDef::new(ZipCodes::State).string())
                    .col(ColumnDef::new(ZipCodes::Lat).double().not_null())
                    .col(ColumnDef::new(ZipCodes::Lon).double().not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ZipCodes::Table).to_owned())
            .await
    }
}
