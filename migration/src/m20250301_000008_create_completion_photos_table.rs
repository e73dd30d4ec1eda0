use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Identifiers for the `completion_photos` table and its columns.
#[derive(DeriveIden)]
enum CompletionPhotos {
    Table,
    Id,
    JobId,
    Filename,
    PhotoType,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Jobs {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CompletionPhotos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompletionPhotos::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CompletionPhotos::JobId).uuid().not_null())
                    .col(
                        ColumnDef::new(CompletionPhotos::Filename)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompletionPhotos::PhotoType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompletionPhotos::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_completion_photos_job_id")
                            .from(CompletionPhotos::Table, CompletionPhotos::JobId)
                            .to(Jobs::Table, Jobs::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CompletionPhotos::Table).to_owned())
            .await
    }
}
