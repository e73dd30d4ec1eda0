use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Jobs {
    Table,
    CustomerId,
    Status,
    AcceptedHaulerId,
}

#[derive(DeriveIden)]
enum Bids {
    Table,
    JobId,
    HaulerId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Index on jobs.customer_id for the customer job list
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_customer_id")
                    .table(Jobs::Table)
                    .col(Jobs::CustomerId)
                    .to_owned(),
            )
            .await?;

        // Index on jobs.status for the hauler open-jobs feed
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_status")
                    .table(Jobs::Table)
                    .col(Jobs::Status)
                    .to_owned(),
            )
            .await?;

        // Index on jobs.accepted_hauler_id for the hauler dashboard
        manager
            .create_index(
                Index::create()
                    .name("idx_jobs_accepted_hauler_id")
                    .table(Jobs::Table)
                    .col(Jobs::AcceptedHaulerId)
                    .to_owned(),
            )
            .await?;

        // Index on bids.job_id for listing bids on a job
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_job_id")
                    .table(Bids::Table)
                    .col(Bids::JobId)
                    .to_owned(),
            )
            .await?;

        // Index on bids.hauler_id for the account-deletion guard
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_hauler_id")
                    .table(Bids::Table)
                    .col(Bids::HaulerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_jobs_customer_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_status").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_jobs_accepted_hauler_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bids_job_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_bids_hauler_id").to_owned())
            .await?;

        Ok(())
    }
}
