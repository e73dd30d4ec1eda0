pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_users_table;
mod m20250301_000002_create_zip_codes_table;
mod m20250301_000003_create_jobs_table;
mod m20250301_000004_create_job_photos_table;
mod m20250301_000005_create_bids_table;
mod m20250301_000006_create_reviews_table;
mod m20250301_000007_add_indexes;
mod m20250301_000008_create_completion_photos_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_users_table::Migration),
            Box::new(m20250301_000002_create_zip_codes_table::Migration),
            Box::new(m20250301_000003_create_jobs_table::Migration),
            Box::new(m20250301_000004_create_job_photos_table::Migration),
            Box::new(m20250301_000005_create_bids_table::Migration),
            Box::new(m20250301_000006_create_reviews_table::Migration),
            Box::new(m20250301_000007_add_indexes::Migration),
            Box::new(m20250301_000008_create_completion_photos_table::Migration),
        ]
    }
}
