use sea_orm::*;
use uuid::Uuid;

use crate::models::job_photos;

/// Insert photo references for a job. Generic over the connection so it can
/// run inside the job-creation transaction.
pub async fn insert_photos<C: ConnectionTrait>(
    db: &C,
    job_id: Uuid,
    filenames: Vec<String>,
) -> Result<(), DbErr> {
    if filenames.is_empty() {
        return Ok(());
    }

    let rows = filenames.into_iter().map(|filename| job_photos::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job_id),
        filename: Set(filename),
        created_at: Set(chrono::Utc::now()),
    });

    job_photos::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Fetch the photo references attached to a job.
pub async fn get_photos_for_job(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Vec<job_photos::Model>, DbErr> {
    job_photos::Entity::find()
        .filter(job_photos::Column::JobId.eq(job_id))
        .all(db)
        .await
}
