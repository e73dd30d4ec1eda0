use sea_orm::*;
use uuid::Uuid;

use crate::models::completion_photos::{self, CompletionPhotoInput};

/// Insert before/after photo references for a job.
pub async fn insert_completion_photos(
    db: &DatabaseConnection,
    job_id: Uuid,
    photos: Vec<CompletionPhotoInput>,
) -> Result<(), DbErr> {
    if photos.is_empty() {
        return Ok(());
    }

    let rows = photos
        .into_iter()
        .map(|photo| completion_photos::ActiveModel {
            id: Set(Uuid::new_v4()),
            job_id: Set(job_id),
            filename: Set(photo.filename),
            photo_type: Set(photo.photo_type),
            created_at: Set(chrono::Utc::now()),
        });

    completion_photos::Entity::insert_many(rows).exec(db).await?;
    Ok(())
}

/// Fetch the before/after photos attached to a job.
pub async fn get_completion_photos_for_job(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Vec<completion_photos::Model>, DbErr> {
    completion_photos::Entity::find()
        .filter(completion_photos::Column::JobId.eq(job_id))
        .all(db)
        .await
}
