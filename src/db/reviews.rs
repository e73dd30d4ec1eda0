use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::reviews::{self, CreateReview};

/// Insert a review for a completed job. The rating-range check lives in the
/// handler; the one-review-per-job rule is backed by a unique index on
/// `job_id`, so a racing duplicate surfaces here as a validation error
/// rather than a database error.
pub async fn insert_review(
    db: &DatabaseConnection,
    job_id: Uuid,
    hauler_id: Uuid,
    customer_id: Uuid,
    input: CreateReview,
) -> Result<reviews::Model, ApiError> {
    let new_review = reviews::ActiveModel {
        id: Set(Uuid::new_v4()),
        job_id: Set(job_id),
        hauler_id: Set(hauler_id),
        customer_id: Set(customer_id),
        rating: Set(input.rating),
        comment: Set(input.comment),
        created_at: Set(chrono::Utc::now()),
    };

    new_review.insert(db).await.map_err(duplicate_review_guard)
}

/// A unique index on `reviews.job_id` is the last line of defence against a
/// racing duplicate; translate its violation into the same validation error
/// the pre-insert check produces.
fn duplicate_review_guard(e: DbErr) -> ApiError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            ApiError::validation("this job has already been reviewed")
        }
        _ => ApiError::Db(e),
    }
}

/// Has this job already been reviewed?
pub async fn review_exists_for_job(db: &DatabaseConnection, job_id: Uuid) -> Result<bool, DbErr> {
    let existing = reviews::Entity::find()
        .filter(reviews::Column::JobId.eq(job_id))
        .one(db)
        .await?;
    Ok(existing.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn review_insert_returns_the_row() {
        let review = reviews::Model {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            hauler_id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            rating: 5,
            comment: Some("fast and tidy".to_string()),
            created_at: chrono::Utc::now(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![review.clone()]])
            .into_connection();

        let inserted = insert_review(
            &db,
            review.job_id,
            review.hauler_id,
            review.customer_id,
            CreateReview {
                rating: 5,
                comment: Some("fast and tidy".to_string()),
            },
        )
        .await
        .unwrap();
        assert_eq!(inserted.rating, 5);
    }

    #[test]
    fn non_unique_db_errors_pass_through_unchanged() {
        let err = duplicate_review_guard(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, ApiError::Db(_)));
    }
}
