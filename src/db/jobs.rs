use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::db::job_photos;
use crate::error::ApiError;
use crate::models::jobs::{self, CreateJob, Status};

/// Insert a new job (status `open`) together with its photo references, in
/// one transaction.
pub async fn create_job_with_photos(
    db: &DatabaseConnection,
    input: CreateJob,
    customer_id: Uuid,
) -> Result<jobs::Model, ApiError> {
    db.transaction::<_, jobs::Model, ApiError>(|txn| {
        Box::pin(async move {
            let new_job = jobs::ActiveModel {
                id: Set(Uuid::new_v4()),
                customer_id: Set(customer_id),
                pickup_address: Set(input.pickup_address),
                pickup_zip: Set(input.pickup_zip),
                description: Set(input.description),
                preferred_date: Set(input.preferred_date),
                preferred_time: Set(input.preferred_time),
                status: Set(Status::Open),
                accepted_hauler_id: Set(None),
                accepted_quote: Set(None),
                deposit_paid: Set(false),
                completed_at: Set(None),
                cancelled_at: Set(None),
                created_at: Set(chrono::Utc::now()),
            };

            let job = new_job.insert(txn).await?;
            job_photos::insert_photos(txn, job.id, input.photos).await?;
            Ok(job)
        })
    })
    .await
    .map_err(ApiError::from)
}

/// Fetch a single job by ID.
pub async fn get_job_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<jobs::Model>, DbErr> {
    jobs::Entity::find_by_id(id).one(db).await
}

/// Fetch a customer's own jobs, newest first.
pub async fn get_jobs_by_customer(
    db: &DatabaseConnection,
    customer_id: Uuid,
) -> Result<Vec<jobs::Model>, DbErr> {
    jobs::Entity::find()
        .filter(jobs::Column::CustomerId.eq(customer_id))
        .order_by_desc(jobs::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch jobs still taking bids (`open` or `bidding`), newest first.
pub async fn get_open_jobs(db: &DatabaseConnection) -> Result<Vec<jobs::Model>, DbErr> {
    jobs::Entity::find()
        .filter(jobs::Column::Status.is_in([Status::Open, Status::Bidding]))
        .order_by_desc(jobs::Column::CreatedAt)
        .all(db)
        .await
}

/// Fetch the jobs assigned to a hauler (accepted and beyond), newest first.
pub async fn get_jobs_by_hauler(
    db: &DatabaseConnection,
    hauler_id: Uuid,
) -> Result<Vec<jobs::Model>, DbErr> {
    jobs::Entity::find()
        .filter(jobs::Column::AcceptedHaulerId.eq(hauler_id))
        .filter(jobs::Column::Status.is_in([
            Status::Accepted,
            Status::DepositPaid,
            Status::Completed,
        ]))
        .order_by_desc(jobs::Column::CreatedAt)
        .all(db)
        .await
}

/// Does this customer still have jobs that are neither completed nor
/// cancelled? Used by the account-deletion guard.
pub async fn has_live_jobs_as_customer(
    db: &DatabaseConnection,
    customer_id: Uuid,
) -> Result<bool, DbErr> {
    let count = jobs::Entity::find()
        .filter(jobs::Column::CustomerId.eq(customer_id))
        .filter(jobs::Column::Status.is_not_in([Status::Completed, Status::Cancelled]))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Does this hauler have an in-flight assignment (`accepted`/`deposit_paid`)?
pub async fn has_live_jobs_as_hauler(
    db: &DatabaseConnection,
    hauler_id: Uuid,
) -> Result<bool, DbErr> {
    let count = jobs::Entity::find()
        .filter(jobs::Column::AcceptedHaulerId.eq(hauler_id))
        .filter(jobs::Column::Status.is_in([Status::Accepted, Status::DepositPaid]))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// `accepted` → `deposit_paid`, as a compare-and-set so concurrent calls
/// cannot move the job backwards. Calling on a job already in
/// `deposit_paid` is a no-op that returns the job unchanged.
pub async fn mark_deposit_paid(db: &DatabaseConnection, job_id: Uuid) -> Result<jobs::Model, ApiError> {
    let result = jobs::Entity::update_many()
        .col_expr(jobs::Column::Status, Expr::value(Status::DepositPaid))
        .col_expr(jobs::Column::DepositPaid, Expr::value(true))
        .filter(jobs::Column::Id.eq(job_id))
        .filter(jobs::Column::Status.eq(Status::Accepted))
        .exec(db)
        .await?;

    let job = get_job_by_id(db, job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;

    if result.rows_affected == 0 && job.status != Status::DepositPaid {
        return Err(ApiError::invalid_transition("mark deposit paid", job.status));
    }
    Ok(job)
}

/// `deposit_paid` → `completed`, setting the completion timestamp.
pub async fn complete_job(db: &DatabaseConnection, job_id: Uuid) -> Result<jobs::Model, ApiError> {
    let result = jobs::Entity::update_many()
        .col_expr(jobs::Column::Status, Expr::value(Status::Completed))
        .col_expr(jobs::Column::CompletedAt, Expr::value(Some(chrono::Utc::now())))
        .filter(jobs::Column::Id.eq(job_id))
        .filter(jobs::Column::Status.eq(Status::DepositPaid))
        .exec(db)
        .await?;

    let job = get_job_by_id(db, job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;

    if result.rows_affected == 0 {
        return Err(ApiError::invalid_transition("complete", job.status));
    }
    Ok(job)
}

/// `open`/`bidding` → `cancelled`, setting the cancellation timestamp.
pub async fn cancel_job(db: &DatabaseConnection, job_id: Uuid) -> Result<jobs::Model, ApiError> {
    let result = jobs::Entity::update_many()
        .col_expr(jobs::Column::Status, Expr::value(Status::Cancelled))
        .col_expr(jobs::Column::CancelledAt, Expr::value(Some(chrono::Utc::now())))
        .filter(jobs::Column::Id.eq(job_id))
        .filter(jobs::Column::Status.is_in([Status::Open, Status::Bidding]))
        .exec(db)
        .await?;

    let job = get_job_by_id(db, job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;

    if result.rows_affected == 0 {
        return Err(ApiError::invalid_transition("cancel", job.status));
    }
    Ok(job)
}
