use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::bids::{self, Status as BidStatus, SubmitBid};
use crate::models::jobs::{self, Status as JobStatus};

/// Append an `active` bid and, if this is the job's first bid, drive the job
/// from `open` to `bidding`. Both writes happen in one transaction; the
/// status bump is idempotent so concurrent first bids cannot conflict.
///
/// Returns the bid together with the job as it stood inside the transaction.
pub async fn insert_bid(
    db: &DatabaseConnection,
    job_id: Uuid,
    hauler_id: Uuid,
    input: SubmitBid,
) -> Result<(jobs::Model, bids::Model), ApiError> {
    db.transaction::<_, (jobs::Model, bids::Model), ApiError>(|txn| {
        Box::pin(async move {
            let job = jobs::Entity::find_by_id(job_id)
                .one(txn)
                .await?
                .ok_or_else(|| ApiError::not_found("Job"))?;

            if !job.status.accepts_bids() {
                return Err(ApiError::invalid_transition("bid on", job.status));
            }

            if job.status == JobStatus::Open {
                jobs::Entity::update_many()
                    .col_expr(jobs::Column::Status, Expr::value(JobStatus::Bidding))
                    .filter(jobs::Column::Id.eq(job_id))
                    .filter(jobs::Column::Status.eq(JobStatus::Open))
                    .exec(txn)
                    .await?;
            }

            let new_bid = bids::ActiveModel {
                id: Set(Uuid::new_v4()),
                job_id: Set(job_id),
                hauler_id: Set(hauler_id),
                quote_amount: Set(input.quote_amount),
                message: Set(input.message),
                status: Set(BidStatus::Active),
                created_at: Set(chrono::Utc::now()),
            };
            let bid = new_bid.insert(txn).await?;

            Ok((job, bid))
        })
    })
    .await
    .map_err(ApiError::from)
}

/// Fetch a single bid by ID.
pub async fn get_bid_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<bids::Model>, DbErr> {
    bids::Entity::find_by_id(id).one(db).await
}

/// Fetch all bids on a job. Display ranking is applied by the caller via
/// `models::bids::ranked`.
pub async fn get_bids_for_job(
    db: &DatabaseConnection,
    job_id: Uuid,
) -> Result<Vec<bids::Model>, DbErr> {
    bids::Entity::find()
        .filter(bids::Column::JobId.eq(job_id))
        .all(db)
        .await
}

/// Does this hauler still have an `active` bid anywhere? Used by the
/// account-deletion guard.
pub async fn has_active_bids(db: &DatabaseConnection, hauler_id: Uuid) -> Result<bool, DbErr> {
    let count = bids::Entity::find()
        .filter(bids::Column::HaulerId.eq(hauler_id))
        .filter(bids::Column::Status.eq(BidStatus::Active))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Accept a bid: mark it `accepted`, reject every sibling bid on the same
/// job, and drive the job to `accepted` carrying over hauler and quote —
/// all in one transaction.
///
/// The job-side update is a compare-and-set on `open`/`bidding`, so when two
/// accept calls race exactly one wins; the loser gets `InvalidTransition`.
pub async fn accept_bid(
    db: &DatabaseConnection,
    bid_id: Uuid,
) -> Result<(jobs::Model, bids::Model), ApiError> {
    db.transaction::<_, (jobs::Model, bids::Model), ApiError>(|txn| {
        Box::pin(async move {
            let bid = bids::Entity::find_by_id(bid_id)
                .one(txn)
                .await?
                .ok_or_else(|| ApiError::not_found("Bid"))?;

            let job = jobs::Entity::find_by_id(bid.job_id)
                .one(txn)
                .await?
                .ok_or_else(|| ApiError::not_found("Job"))?;

            let result = jobs::Entity::update_many()
                .col_expr(jobs::Column::Status, Expr::value(JobStatus::Accepted))
                .col_expr(jobs::Column::AcceptedHaulerId, Expr::value(Some(bid.hauler_id)))
                .col_expr(jobs::Column::AcceptedQuote, Expr::value(Some(bid.quote_amount)))
                .filter(jobs::Column::Id.eq(job.id))
                .filter(jobs::Column::Status.is_in([JobStatus::Open, JobStatus::Bidding]))
                .exec(txn)
                .await?;

            if result.rows_affected == 0 {
                return Err(ApiError::invalid_transition("accept a bid on", job.status));
            }

            let mut active: bids::ActiveModel = bid.into();
            active.status = Set(BidStatus::Accepted);
            let bid = active.update(txn).await?;

            bids::Entity::update_many()
                .col_expr(bids::Column::Status, Expr::value(BidStatus::Rejected))
                .filter(bids::Column::JobId.eq(job.id))
                .filter(bids::Column::Id.ne(bid.id))
                .exec(txn)
                .await?;

            let job = jobs::Entity::find_by_id(job.id)
                .one(txn)
                .await?
                .ok_or_else(|| ApiError::not_found("Job"))?;

            Ok((job, bid))
        })
    })
    .await
    .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    fn job(status: JobStatus) -> jobs::Model {
        jobs::Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            pickup_address: "123 Main St, St Paul".to_string(),
            pickup_zip: "55101".to_string(),
            description: "old couch and boxes".to_string(),
            preferred_date: None,
            preferred_time: None,
            status,
            accepted_hauler_id: None,
            accepted_quote: None,
            deposit_paid: false,
            completed_at: None,
            cancelled_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    fn bid_on(job: &jobs::Model, status: BidStatus) -> bids::Model {
        bids::Model {
            id: Uuid::new_v4(),
            job_id: job.id,
            hauler_id: Uuid::new_v4(),
            quote_amount: 80.0,
            message: None,
            status,
            created_at: chrono::Utc::now(),
        }
    }

    #[tokio::test]
    async fn accepting_a_bid_rejects_siblings_and_assigns_the_job() {
        let open_job = job(JobStatus::Bidding);
        let bid = bid_on(&open_job, BidStatus::Active);

        let mut accepted_bid = bid.clone();
        accepted_bid.status = BidStatus::Accepted;

        let mut accepted_job = open_job.clone();
        accepted_job.status = JobStatus::Accepted;
        accepted_job.accepted_hauler_id = Some(bid.hauler_id);
        accepted_job.accepted_quote = Some(bid.quote_amount);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bid.clone()]])
            .append_query_results([vec![open_job.clone()]])
            .append_query_results([vec![accepted_bid.clone()]])
            .append_query_results([vec![accepted_job.clone()]])
            .append_exec_results([
                // job CAS: open/bidding -> accepted
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                // sibling bids -> rejected
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 2,
                },
            ])
            .into_connection();

        let (job, bid) = accept_bid(&db, bid.id).await.unwrap();
        assert_eq!(job.status, JobStatus::Accepted);
        assert_eq!(job.accepted_hauler_id, Some(bid.hauler_id));
        assert_eq!(bid.status, BidStatus::Accepted);

        // Exactly one transaction: find bid, find job, CAS, bid update,
        // sibling rejection, refetch.
        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert_eq!(log.matches(r#"UPDATE "bids""#).count(), 2);
        assert_eq!(log.matches(r#"UPDATE "jobs""#).count(), 1);
    }

    #[tokio::test]
    async fn losing_an_accept_race_is_an_invalid_transition() {
        let racing_job = job(JobStatus::Bidding);
        let bid = bid_on(&racing_job, BidStatus::Active);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![bid.clone()]])
            .append_query_results([vec![racing_job]])
            // Another accept got there first: the CAS matches zero rows.
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let err = accept_bid(&db, bid.id).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition { .. }));

        // The loser must not touch any bid row.
        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert_eq!(log.matches(r#"UPDATE "bids""#).count(), 0);
    }

    #[tokio::test]
    async fn bidding_on_a_closed_job_creates_no_bid_row() {
        let cancelled_job = job(JobStatus::Cancelled);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![cancelled_job.clone()]])
            .into_connection();

        let err = insert_bid(
            &db,
            cancelled_job.id,
            Uuid::new_v4(),
            SubmitBid {
                quote_amount: 50.0,
                message: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ApiError::InvalidTransition { .. }));

        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert!(!log.contains(r#"INSERT INTO "bids""#));
    }

    #[tokio::test]
    async fn first_bid_bumps_the_job_to_bidding() {
        let open_job = job(JobStatus::Open);
        let inserted = bid_on(&open_job, BidStatus::Active);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![open_job.clone()]])
            .append_query_results([vec![inserted.clone()]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let (_, bid) = insert_bid(
            &db,
            open_job.id,
            inserted.hauler_id,
            SubmitBid {
                quote_amount: 80.0,
                message: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(bid.status, BidStatus::Active);

        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        assert_eq!(log.matches(r#"UPDATE "jobs""#).count(), 1);
        assert!(log.contains(r#"INSERT INTO "bids""#));
    }
}
