use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use tracing::warn;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::policy;
use crate::db::bids as bid_db;
use crate::db::completion_photos as completion_photo_db;
use crate::db::job_photos as photo_db;
use crate::db::jobs as job_db;
use crate::db::reviews as review_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::geo::{self, GeoIndex};
use crate::models::bids;
use crate::models::jobs::{AttachPhotos, CreateJob};
use crate::models::reviews::CreateReview;
use crate::notify::{Notifier, matching};

/// POST /api/jobs — customer posts a new hauling job.
///
/// The job lands in `open`; once the transaction commits, hauler matching
/// runs in a spawned task and never blocks or fails this request.
pub async fn create_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    geo: web::Data<GeoIndex>,
    notifier: web::Data<Notifier>,
    body: web::Json<CreateJob>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;

    let mut input = body.into_inner();
    input.pickup_address = input.pickup_address.trim().to_string();
    input.pickup_zip = input.pickup_zip.trim().to_string();
    input.description = input.description.trim().to_string();

    if input.pickup_address.is_empty() {
        return Err(ApiError::validation("pickup_address is required"));
    }
    if input.description.is_empty() {
        return Err(ApiError::validation("description is required"));
    }
    if !geo::is_valid_zip_format(&input.pickup_zip) {
        return Err(ApiError::validation("pickup_zip must be a 5-digit ZIP code"));
    }
    if !geo.is_known_zip(db.get_ref(), &input.pickup_zip).await? {
        return Err(ApiError::validation(format!(
            "unknown ZIP code {}",
            input.pickup_zip
        )));
    }

    let job = job_db::create_job_with_photos(db.get_ref(), input, user.0.id).await?;

    // Fan out to in-range haulers after the commit.
    tokio::spawn(matching::notify_haulers_for_job(
        db.get_ref().clone(),
        geo.get_ref().clone(),
        notifier.get_ref().clone(),
        job.clone(),
    ));

    Ok(HttpResponse::Created().json(job))
}

/// GET /api/jobs — list the customer's own jobs, newest first.
pub async fn list_own_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let jobs = job_db::get_jobs_by_customer(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(jobs))
}

/// GET /api/jobs/{id} — job detail with ranked bids and photos (owner only).
pub async fn job_detail(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    let bids = bids::ranked(bid_db::get_bids_for_job(db.get_ref(), job_id).await?);
    let photos = photo_db::get_photos_for_job(db.get_ref(), job_id).await?;
    let completion_photos =
        completion_photo_db::get_completion_photos_for_job(db.get_ref(), job_id).await?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "job": job,
        "bids": bids,
        "photos": photos,
        "completion_photos": completion_photos,
    })))
}

/// POST /api/jobs/{id}/photos — attach photo references while the job is
/// not yet terminal (owner only).
pub async fn add_photos(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AttachPhotos>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    if !job.status.photos_attachable() {
        return Err(ApiError::invalid_transition("attach photos to", job.status));
    }

    photo_db::insert_photos(db.get_ref(), job_id, body.into_inner().photos).await?;
    let photos = photo_db::get_photos_for_job(db.get_ref(), job_id).await?;
    Ok(HttpResponse::Created().json(photos))
}

/// POST /api/bids/{id}/accept — customer accepts a bid on their job.
///
/// One transaction marks the bid accepted, rejects every sibling bid and
/// drives the job to `accepted`. The hauler is notified after the commit.
pub async fn accept_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let bid_id = path.into_inner();

    let bid = bid_db::get_bid_by_id(db.get_ref(), bid_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bid"))?;
    let job = job_db::get_job_by_id(db.get_ref(), bid.job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    let (job, bid) = bid_db::accept_bid(db.get_ref(), bid_id).await?;

    let db_clone = db.get_ref().clone();
    let notifier = notifier.get_ref().clone();
    let (job_id, hauler_id, quote) = (job.id, bid.hauler_id, bid.quote_amount);
    tokio::spawn(async move {
        match user_db::get_user_by_id(&db_clone, hauler_id).await {
            Ok(Some(hauler)) => notifier.hauler_bid_accepted(&hauler, job_id, quote).await,
            Ok(None) => {}
            Err(e) => warn!("Skipping bid-accepted notification for job {job_id}: {e}"),
        }
    });

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "job": job,
        "bid": bid,
    })))
}

/// POST /api/jobs/{id}/deposit — customer attests the deposit is paid.
///
/// `accepted` → `deposit_paid`; calling again while already `deposit_paid`
/// is a safe no-op. Unlocks the pickup address for the accepted hauler, who
/// is notified after the commit.
pub async fn mark_deposit_paid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    let job = job_db::mark_deposit_paid(db.get_ref(), job_id).await?;

    if let Some(hauler_id) = job.accepted_hauler_id {
        let db_clone = db.get_ref().clone();
        let notifier = notifier.get_ref().clone();
        let (job_id, address, zip) = (job.id, job.pickup_address.clone(), job.pickup_zip.clone());
        tokio::spawn(async move {
            match user_db::get_user_by_id(&db_clone, hauler_id).await {
                Ok(Some(hauler)) => {
                    notifier
                        .hauler_deposit_paid(&hauler, job_id, &address, &zip)
                        .await
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping deposit-paid notification for job {job_id}: {e}"),
            }
        });
    }

    Ok(HttpResponse::Ok().json(job))
}

/// POST /api/jobs/{id}/complete — `deposit_paid` → `completed` (owner only).
pub async fn complete_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    let job = job_db::complete_job(db.get_ref(), job_id).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// POST /api/jobs/{id}/cancel — `open`/`bidding` → `cancelled` (owner only).
pub async fn cancel_job(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    let job = job_db::cancel_job(db.get_ref(), job_id).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// POST /api/jobs/{id}/review — review the hauler after completion.
///
/// One review per job; the rating must be 1–5 (out-of-range ratings are
/// rejected, not clamped).
pub async fn submit_review(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<CreateReview>,
) -> Result<HttpResponse, ApiError> {
    policy::require_customer(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_job_owner(&job, &user.0)?;

    if !job.status.can_review() {
        return Err(ApiError::invalid_transition("review", job.status));
    }

    let input = body.into_inner();
    if !(1..=5).contains(&input.rating) {
        return Err(ApiError::validation("rating must be between 1 and 5"));
    }
    if review_db::review_exists_for_job(db.get_ref(), job_id).await? {
        return Err(ApiError::validation("this job has already been reviewed"));
    }

    let hauler_id = job
        .accepted_hauler_id
        .ok_or_else(|| ApiError::validation("job has no accepted hauler to review"))?;

    let review =
        review_db::insert_review(db.get_ref(), job_id, hauler_id, user.0.id, input).await?;
    Ok(HttpResponse::Created().json(review))
}
