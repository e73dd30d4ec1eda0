use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use tracing::warn;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::policy;
use crate::db::bids as bid_db;
use crate::db::completion_photos as completion_photo_db;
use crate::db::jobs as job_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::geo::{self, GeoIndex};
use crate::models::bids::SubmitBid;
use crate::models::completion_photos::AttachCompletionPhotos;
use crate::models::jobs::HaulerJobView;
use crate::models::users::{HaulerSetup, UserResponse};
use crate::notify::Notifier;

/// POST /api/hauler/setup — one-time hauler onboarding: display name, home
/// ZIP, travel radius and hauler terms agreement. The only hauler route
/// allowed before setup is complete.
pub async fn setup(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    geo: web::Data<GeoIndex>,
    body: web::Json<HaulerSetup>,
) -> Result<HttpResponse, ApiError> {
    policy::require_hauler_role(&user.0)?;

    let mut input = body.into_inner();
    input.display_name = input.display_name.trim().to_string();
    input.home_zip = input.home_zip.trim().to_string();

    if !input.agree_to_terms {
        return Err(ApiError::validation(
            "you must agree to the hauler terms to complete setup",
        ));
    }
    if input.display_name.is_empty() {
        return Err(ApiError::validation("display_name is required"));
    }
    if input.max_travel_miles <= 0 {
        return Err(ApiError::validation("max_travel_miles must be positive"));
    }
    if !geo::is_valid_zip_format(&input.home_zip) {
        return Err(ApiError::validation("home_zip must be a 5-digit ZIP code"));
    }
    if !geo.is_known_zip(db.get_ref(), &input.home_zip).await? {
        return Err(ApiError::validation(format!(
            "unknown ZIP code {}",
            input.home_zip
        )));
    }

    let updated = user_db::complete_hauler_setup(db.get_ref(), user.0.id, input).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// GET /api/hauler/jobs — open jobs within the hauler's travel radius,
/// annotated with straight-line distance. Pickup addresses stay redacted at
/// this stage.
pub async fn open_jobs(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    geo: web::Data<GeoIndex>,
) -> Result<HttpResponse, ApiError> {
    policy::require_active_hauler(&user.0)?;
    let (Some(home_zip), Some(radius)) = (user.0.home_zip.clone(), user.0.max_travel_miles) else {
        return Err(ApiError::HaulerSetupRequired);
    };

    let jobs = job_db::get_open_jobs(db.get_ref()).await?;

    let mut in_range = Vec::new();
    for job in jobs {
        // A bad ZIP on one job must not take down the whole feed.
        match geo.distance_between(db.get_ref(), &home_zip, &job.pickup_zip).await {
            Ok(Some(distance)) if distance <= f64::from(radius) => {
                in_range.push(HaulerJobView::redacted_for(job, user.0.id, Some(distance)));
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping job in open-jobs feed: {e}"),
        }
    }

    Ok(HttpResponse::Ok().json(in_range))
}

/// POST /api/jobs/{id}/bids — hauler submits a bid on an open job.
///
/// The job's `open` → `bidding` bump rides in the same transaction as the
/// bid insert; the customer is notified after the commit.
pub async fn submit_bid(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    notifier: web::Data<Notifier>,
    path: web::Path<Uuid>,
    body: web::Json<SubmitBid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_active_hauler(&user.0)?;
    let job_id = path.into_inner();

    let input = body.into_inner();
    if !(input.quote_amount > 0.0) {
        return Err(ApiError::validation("quote_amount must be positive"));
    }

    let (job, bid) = bid_db::insert_bid(db.get_ref(), job_id, user.0.id, input).await?;

    let db_clone = db.get_ref().clone();
    let notifier = notifier.get_ref().clone();
    let hauler_name = user
        .0
        .display_name
        .clone()
        .unwrap_or_else(|| user.0.email.clone());
    let (customer_id, quote) = (job.customer_id, bid.quote_amount);
    tokio::spawn(async move {
        match user_db::get_user_by_id(&db_clone, customer_id).await {
            Ok(Some(customer)) => {
                notifier
                    .customer_new_bid(&customer, job_id, &hauler_name, quote)
                    .await
            }
            Ok(None) => {}
            Err(e) => warn!("Skipping new-bid notification for job {job_id}: {e}"),
        }
    });

    Ok(HttpResponse::Created().json(bid))
}

/// POST /api/jobs/{id}/completion-photos — the accepted hauler attaches
/// before/after photos while the job is `deposit_paid` or `completed`.
pub async fn add_completion_photos(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
    body: web::Json<AttachCompletionPhotos>,
) -> Result<HttpResponse, ApiError> {
    policy::require_active_hauler(&user.0)?;
    let job_id = path.into_inner();

    let job = job_db::get_job_by_id(db.get_ref(), job_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Job"))?;
    policy::require_accepted_hauler(&job, &user.0)?;

    if !job.status.completion_photos_attachable() {
        return Err(ApiError::invalid_transition(
            "attach completion photos to",
            job.status,
        ));
    }

    completion_photo_db::insert_completion_photos(db.get_ref(), job_id, body.into_inner().photos)
        .await?;
    let photos = completion_photo_db::get_completion_photos_for_job(db.get_ref(), job_id).await?;
    Ok(HttpResponse::Created().json(photos))
}

/// GET /api/hauler/dashboard — the hauler's accepted and in-progress jobs.
/// The pickup address appears only once the deposit is paid.
pub async fn dashboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    policy::require_active_hauler(&user.0)?;

    let jobs = job_db::get_jobs_by_hauler(db.get_ref(), user.0.id).await?;
    let views: Vec<HaulerJobView> = jobs
        .into_iter()
        .map(|job| HaulerJobView::redacted_for(job, user.0.id, None))
        .collect();

    Ok(HttpResponse::Ok().json(views))
}
