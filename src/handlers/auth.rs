use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::bids as bid_db;
use crate::db::jobs as job_db;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::users::{ChooseRole, Role, RoleState, UpdateProfile, UserResponse};

/// GET /api/auth/me — return the currently authenticated user's profile.
pub async fn me(user: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(UserResponse::from(user.0))
}

/// POST /api/auth/choose-role — one-time selection of customer or hauler.
pub async fn choose_role(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<ChooseRole>,
) -> Result<HttpResponse, ApiError> {
    if user.0.role != Role::Unassigned {
        return Err(ApiError::validation("role has already been chosen"));
    }
    let role = body.into_inner().role;
    if !matches!(role, Role::Customer | Role::Hauler) {
        return Err(ApiError::validation("role must be customer or hauler"));
    }

    let updated = user_db::set_role(db.get_ref(), user.0.id, role).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// PUT /api/auth/profile — update name, phone and notification preferences.
pub async fn update_profile(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<UpdateProfile>,
) -> Result<HttpResponse, ApiError> {
    let updated = user_db::update_profile(db.get_ref(), user.0.id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(UserResponse::from(updated)))
}

/// DELETE /api/auth/account — delete the caller's own account.
///
/// Blocked while the user has anything in flight: a customer with jobs that
/// are neither completed nor cancelled, or a hauler with active bids or an
/// assigned job.
pub async fn delete_account(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, ApiError> {
    let user_id = user.0.id;

    match user.0.role_state() {
        RoleState::Customer => {
            if job_db::has_live_jobs_as_customer(db.get_ref(), user_id).await? {
                return Err(ApiError::validation(
                    "account has active jobs; complete or cancel them first",
                ));
            }
        }
        RoleState::HaulerActive | RoleState::HaulerPendingSetup => {
            if bid_db::has_active_bids(db.get_ref(), user_id).await?
                || job_db::has_live_jobs_as_hauler(db.get_ref(), user_id).await?
            {
                return Err(ApiError::validation(
                    "account has active bids or assigned jobs",
                ));
            }
        }
        RoleState::Unassigned | RoleState::Admin => {}
    }

    user_db::delete_user_cascading(db.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Account deleted",
    })))
}
