use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::auth::policy;
use crate::db::users as user_db;
use crate::error::ApiError;
use crate::models::PaginationQuery;
use crate::models::users::UserResponse;

/// GET /api/users — list all users with pagination (admin only).
/// Query params: ?page=1&limit=20
pub async fn get_users(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    query: web::Query<PaginationQuery>,
) -> Result<HttpResponse, ApiError> {
    policy::require_admin(&user.0)?;

    let users = user_db::get_users_paginated(db.get_ref(), query.page(), query.limit()).await?;
    let response: Vec<UserResponse> = users.into_iter().map(UserResponse::from).collect();
    Ok(HttpResponse::Ok().json(response))
}

/// DELETE /api/users/{id} — administrative account deletion.
///
/// Deleting a hauler resets any job that had that hauler accepted back to
/// `open` (accepted hauler, quote and deposit flag cleared) in the same
/// transaction that removes their bids and user row.
pub async fn delete_user(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    policy::require_admin(&user.0)?;
    let id = path.into_inner();

    user_db::delete_user_cascading(db.get_ref(), id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("User {id} deleted"),
    })))
}
