use sea_orm::sea_query::Expr;
use sea_orm::*;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::jobs;
use crate::models::users::{self, CreateUserFromAuth, HaulerSetup, Role, UpdateProfile};

/// Create a new user from identity-provider JWT claims (called by the auth
/// middleware). First-time users start with role `Unassigned`.
pub async fn find_or_create_from_auth(
    db: &DatabaseConnection,
    input: CreateUserFromAuth,
) -> Result<users::Model, DbErr> {
    if let Some(existing) = users::Entity::find_by_id(input.id).one(db).await? {
        return Ok(existing);
    }

    let new_user = users::ActiveModel {
        id: Set(input.id),
        email: Set(input.email),
        display_name: Set(input.display_name),
        avatar_url: Set(input.avatar_url),
        phone: Set(input.phone),
        role: Set(Role::Unassigned),
        home_zip: Set(None),
        max_travel_miles: Set(None),
        notify_new_jobs: Set(true),
        notify_sms: Set(false),
        agreed_to_hauler_terms: Set(false),
        agreed_to_hauler_terms_at: Set(None),
        created_at: Set(chrono::Utc::now()),
        updated_at: Set(None),
    };

    new_user.insert(db).await
}

/// Fetch a single user by ID.
pub async fn get_user_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(id).one(db).await
}

/// Fetch users with pagination (admin listing).
pub async fn get_users_paginated(
    db: &DatabaseConnection,
    page: u64,
    limit: u64,
) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .order_by_asc(users::Column::CreatedAt)
        .paginate(db, limit)
        .fetch_page(page.saturating_sub(1))
        .await
}

/// Fetch every user holding the hauler role (matching fan-out candidates).
pub async fn get_haulers(db: &DatabaseConnection) -> Result<Vec<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Role.eq(Role::Hauler))
        .all(db)
        .await
}

/// One-time role selection. The `Unassigned` guard lives in the handler.
pub async fn set_role(db: &DatabaseConnection, id: Uuid, role: Role) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.role = Set(role);
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Update profile fields (name, phone, notification preferences).
pub async fn update_profile(
    db: &DatabaseConnection,
    id: Uuid,
    input: UpdateProfile,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();

    if let Some(display_name) = input.display_name {
        active.display_name = Set(Some(display_name));
    }
    if let Some(phone) = input.phone {
        active.phone = Set(Some(phone));
    }
    if let Some(notify_new_jobs) = input.notify_new_jobs {
        active.notify_new_jobs = Set(notify_new_jobs);
    }
    if let Some(notify_sms) = input.notify_sms {
        active.notify_sms = Set(notify_sms);
    }
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Complete the one-time hauler setup (display name, home ZIP, travel
/// radius, terms agreement). The terms-accepted guard lives in the handler.
pub async fn complete_hauler_setup(
    db: &DatabaseConnection,
    id: Uuid,
    input: HaulerSetup,
) -> Result<users::Model, DbErr> {
    let user = users::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or(DbErr::RecordNotFound("User not found".to_string()))?;

    let mut active: users::ActiveModel = user.into();
    active.display_name = Set(Some(input.display_name));
    active.home_zip = Set(Some(input.home_zip));
    active.max_travel_miles = Set(Some(input.max_travel_miles));
    active.agreed_to_hauler_terms = Set(true);
    active.agreed_to_hauler_terms_at = Set(Some(chrono::Utc::now()));
    active.updated_at = Set(Some(chrono::Utc::now()));

    active.update(db).await
}

/// Delete a user, resetting any job that had this user accepted as hauler
/// back to `open` in the same transaction.
///
/// Jobs the user owned as a customer (plus their bids, photos and reviews)
/// go with the row via FK cascade.
pub async fn delete_user_cascading(db: &DatabaseConnection, user_id: Uuid) -> Result<(), ApiError> {
    db.transaction::<_, (), ApiError>(|txn| {
        Box::pin(async move {
            // Reset path of the lifecycle: clear the accepted hauler and
            // reopen in-flight jobs for bidding.
            jobs::Entity::update_many()
                .col_expr(jobs::Column::Status, Expr::value(jobs::Status::Open))
                .col_expr(jobs::Column::AcceptedHaulerId, Expr::value(None::<Uuid>))
                .col_expr(jobs::Column::AcceptedQuote, Expr::value(None::<f64>))
                .col_expr(jobs::Column::DepositPaid, Expr::value(false))
                .filter(jobs::Column::AcceptedHaulerId.eq(user_id))
                .filter(
                    jobs::Column::Status
                        .is_not_in([jobs::Status::Completed, jobs::Status::Cancelled]),
                )
                .exec(txn)
                .await?;

            // Completed and cancelled jobs keep their rows but must drop the
            // quote together with the hauler reference, or the pair goes out
            // of sync once the FK nulls the hauler.
            jobs::Entity::update_many()
                .col_expr(jobs::Column::AcceptedHaulerId, Expr::value(None::<Uuid>))
                .col_expr(jobs::Column::AcceptedQuote, Expr::value(None::<f64>))
                .filter(jobs::Column::AcceptedHaulerId.eq(user_id))
                .filter(
                    jobs::Column::Status
                        .is_in([jobs::Status::Completed, jobs::Status::Cancelled]),
                )
                .exec(txn)
                .await?;

            crate::models::bids::Entity::delete_many()
                .filter(crate::models::bids::Column::HaulerId.eq(user_id))
                .exec(txn)
                .await?;

            let result = users::Entity::delete_by_id(user_id).exec(txn).await?;
            if result.rows_affected == 0 {
                return Err(ApiError::not_found("User"));
            }
            Ok(())
        })
    })
    .await
    .map_err(ApiError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn exec_ok(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    #[tokio::test]
    async fn hauler_deletion_clears_quotes_on_terminal_jobs_too() {
        // One in-flight job to reset, one completed job whose quote must be
        // cleared alongside the hauler reference, their bids, the user row.
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(1), exec_ok(1), exec_ok(3), exec_ok(1)])
            .into_connection();

        delete_user_cascading(&db, Uuid::new_v4()).await.unwrap();

        let log = format!("{:?}", db.into_transaction_log()).replace("\\\"", "\"");
        // Both the in-flight reset and the terminal-job cleanup run as jobs
        // updates inside the same transaction.
        assert_eq!(log.matches(r#"UPDATE "jobs""#).count(), 2);
        assert_eq!(log.matches("accepted_quote").count(), 2);
        assert!(log.contains(r#"DELETE FROM "bids""#));
        assert!(log.contains(r#"DELETE FROM "users""#));
    }

    #[tokio::test]
    async fn deleting_a_missing_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([exec_ok(0), exec_ok(0), exec_ok(0), exec_ok(0)])
            .into_connection();

        let err = delete_user_cascading(&db, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
