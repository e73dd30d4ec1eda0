//! Role and ownership gates applied to every lifecycle-mutating operation.
//!
//! Admins bypass role checks but cross-tenant ownership is still enforced
//! for non-admin callers regardless of role.

use crate::error::ApiError;
use crate::models::jobs;
use crate::models::users::{self, RoleState};

/// Caller must be a customer (admins pass).
pub fn require_customer(user: &users::Model) -> Result<(), ApiError> {
    match user.role_state() {
        RoleState::Customer | RoleState::Admin => Ok(()),
        _ => Err(ApiError::AccessDenied),
    }
}

/// Caller must be a hauler with completed setup (admins pass). A hauler who
/// has not finished setup gets a distinct error so clients can route them to
/// the setup flow.
pub fn require_active_hauler(user: &users::Model) -> Result<(), ApiError> {
    match user.role_state() {
        RoleState::HaulerActive | RoleState::Admin => Ok(()),
        RoleState::HaulerPendingSetup => Err(ApiError::HaulerSetupRequired),
        _ => Err(ApiError::AccessDenied),
    }
}

/// Caller must hold the hauler role; setup completion is not required.
/// Used only by the setup operation itself.
pub fn require_hauler_role(user: &users::Model) -> Result<(), ApiError> {
    match user.role_state() {
        RoleState::HaulerActive | RoleState::HaulerPendingSetup | RoleState::Admin => Ok(()),
        _ => Err(ApiError::AccessDenied),
    }
}

pub fn require_admin(user: &users::Model) -> Result<(), ApiError> {
    match user.role_state() {
        RoleState::Admin => Ok(()),
        _ => Err(ApiError::AccessDenied),
    }
}

/// Job-scoped operations: caller must own the job (admins pass).
pub fn require_job_owner(job: &jobs::Model, user: &users::Model) -> Result<(), ApiError> {
    if job.customer_id == user.id || user.role_state() == RoleState::Admin {
        Ok(())
    } else {
        Err(ApiError::AccessDenied)
    }
}

/// Hauler-side job operations: caller must be the job's accepted hauler
/// (admins pass).
pub fn require_accepted_hauler(job: &jobs::Model, user: &users::Model) -> Result<(), ApiError> {
    if job.accepted_hauler_id == Some(user.id) || user.role_state() == RoleState::Admin {
        Ok(())
    } else {
        Err(ApiError::AccessDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::Role;
    use uuid::Uuid;

    fn user(role: Role) -> users::Model {
        users::Model {
            id: Uuid::new_v4(),
            email: "x@example.com".to_string(),
            display_name: Some("X".to_string()),
            avatar_url: None,
            phone: None,
            role,
            home_zip: None,
            max_travel_miles: None,
            notify_new_jobs: true,
            notify_sms: false,
            agreed_to_hauler_terms: false,
            agreed_to_hauler_terms_at: None,
            created_at: chrono::Utc::now(),
            updated_at: None,
        }
    }

    fn active_hauler() -> users::Model {
        let mut u = user(Role::Hauler);
        u.home_zip = Some("55101".to_string());
        u.max_travel_miles = Some(20);
        u.agreed_to_hauler_terms = true;
        u
    }

    fn job_owned_by(customer_id: Uuid) -> jobs::Model {
        jobs::Model {
            id: Uuid::new_v4(),
            customer_id,
            pickup_address: "addr".to_string(),
            pickup_zip: "55101".to_string(),
            description: "desc".to_string(),
            preferred_date: None,
            preferred_time: None,
            status: jobs::Status::Open,
            accepted_hauler_id: None,
            accepted_quote: None,
            deposit_paid: false,
            completed_at: None,
            cancelled_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn customer_gate_rejects_haulers_and_unassigned() {
        assert!(require_customer(&user(Role::Customer)).is_ok());
        assert!(require_customer(&user(Role::Admin)).is_ok());
        assert!(require_customer(&active_hauler()).is_err());
        assert!(require_customer(&user(Role::Unassigned)).is_err());
    }

    #[test]
    fn hauler_gate_requires_completed_setup() {
        assert!(require_active_hauler(&active_hauler()).is_ok());
        assert!(matches!(
            require_active_hauler(&user(Role::Hauler)),
            Err(ApiError::HaulerSetupRequired)
        ));
        assert!(matches!(
            require_active_hauler(&user(Role::Customer)),
            Err(ApiError::AccessDenied)
        ));
    }

    #[test]
    fn setup_operation_admits_pending_haulers() {
        assert!(require_hauler_role(&user(Role::Hauler)).is_ok());
        assert!(require_hauler_role(&user(Role::Customer)).is_err());
    }

    #[test]
    fn ownership_is_enforced_across_tenants() {
        let owner = user(Role::Customer);
        let stranger = user(Role::Customer);
        let job = job_owned_by(owner.id);
        assert!(require_job_owner(&job, &owner).is_ok());
        assert!(require_job_owner(&job, &stranger).is_err());
    }

    #[test]
    fn admin_bypasses_ownership() {
        let admin = user(Role::Admin);
        let job = job_owned_by(Uuid::new_v4());
        assert!(require_job_owner(&job, &admin).is_ok());
    }

    #[test]
    fn accepted_hauler_gate_rejects_other_haulers() {
        let assigned = active_hauler();
        let other = active_hauler();
        let mut job = job_owned_by(Uuid::new_v4());
        job.status = jobs::Status::DepositPaid;
        job.accepted_hauler_id = Some(assigned.id);

        assert!(require_accepted_hauler(&job, &assigned).is_ok());
        assert!(require_accepted_hauler(&job, &other).is_err());
        assert!(require_accepted_hauler(&job, &user(Role::Admin)).is_ok());
    }

    #[test]
    fn accepted_hauler_gate_rejects_when_unassigned() {
        let hauler = active_hauler();
        let job = job_owned_by(Uuid::new_v4());
        assert!(require_accepted_hauler(&job, &hauler).is_err());
    }
}
