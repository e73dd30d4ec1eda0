use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// The `Role` enum maps to a Postgres TEXT column stored as lowercase strings.
///
/// New users start as `Unassigned` and pick `Customer` or `Hauler` exactly
/// once. `Admin` is assigned out of band and bypasses role checks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[sea_orm(string_value = "unassigned")]
    Unassigned,
    #[sea_orm(string_value = "customer")]
    Customer,
    #[sea_orm(string_value = "hauler")]
    Hauler,
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// SeaORM entity for the `users` table.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub home_zip: Option<String>,
    pub max_travel_miles: Option<i32>,
    pub notify_new_jobs: bool,
    pub notify_sms: bool,
    pub agreed_to_hauler_terms: bool,
    pub agreed_to_hauler_terms_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// The effective access-control state of a user, derived from the stored row.
///
/// A hauler only becomes `HaulerActive` once the one-time setup (display
/// name, home ZIP, travel radius, hauler terms agreement) is complete; until
/// then every hauler-role operation except the setup call itself is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleState {
    Unassigned,
    Customer,
    HaulerPendingSetup,
    HaulerActive,
    Admin,
}

impl Model {
    pub fn role_state(&self) -> RoleState {
        match self.role {
            Role::Unassigned => RoleState::Unassigned,
            Role::Customer => RoleState::Customer,
            Role::Admin => RoleState::Admin,
            Role::Hauler => {
                if self.home_zip.is_some()
                    && self.max_travel_miles.is_some()
                    && self.display_name.is_some()
                    && self.agreed_to_hauler_terms
                {
                    RoleState::HaulerActive
                } else {
                    RoleState::HaulerPendingSetup
                }
            }
        }
    }
}

// ── DTOs (not stored in DB, used for request bodies) ──

/// Used internally by the auth middleware to create a user from JWT claims.
#[derive(Debug, Clone)]
pub struct CreateUserFromAuth {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

/// Body for `POST /api/auth/choose-role`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChooseRole {
    pub role: Role,
}

/// Body for `PUT /api/auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProfile {
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub notify_new_jobs: Option<bool>,
    pub notify_sms: Option<bool>,
}

/// Body for `POST /api/hauler/setup`. Setup is refused until the hauler
/// terms are agreed to.
#[derive(Debug, Clone, Deserialize)]
pub struct HaulerSetup {
    pub display_name: String,
    pub home_zip: String,
    pub max_travel_miles: i32,
    #[serde(default)]
    pub agree_to_terms: bool,
}

/// A safe user representation for API responses (never leaks internal fields).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: Option<String>,
    pub phone: Option<String>,
    pub role: Role,
    pub home_zip: Option<String>,
    pub max_travel_miles: Option<i32>,
    pub notify_new_jobs: bool,
    pub notify_sms: bool,
    pub agreed_to_hauler_terms: bool,
    pub created_at: DateTimeUtc,
}

impl From<Model> for UserResponse {
    fn from(m: Model) -> Self {
        Self {
            id: m.id,
            email: m.email,
            display_name: m.display_name,
            phone: m.phone,
            role: m.role,
            home_zip: m.home_zip,
            max_travel_miles: m.max_travel_miles,
            notify_new_jobs: m.notify_new_jobs,
            notify_sms: m.notify_sms,
            agreed_to_hauler_terms: m.agreed_to_hauler_terms,
            created_at: m.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn user(role: Role) -> Model {
        Model {
            id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            display_name: None,
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

    #[test]
    fn hauler_without_setup_is_pending() {
        let u = user(Role::Hauler);
        assert_eq!(u.role_state(), RoleState::HaulerPendingSetup);
    }

    #[test]
    fn hauler_with_partial_setup_is_still_pending() {
        let mut u = user(Role::Hauler);
        u.home_zip = Some("55101".to_string());
        u.max_travel_miles = Some(20);
        // display name still missing
        assert_eq!(u.role_state(), RoleState::HaulerPendingSetup);
    }

    #[test]
    fn hauler_with_complete_setup_is_active() {
        let mut u = user(Role::Hauler);
        u.home_zip = Some("55101".to_string());
        u.max_travel_miles = Some(20);
        u.display_name = Some("Twin Cities Hauling".to_string());
        u.agreed_to_hauler_terms = true;
        assert_eq!(u.role_state(), RoleState::HaulerActive);
    }

    #[test]
    fn hauler_without_terms_agreement_stays_pending() {
        let mut u = user(Role::Hauler);
        u.home_zip = Some("55101".to_string());
        u.max_travel_miles = Some(20);
        u.display_name = Some("Twin Cities Hauling".to_string());
        assert_eq!(u.role_state(), RoleState::HaulerPendingSetup);
    }

    #[test]
    fn non_hauler_roles_map_directly() {
        assert_eq!(user(Role::Unassigned).role_state(), RoleState::Unassigned);
        assert_eq!(user(Role::Customer).role_state(), RoleState::Customer);
        assert_eq!(user(Role::Admin).role_state(), RoleState::Admin);
    }
}
