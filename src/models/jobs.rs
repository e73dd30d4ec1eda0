use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Job lifecycle status stored as a lowercase string in the database.
///
/// `open` and `bidding` allow the same actions; the split is informational
/// (a `bidding` job has at least one bid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "open")]
    Open,
    #[sea_orm(string_value = "bidding")]
    Bidding,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "deposit_paid")]
    DepositPaid,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl Status {
    /// Bids may be submitted and accepted while the job is open or bidding.
    pub fn accepts_bids(&self) -> bool {
        matches!(self, Status::Open | Status::Bidding)
    }

    /// A customer may cancel only before a bid has been accepted.
    pub fn can_cancel(&self) -> bool {
        self.accepts_bids()
    }

    pub fn can_mark_deposit_paid(&self) -> bool {
        matches!(self, Status::Accepted)
    }

    pub fn can_complete(&self) -> bool {
        matches!(self, Status::DepositPaid)
    }

    pub fn can_review(&self) -> bool {
        matches!(self, Status::Completed)
    }

    /// Photos may be attached until the job reaches a terminal state.
    pub fn photos_attachable(&self) -> bool {
        matches!(
            self,
            Status::Open | Status::Bidding | Status::Accepted | Status::DepositPaid
        )
    }

    /// The pickup address is shown to the accepted hauler only once the
    /// deposit has been paid.
    pub fn address_visible_to_hauler(&self) -> bool {
        matches!(self, Status::DepositPaid | Status::Completed)
    }

    /// The accepted hauler documents the pickup site with before/after
    /// photos once the job is underway.
    pub fn completion_photos_attachable(&self) -> bool {
        matches!(self, Status::DepositPaid | Status::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Open => "open",
            Status::Bidding => "bidding",
            Status::Accepted => "accepted",
            Status::DepositPaid => "deposit_paid",
            Status::Completed => "completed",
            Status::Cancelled => "cancelled",
        }
    }
}

/// SeaORM entity for the `jobs` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "jobs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub customer_id: Uuid,
    pub pickup_address: String,
    pub pickup_zip: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub status: Status,
    pub accepted_hauler_id: Option<Uuid>,
    #[sea_orm(column_type = "Double", nullable)]
    pub accepted_quote: Option<f64>,
    pub deposit_paid: bool,
    pub completed_at: Option<DateTimeUtc>,
    pub cancelled_at: Option<DateTimeUtc>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CustomerId",
        to = "super::users::Column::Id"
    )]
    Customer,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AcceptedHaulerId",
        to = "super::users::Column::Id"
    )]
    AcceptedHauler,
    #[sea_orm(has_many = "super::bids::Entity")]
    Bids,
    #[sea_orm(has_many = "super::job_photos::Entity")]
    Photos,
    #[sea_orm(has_many = "super::completion_photos::Entity")]
    CompletionPhotos,
}

impl Related<super::bids::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bids.def()
    }
}

impl Related<super::job_photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl Related<super::completion_photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CompletionPhotos.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Body for `POST /api/jobs`. Photo entries are stable references handed
/// back by the external photo store; the binary never passes through here.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateJob {
    pub pickup_address: String,
    pub pickup_zip: String,
    pub description: String,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Body for `POST /api/jobs/{id}/photos`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachPhotos {
    pub photos: Vec<String>,
}

/// A job as rendered to a hauler. The pickup address is redacted (ZIP only)
/// unless this hauler is the accepted hauler and the deposit has been paid.
#[derive(Debug, Clone, Serialize)]
pub struct HaulerJobView {
    pub id: Uuid,
    pub pickup_zip: String,
    pub pickup_address: Option<String>,
    pub description: String,
    pub preferred_date: Option<String>,
    pub preferred_time: Option<String>,
    pub status: Status,
    pub accepted_quote: Option<f64>,
    pub distance_miles: Option<f64>,
    pub created_at: DateTimeUtc,
}

impl HaulerJobView {
    pub fn redacted_for(job: Model, hauler_id: Uuid, distance_miles: Option<f64>) -> Self {
        let address_unlocked = job.accepted_hauler_id == Some(hauler_id)
            && job.status.address_visible_to_hauler();
        Self {
            id: job.id,
            pickup_zip: job.pickup_zip,
            pickup_address: address_unlocked.then_some(job.pickup_address),
            description: job.description,
            preferred_date: job.preferred_date,
            preferred_time: job.preferred_time,
            status: job.status,
            accepted_quote: job.accepted_quote,
            distance_miles,
            created_at: job.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn bids_allowed_only_while_open_or_bidding() {
        assert!(Status::Open.accepts_bids());
        assert!(Status::Bidding.accepts_bids());
        assert!(!Status::Accepted.accepts_bids());
        assert!(!Status::DepositPaid.accepts_bids());
        assert!(!Status::Completed.accepts_bids());
        assert!(!Status::Cancelled.accepts_bids());
    }

    #[test]
    fn deposit_only_from_accepted() {
        assert!(Status::Accepted.can_mark_deposit_paid());
        for s in [
            Status::Open,
            Status::Bidding,
            Status::DepositPaid,
            Status::Completed,
            Status::Cancelled,
        ] {
            assert!(!s.can_mark_deposit_paid(), "{s:?}");
        }
    }

    #[test]
    fn complete_only_from_deposit_paid() {
        assert!(Status::DepositPaid.can_complete());
        for s in [
            Status::Open,
            Status::Bidding,
            Status::Accepted,
            Status::Completed,
            Status::Cancelled,
        ] {
            assert!(!s.can_complete(), "{s:?}");
        }
    }

    #[test]
    fn completion_photos_only_after_deposit() {
        assert!(Status::DepositPaid.completion_photos_attachable());
        assert!(Status::Completed.completion_photos_attachable());
        for s in [Status::Open, Status::Bidding, Status::Accepted, Status::Cancelled] {
            assert!(!s.completion_photos_attachable(), "{s:?}");
        }
    }

    #[test]
    fn cancel_only_before_acceptance() {
        assert!(Status::Open.can_cancel());
        assert!(Status::Bidding.can_cancel());
        assert!(!Status::Accepted.can_cancel());
        assert!(!Status::DepositPaid.can_cancel());
    }

    fn job(status: Status, hauler: Option<Uuid>) -> Model {
        Model {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            pickup_address: "123 Main St, St Paul".to_string(),
            pickup_zip: "55101".to_string(),
            description: "old couch and boxes".to_string(),
            preferred_date: None,
            preferred_time: None,
            status,
            accepted_hauler_id: hauler,
            accepted_quote: hauler.map(|_| 80.0),
            deposit_paid: status == Status::DepositPaid,
            completed_at: None,
            cancelled_at: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn address_hidden_until_deposit_paid() {
        let hauler = Uuid::new_v4();
        let view = HaulerJobView::redacted_for(job(Status::Accepted, Some(hauler)), hauler, None);
        assert!(view.pickup_address.is_none());

        let view = HaulerJobView::redacted_for(job(Status::DepositPaid, Some(hauler)), hauler, None);
        assert_eq!(view.pickup_address.as_deref(), Some("123 Main St, St Paul"));
    }

    #[test]
    fn address_hidden_from_other_haulers() {
        let accepted = Uuid::new_v4();
        let other = Uuid::new_v4();
        let view = HaulerJobView::redacted_for(job(Status::DepositPaid, Some(accepted)), other, None);
        assert!(view.pickup_address.is_none());
        // ZIP stays visible for distance context
        assert_eq!(view.pickup_zip, "55101");
    }
}
