use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Bid status stored as a lowercase string in the database.
///
/// At most one bid per job is `accepted`; accepting one bid rejects every
/// sibling in the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// SeaORM entity for the `bids` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bids")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub hauler_id: Uuid,
    #[sea_orm(column_type = "Double")]
    pub quote_amount: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub message: Option<String>,
    pub status: Status,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::jobs::Entity",
        from = "Column::JobId",
        to = "super::jobs::Column::Id"
    )]
    Job,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::HaulerId",
        to = "super::users::Column::Id"
    )]
    Hauler,
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hauler.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Order bids for display: cheapest quote first, ties broken by submission
/// time (earlier first).
pub fn ranked(mut bids: Vec<Model>) -> Vec<Model> {
    bids.sort_by(|a, b| {
        a.quote_amount
            .partial_cmp(&b.quote_amount)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
    bids
}

// ── DTOs ──

/// Body for `POST /api/jobs/{id}/bids`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitBid {
    pub quote_amount: f64,
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn bid(quote: f64, offset_secs: i64) -> Model {
        Model {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            hauler_id: Uuid::new_v4(),
            quote_amount: quote,
            message: None,
            status: Status::Active,
            created_at: Utc::now() + Duration::seconds(offset_secs),
        }
    }

    #[test]
    fn lowest_quote_ranks_first() {
        let ranked = ranked(vec![bid(100.0, 0), bid(80.0, 10)]);
        assert_eq!(ranked[0].quote_amount, 80.0);
        assert_eq!(ranked[1].quote_amount, 100.0);
    }

    #[test]
    fn ties_break_by_submission_order() {
        let early = bid(90.0, 0);
        let late = bid(90.0, 60);
        let early_id = early.id;
        let ranked = ranked(vec![late, early]);
        assert_eq!(ranked[0].id, early_id);
    }
}
