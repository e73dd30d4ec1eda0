use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a completion photo documents the pickup site before or after the
/// haul.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "snake_case")]
pub enum PhotoType {
    #[sea_orm(string_value = "before")]
    Before,
    #[sea_orm(string_value = "after")]
    After,
}

/// SeaORM entity for the `completion_photos` table. Before/after photos the
/// accepted hauler attaches while working the job; `filename` is the stable
/// reference returned by the external photo store.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "completion_photos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub job_id: Uuid,
    pub filename: String,
    pub photo_type: PhotoType,
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
}

impl Related<super::jobs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Job.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// One entry in the `POST /api/jobs/{id}/completion-photos` body.
#[derive(Debug, Clone, Deserialize)]
pub struct CompletionPhotoInput {
    pub filename: String,
    pub photo_type: PhotoType,
}

/// Body for `POST /api/jobs/{id}/completion-photos`.
#[derive(Debug, Clone, Deserialize)]
pub struct AttachCompletionPhotos {
    pub photos: Vec<CompletionPhotoInput>,
}
