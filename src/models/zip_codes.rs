use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// SeaORM entity for the `zip_codes` reference table. Seeded once by the
/// `load_zips` binary and treated as read-only afterwards.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "zip_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub zip: String,
    pub city: Option<String>,
    pub state: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub lat: f64,
    #[sea_orm(column_type = "Double")]
    pub lon: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
