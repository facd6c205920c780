//! Battery entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "batteries")]
pub struct Model {
    /// Serial number
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub model: String,
    pub capacity_kwh: f64,
    pub state_of_charge: i32,
    pub state_of_health: i32,

    /// Battery status: Ready, Charging, InUse, Maintenance, Retired
    pub status: String,

    #[sea_orm(nullable)]
    pub station_id: Option<i32>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
