//! Pillar slot entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "pillar_slots")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pillar_id: i32,
    /// Denormalised from the pillar so station-wide slot queries need no join
    pub station_id: i32,
    pub slot_number: i32,

    /// Slot status: Available, Unavailable, Lock, Use
    pub status: String,

    #[sea_orm(nullable, unique)]
    pub battery_id: Option<String>,

    #[sea_orm(nullable)]
    pub appointment_id: Option<i32>,

    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::pillar::Entity",
        from = "Column::PillarId",
        to = "super::pillar::Column::Id"
    )]
    Pillar,
    #[sea_orm(
        belongs_to = "super::battery::Entity",
        from = "Column::BatteryId",
        to = "super::battery::Column::Id"
    )]
    Battery,
}

impl Related<super::pillar::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Pillar.def()
    }
}

impl Related<super::battery::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Battery.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
