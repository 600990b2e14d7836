//! Reservation entity

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub tourist_id: String,
    pub cottage_id: String,

    /// Check-in instant (UTC)
    pub start_date: DateTimeUtc,
    /// Check-out instant (UTC)
    pub end_date: DateTimeUtc,

    /// Reservation status: unresolved, approved, denied, canceled
    pub status: String,

    #[sea_orm(nullable)]
    pub deny_comment: Option<String>,

    pub is_reviewed: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::cottage::Entity",
        from = "Column::CottageId",
        to = "super::cottage::Column::Id"
    )]
    Cottage,
}

impl Related<super::cottage::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Cottage.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
