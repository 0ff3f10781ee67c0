use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "game")]
pub struct Model {
    /// The public 6-character join code.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub status: String,
    pub moderator_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::player::Entity")]
    Players,
    #[sea_orm(has_many = "super::game_role::Entity")]
    GameRoles,
}

impl Related<super::player::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl Related<super::game_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
