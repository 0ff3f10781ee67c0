use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
    pub team: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// `Some(1)` for unique roles, `Some(n)` for capped pool roles, `None` for unlimited.
    pub max_per_game: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_role::Entity")]
    GameRoles,
}

impl Related<super::game_role::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameRoles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
