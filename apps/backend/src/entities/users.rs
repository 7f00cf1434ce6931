use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    #[sea_orm(column_name = "password_hash")]
    pub password_hash: String,
    #[sea_orm(column_name = "is_admin")]
    pub is_admin: bool,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::game_templates::Entity")]
    GameTemplates,
    #[sea_orm(has_many = "super::game_users::Entity")]
    GameUsers,
}

impl Related<super::game_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameTemplates.def()
    }
}

impl Related<super::game_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameUsers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
