use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// The `current_*` pointers carry no foreign key: they may reference rows
/// inserted later in the same transaction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "creator_id")]
    pub creator_id: Uuid,
    #[sea_orm(column_name = "template_id")]
    pub template_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_name = "is_finished")]
    pub is_finished: bool,
    #[sea_orm(column_name = "winner_id")]
    pub winner_id: Option<Uuid>,
    #[sea_orm(column_name = "finish_date")]
    pub finish_date: Option<OffsetDateTime>,
    #[sea_orm(column_name = "current_round_id")]
    pub current_round_id: Option<Uuid>,
    #[sea_orm(column_name = "current_question_id")]
    pub current_question_id: Option<Uuid>,
    #[sea_orm(column_name = "current_user_id")]
    pub current_user_id: Option<Uuid>,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatorId",
        to = "super::users::Column::Id"
    )]
    Creator,
    #[sea_orm(
        belongs_to = "super::game_templates::Entity",
        from = "Column::TemplateId",
        to = "super::game_templates::Column::Id"
    )]
    Template,
    #[sea_orm(has_many = "super::rounds::Entity")]
    Rounds,
    #[sea_orm(has_many = "super::game_users::Entity")]
    GameUsers,
    #[sea_orm(has_many = "super::game_invites::Entity")]
    GameInvites,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Creator.def()
    }
}

impl Related<super::game_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rounds.def()
    }
}

impl Related<super::game_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameUsers.def()
    }
}

impl Related<super::game_invites::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GameInvites.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
