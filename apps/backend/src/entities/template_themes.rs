use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template_themes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "round_id")]
    pub round_id: Uuid,
    pub name: String,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::template_rounds::Entity",
        from = "Column::RoundId",
        to = "super::template_rounds::Column::Id"
    )]
    Round,
    #[sea_orm(has_many = "super::template_questions::Entity")]
    TemplateQuestions,
}

impl Related<super::template_rounds::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Round.def()
    }
}

impl Related<super::template_questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateQuestions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
