use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// `time_settings` / `rank_settings` hold raw JSON; decoding lives in
/// `crate::domain::settings` so a corrupt blob degrades to defaults.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template_rounds")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_name = "template_id")]
    pub template_id: Uuid,
    pub name: String,
    #[sea_orm(column_name = "time_settings", column_type = "JsonBinary")]
    pub time_settings: Json,
    #[sea_orm(column_name = "rank_settings", column_type = "JsonBinary")]
    pub rank_settings: Json,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::game_templates::Entity",
        from = "Column::TemplateId",
        to = "super::game_templates::Column::Id"
    )]
    Template,
    #[sea_orm(has_many = "super::template_themes::Entity")]
    TemplateThemes,
}

impl Related<super::game_templates::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Template.def()
    }
}

impl Related<super::template_themes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TemplateThemes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
