//! Template repository functions: root lookups, delete and counts.
//!
//! Whole-tree reads and writes live in `reader` and `writer`.

use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::adapters::templates_sea as templates_adapter;
use crate::entities::game_templates;
use crate::errors::domain::{DomainError, NotFoundKind};

/// Template root without its tree; enough for access checks.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRoot {
    pub id: Uuid,
    pub creator_id: Uuid,
    pub name: String,
    pub is_public: bool,
    pub created_at: time::OffsetDateTime,
}

impl From<game_templates::Model> for TemplateRoot {
    fn from(m: game_templates::Model) -> Self {
        Self {
            id: m.id,
            creator_id: m.creator_id,
            name: m.name,
            is_public: m.is_public,
            created_at: m.created_at,
        }
    }
}

impl TemplateRoot {
    /// Public templates are readable by anyone; private ones by their creator.
    pub fn visible_to(&self, user_id: Uuid) -> bool {
        self.is_public || self.creator_id == user_id
    }
}

pub async fn find_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
) -> Result<Option<TemplateRoot>, DomainError> {
    let template = templates_adapter::find_by_id(conn, template_id).await?;
    Ok(template.map(TemplateRoot::from))
}

pub async fn require_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
) -> Result<TemplateRoot, DomainError> {
    find_template(conn, template_id).await?.ok_or_else(|| {
        DomainError::not_found(
            NotFoundKind::Template,
            format!("Template {template_id} not found"),
        )
    })
}

/// Delete the template and its tree. Games cloned from it keep their own
/// copy and lose only the back-reference.
pub async fn delete_template<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    template_id: Uuid,
) -> Result<(), DomainError> {
    if templates_adapter::delete_template(conn, template_id).await? == 0 {
        return Err(DomainError::not_found(
            NotFoundKind::Template,
            format!("Template {template_id} not found"),
        ));
    }
    Ok(())
}

pub async fn count_public<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(templates_adapter::count_public(conn).await?)
}

pub async fn count_by_creator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    creator_id: Uuid,
) -> Result<u64, DomainError> {
    Ok(templates_adapter::count_by_creator(conn, creator_id).await?)
}
