//! Template domain service.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use super::games::GameService;
use crate::domain::client::{GameClient, GameTemplateClient};
use crate::domain::filter::TemplateFilter;
use crate::domain::pagination::{Page, PageRequest};
use crate::error::AppError;
use crate::errors::domain::{DomainError, NotFoundKind};
use crate::mappers::{game_from_template, to_create_template};
use crate::repos::templates::{self, TemplateRoot};
use crate::repos::{reader, writer};

/// Template domain service.
pub struct TemplateService;

impl TemplateService {
    pub fn new() -> Self {
        Self
    }

    /// A template the caller may read. Private templates of other users
    /// are reported as missing.
    async fn visible_root<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        template_id: Uuid,
    ) -> Result<TemplateRoot, AppError> {
        let root = templates::require_template(conn, template_id).await?;
        if !root.visible_to(caller) {
            return Err(DomainError::not_found(
                NotFoundKind::Template,
                format!("Template {template_id} not found"),
            )
            .into());
        }
        Ok(root)
    }

    async fn owned_root<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        template_id: Uuid,
    ) -> Result<TemplateRoot, AppError> {
        let root = self.visible_root(conn, caller, template_id).await?;
        if root.creator_id != caller {
            return Err(AppError::forbidden("Only the template creator may change it"));
        }
        Ok(root)
    }

    pub async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        creator: Uuid,
        client: GameTemplateClient,
    ) -> Result<GameTemplateClient, AppError> {
        let rows = to_create_template(&client, creator, OffsetDateTime::now_utc());
        writer::create_template(conn, rows).await?;
        info!(template_id = %client.id, creator_id = %creator, "template created");
        Ok(reader::fetch_template(conn, client.id).await?)
    }

    pub async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        template_id: Uuid,
    ) -> Result<GameTemplateClient, AppError> {
        self.visible_root(conn, caller, template_id).await?;
        Ok(reader::fetch_template(conn, template_id).await?)
    }

    pub async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        filter: TemplateFilter,
        page: &PageRequest,
    ) -> Result<Page<GameTemplateClient>, AppError> {
        Ok(reader::list_templates(conn, filter, page).await?)
    }

    /// Replace the whole tree. The path id wins over any id in the body.
    pub async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        template_id: Uuid,
        mut client: GameTemplateClient,
    ) -> Result<GameTemplateClient, AppError> {
        let root = self.owned_root(conn, caller, template_id).await?;
        client.id = template_id;
        let rows = to_create_template(&client, root.creator_id, root.created_at);
        writer::update_template(conn, rows).await?;
        Ok(reader::fetch_template(conn, template_id).await?)
    }

    pub async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        template_id: Uuid,
    ) -> Result<(), AppError> {
        self.owned_root(conn, caller, template_id).await?;
        templates::delete_template(conn, template_id).await?;
        info!(template_id = %template_id, "template deleted");
        Ok(())
    }

    /// Start a game from a readable template, inviting `invitees`.
    pub async fn create_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        caller: Uuid,
        template_id: Uuid,
        name: Option<String>,
        invitees: &[Uuid],
    ) -> Result<GameClient, AppError> {
        self.visible_root(conn, caller, template_id).await?;
        let template = reader::fetch_template(conn, template_id).await?;
        let game = game_from_template(&template, name, invitees);
        GameService::new().create(conn, caller, game).await
    }
}

impl Default for TemplateService {
    fn default() -> Self {
        Self::new()
    }
}
