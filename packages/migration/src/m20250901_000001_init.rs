use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    IsAdmin,
    CreatedAt,
}

#[derive(Iden)]
enum GameTemplates {
    Table,
    Id,
    CreatorId,
    Name,
    Description,
    IsPublic,
    CreatedAt,
}

#[derive(Iden)]
enum TemplateRounds {
    Table,
    Id,
    TemplateId,
    Name,
    TimeSettings,
    RankSettings,
    Position,
}

#[derive(Iden)]
enum TemplateThemes {
    Table,
    Id,
    RoundId,
    Name,
    Position,
}

#[derive(Iden)]
enum TemplateQuestions {
    Table,
    Id,
    ThemeId,
    Text,
    Answer,
    Points,
    Position,
}

#[derive(Iden)]
enum Games {
    Table,
    Id,
    CreatorId,
    TemplateId,
    Name,
    IsFinished,
    WinnerId,
    FinishDate,
    CurrentRoundId,
    CurrentQuestionId,
    CurrentUserId,
    CreatedAt,
}

#[derive(Iden)]
enum Rounds {
    Table,
    Id,
    GameId,
    Name,
    TimeSettings,
    RankSettings,
    Position,
}

#[derive(Iden)]
enum Themes {
    Table,
    Id,
    RoundId,
    Name,
    Position,
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    ThemeId,
    Text,
    Answer,
    Points,
    Position,
}

#[derive(Iden)]
enum GameUsers {
    Table,
    GameId,
    UserId,
    RoundScore,
}

#[derive(Iden)]
enum GameInvites {
    Table,
    Id,
    GameId,
    UserId,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Answers {
    Table,
    QuestionId,
    UserId,
    IsCorrect,
    TimeAnswered,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Users::Name).string_len(32).not_null())
                    .col(ColumnDef::new(Users::Email).string().not_null())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(
                        ColumnDef::new(Users::IsAdmin)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Constraint names are matched by the backend's unique-violation mapping.
        manager
            .create_index(
                Index::create()
                    .name("ux_users_email")
                    .table(Users::Table)
                    .col(Users::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_users_name")
                    .table(Users::Table)
                    .col(Users::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // game_templates
        manager
            .create_table(
                Table::create()
                    .table(GameTemplates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameTemplates::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameTemplates::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(GameTemplates::Name).string().not_null())
                    .col(
                        ColumnDef::new(GameTemplates::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(GameTemplates::IsPublic)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(GameTemplates::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_templates_creator_id")
                            .from(GameTemplates::Table, GameTemplates::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_templates_creator_id")
                    .table(GameTemplates::Table)
                    .col(GameTemplates::CreatorId)
                    .to_owned(),
            )
            .await?;

        // template_rounds
        manager
            .create_table(
                Table::create()
                    .table(TemplateRounds::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TemplateRounds::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TemplateRounds::TemplateId).uuid().not_null())
                    .col(ColumnDef::new(TemplateRounds::Name).string().not_null())
                    .col(
                        ColumnDef::new(TemplateRounds::TimeSettings)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemplateRounds::RankSettings)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemplateRounds::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_rounds_template_id")
                            .from(TemplateRounds::Table, TemplateRounds::TemplateId)
                            .to(GameTemplates::Table, GameTemplates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_template_rounds_template_id")
                    .table(TemplateRounds::Table)
                    .col(TemplateRounds::TemplateId)
                    .to_owned(),
            )
            .await?;

        // template_themes
        manager
            .create_table(
                Table::create()
                    .table(TemplateThemes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TemplateThemes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TemplateThemes::RoundId).uuid().not_null())
                    .col(ColumnDef::new(TemplateThemes::Name).string().not_null())
                    .col(
                        ColumnDef::new(TemplateThemes::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_themes_round_id")
                            .from(TemplateThemes::Table, TemplateThemes::RoundId)
                            .to(TemplateRounds::Table, TemplateRounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_template_themes_round_id")
                    .table(TemplateThemes::Table)
                    .col(TemplateThemes::RoundId)
                    .to_owned(),
            )
            .await?;

        // template_questions
        manager
            .create_table(
                Table::create()
                    .table(TemplateQuestions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TemplateQuestions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TemplateQuestions::ThemeId).uuid().not_null())
                    .col(ColumnDef::new(TemplateQuestions::Text).text().not_null())
                    .col(ColumnDef::new(TemplateQuestions::Answer).text().not_null())
                    .col(
                        ColumnDef::new(TemplateQuestions::Points)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TemplateQuestions::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_template_questions_theme_id")
                            .from(TemplateQuestions::Table, TemplateQuestions::ThemeId)
                            .to(TemplateThemes::Table, TemplateThemes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_template_questions_theme_id")
                    .table(TemplateQuestions::Table)
                    .col(TemplateQuestions::ThemeId)
                    .to_owned(),
            )
            .await?;

        // games
        // current_* pointers carry no foreign keys: a creation payload may point
        // at rounds that are inserted later in the same transaction.
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Games::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Games::CreatorId).uuid().not_null())
                    .col(ColumnDef::new(Games::TemplateId).uuid().null())
                    .col(ColumnDef::new(Games::Name).string().not_null())
                    .col(
                        ColumnDef::new(Games::IsFinished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Games::WinnerId).uuid().null())
                    .col(
                        ColumnDef::new(Games::FinishDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Games::CurrentRoundId).uuid().null())
                    .col(ColumnDef::new(Games::CurrentQuestionId).uuid().null())
                    .col(ColumnDef::new(Games::CurrentUserId).uuid().null())
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_creator_id")
                            .from(Games::Table, Games::CreatorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_template_id")
                            .from(Games::Table, Games::TemplateId)
                            .to(GameTemplates::Table, GameTemplates::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_games_winner_id")
                            .from(Games::Table, Games::WinnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_games_creator_id")
                    .table(Games::Table)
                    .col(Games::CreatorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_games_created_at")
                    .table(Games::Table)
                    .col(Games::CreatedAt)
                    .to_owned(),
            )
            .await?;

        // rounds
        manager
            .create_table(
                Table::create()
                    .table(Rounds::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Rounds::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Rounds::GameId).uuid().not_null())
                    .col(ColumnDef::new(Rounds::Name).string().not_null())
                    .col(ColumnDef::new(Rounds::TimeSettings).json_binary().not_null())
                    .col(ColumnDef::new(Rounds::RankSettings).json_binary().not_null())
                    .col(
                        ColumnDef::new(Rounds::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rounds_game_id")
                            .from(Rounds::Table, Rounds::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rounds_game_id")
                    .table(Rounds::Table)
                    .col(Rounds::GameId)
                    .to_owned(),
            )
            .await?;

        // themes
        manager
            .create_table(
                Table::create()
                    .table(Themes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Themes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Themes::RoundId).uuid().not_null())
                    .col(ColumnDef::new(Themes::Name).string().not_null())
                    .col(
                        ColumnDef::new(Themes::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_themes_round_id")
                            .from(Themes::Table, Themes::RoundId)
                            .to(Rounds::Table, Rounds::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_themes_round_id")
                    .table(Themes::Table)
                    .col(Themes::RoundId)
                    .to_owned(),
            )
            .await?;

        // questions
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Questions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Questions::ThemeId).uuid().not_null())
                    .col(ColumnDef::new(Questions::Text).text().not_null())
                    .col(ColumnDef::new(Questions::Answer).text().not_null())
                    .col(ColumnDef::new(Questions::Points).integer().not_null())
                    .col(
                        ColumnDef::new(Questions::Position)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_questions_theme_id")
                            .from(Questions::Table, Questions::ThemeId)
                            .to(Themes::Table, Themes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_questions_theme_id")
                    .table(Questions::Table)
                    .col(Questions::ThemeId)
                    .to_owned(),
            )
            .await?;

        // game_users - one membership row per participant per game
        manager
            .create_table(
                Table::create()
                    .table(GameUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(GameUsers::GameId).uuid().not_null())
                    .col(ColumnDef::new(GameUsers::UserId).uuid().not_null())
                    .col(ColumnDef::new(GameUsers::RoundScore).json_binary().not_null())
                    .primary_key(
                        Index::create()
                            .name("pk_game_users")
                            .col(GameUsers::GameId)
                            .col(GameUsers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_users_game_id")
                            .from(GameUsers::Table, GameUsers::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_users_user_id")
                            .from(GameUsers::Table, GameUsers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_users_user_id")
                    .table(GameUsers::Table)
                    .col(GameUsers::UserId)
                    .to_owned(),
            )
            .await?;

        // game_invites
        manager
            .create_table(
                Table::create()
                    .table(GameInvites::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(GameInvites::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(GameInvites::GameId).uuid().not_null())
                    .col(ColumnDef::new(GameInvites::UserId).uuid().not_null())
                    .col(ColumnDef::new(GameInvites::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(GameInvites::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(GameInvites::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_invites_game_id")
                            .from(GameInvites::Table, GameInvites::GameId)
                            .to(Games::Table, Games::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_game_invites_user_id")
                            .from(GameInvites::Table, GameInvites::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ux_game_invites_game_user")
                    .table(GameInvites::Table)
                    .col(GameInvites::GameId)
                    .col(GameInvites::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_game_invites_user_id")
                    .table(GameInvites::Table)
                    .col(GameInvites::UserId)
                    .to_owned(),
            )
            .await?;

        // answers - one row per (question, user); re-submissions upsert
        manager
            .create_table(
                Table::create()
                    .table(Answers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Answers::QuestionId).uuid().not_null())
                    .col(ColumnDef::new(Answers::UserId).uuid().not_null())
                    .col(ColumnDef::new(Answers::IsCorrect).boolean().not_null())
                    .col(
                        ColumnDef::new(Answers::TimeAnswered)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_answers")
                            .col(Answers::QuestionId)
                            .col(Answers::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_question_id")
                            .from(Answers::Table, Answers::QuestionId)
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_answers_user_id")
                            .from(Answers::Table, Answers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents; indexes go with their tables.
        manager
            .drop_table(Table::drop().table(Answers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameInvites::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(GameUsers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Questions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Themes::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Rounds::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Games::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TemplateQuestions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TemplateThemes::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(TemplateRounds::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(GameTemplates::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).if_exists().to_owned())
            .await?;

        Ok(())
    }
}
