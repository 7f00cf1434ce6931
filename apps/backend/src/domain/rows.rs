//! Flat relational row bundles produced by the mappers and consumed by the writer.

use uuid::Uuid;

use crate::domain::grouped::Grouped;
use crate::entities::{
    answers, game_templates, game_users, games, questions, rounds, template_questions,
    template_rounds, template_themes, themes,
};

/// A template and its whole tree, ready for insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateRows {
    pub template: game_templates::Model,
    pub rounds: Vec<template_rounds::Model>,
    pub themes_by_round: Grouped<Uuid, template_themes::Model>,
    pub questions_by_theme: Grouped<Uuid, template_questions::Model>,
}

/// A game, its private tree, participants and any answers already recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRows {
    pub game: games::Model,
    pub rounds: Vec<rounds::Model>,
    pub themes_by_round: Grouped<Uuid, themes::Model>,
    pub questions_by_theme: Grouped<Uuid, questions::Model>,
    /// Invitees in payload order; the creator is always first.
    pub participants: Vec<Uuid>,
    pub answers: Vec<answers::Model>,
}

/// Mutable fields of a game row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameUpdate {
    pub id: Uuid,
    pub name: String,
    pub current_round_id: Option<Uuid>,
    pub current_question_id: Option<Uuid>,
    pub current_user_id: Option<Uuid>,
    pub winner_id: Option<Uuid>,
    pub is_finished: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameUpdateRows {
    pub game: GameUpdate,
    pub game_users: Vec<game_users::Model>,
    pub answers: Vec<answers::Model>,
}
