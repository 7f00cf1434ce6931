//! Domain layer: client tree types, flat row bundles and query parameters.

pub mod client;
pub mod filter;
pub mod grouped;
pub mod pagination;
pub mod rows;
pub mod settings;

pub use client::{
    AnsweredByClient, GameClient, GameInviteClient, GameTemplateClient, GameUserClient,
    QuestionClient, RoundClient, SettingOptionClient, ThemeClient, UnconfirmedUserClient,
    UserClient,
};
pub use filter::{GameFilter, TemplateFilter};
pub use grouped::{Grouped, HasParent};
pub use pagination::{Page, PageRequest};
pub use rows::{GameRows, GameUpdate, GameUpdateRows, TemplateRows};
