pub mod answers;
pub mod game_invites;
pub mod game_templates;
pub mod game_users;
pub mod games;
pub mod questions;
pub mod rounds;
pub mod template_questions;
pub mod template_rounds;
pub mod template_themes;
pub mod themes;
pub mod users;

pub use answers::Entity as Answers;
pub use answers::Model as Answer;
pub use game_invites::Entity as GameInvites;
pub use game_invites::InviteStatus;
pub use game_invites::Model as GameInvite;
pub use game_templates::Entity as GameTemplates;
pub use game_templates::Model as GameTemplate;
pub use game_users::Entity as GameUsers;
pub use game_users::Model as GameUser;
pub use games::Entity as Games;
pub use games::Model as Game;
pub use questions::Entity as Questions;
pub use questions::Model as Question;
pub use rounds::Entity as Rounds;
pub use rounds::Model as Round;
pub use template_questions::Entity as TemplateQuestions;
pub use template_questions::Model as TemplateQuestion;
pub use template_rounds::Entity as TemplateRounds;
pub use template_rounds::Model as TemplateRound;
pub use template_themes::Entity as TemplateThemes;
pub use template_themes::Model as TemplateTheme;
pub use themes::Entity as Themes;
pub use themes::Model as Theme;
pub use users::Entity as Users;
pub use users::Model as User;
