//! Domain services: access rules and orchestration over repos.
//!
//! Services take the connection (normally the request transaction) per
//! call and hold no state of their own.

pub mod counts;
pub mod games;
pub mod invites;
pub mod templates;
pub mod users;

pub use counts::CountService;
pub use games::GameService;
pub use invites::InviteService;
pub use templates::TemplateService;
pub use users::UserService;
