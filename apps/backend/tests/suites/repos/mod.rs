pub mod games;
pub mod invites;
pub mod templates;
