//! Repository functions: adapters plus domain error mapping and aggregate
//! read/write orchestration. Everything is generic over `ConnectionTrait`.

pub mod games;
pub mod invites;
pub mod memberships;
pub mod reader;
pub mod templates;
pub mod users;
pub mod writer;
