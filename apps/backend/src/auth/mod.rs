//! Session tokens, password digests and session cookies.

pub mod cookies;
pub mod jwt;
pub mod password;
