//! Value Object Module

pub mod flash;
pub mod login;
pub mod remember_me;
pub mod remember_token;

pub use kernel::id::{SessionId, UserId};
