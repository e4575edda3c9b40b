//! Shared Kernel
//!
//! Vocabulary shared by every crate in the workspace:
//! - The unified [`error::app_error::AppError`] and its [`error::kind::ErrorKind`]
//! - Typed identifiers ([`id::Id`])
//!
//! Nothing session- or user-specific lives here; those belong to `gateway`.

pub mod error {
    pub mod app_error;
    pub mod kind;
}
pub mod id;
