//! Application Layer
//!
//! Use cases and application services.

pub mod config;
pub mod current_user;
pub mod login;
pub mod logout;
pub mod messages;
pub mod user_store;

// Re-exports
pub use config::GatewayConfig;
pub use current_user::{CurrentUser, CurrentUserUseCase};
pub use login::{LoginInput, LoginOutcome, LoginUseCase};
pub use logout::{LogoutOutcome, LogoutUseCase};
pub use messages::MessageCatalog;
pub use user_store::UserStore;
