//! Session Gateway
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases (login, logout, current user) and the User Store
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, session scope, middleware, views, router
//!
//! ## Features
//! - Form login with an optional "remember me" cookie (`auth_token`)
//! - Logout that forgets the remember token and resets the session
//! - Server-side sessions behind an HMAC-signed cookie
//! - Two-tier flash messages resolved through a message catalog
//! - `require_login` with return-to-URL
//!
//! ## Security Model
//! - Passwords hashed with Argon2id, optional pepper
//! - Remember tokens stored as SHA-256 digests only, bound to an expiry
//! - Session ID rotated whenever the principal changes
//! - Only local paths are honored as post-login redirect targets

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::GatewayConfig;
pub use application::messages::MessageCatalog;
pub use application::user_store::UserStore;
pub use error::{GatewayError, GatewayResult};
pub use infra::{memory::MemoryRepository, postgres::PgGatewayRepository};
pub use presentation::router::gateway_router;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
