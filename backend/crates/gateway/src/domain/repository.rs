//! Repository Traits
//!
//! Persistence interfaces. Implementations live in the infrastructure layer;
//! each implementation is responsible for its own concurrency safety.

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{SessionId, UserId, login::Login};
use crate::error::GatewayResult;

/// User repository trait
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Create a new user; `GatewayError::LoginTaken` if the login exists
    async fn create(&self, user: &User) -> GatewayResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> GatewayResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_login(&self, login: &Login) -> GatewayResult<Option<User>>;

    /// Look up by SHA-256 digest of a remember token (expiry not checked)
    async fn find_by_remember_digest(&self, digest: &[u8]) -> GatewayResult<Option<User>>;

    async fn update(&self, user: &User) -> GatewayResult<()>;
}

/// Session repository trait
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Find an unexpired session
    async fn find_session(&self, session_id: &SessionId) -> GatewayResult<Option<Session>>;

    /// Insert or replace
    async fn save_session(&self, session: &Session) -> GatewayResult<()>;

    /// Deleting a missing session is not an error
    async fn delete_session(&self, session_id: &SessionId) -> GatewayResult<()>;

    /// Remove expired sessions, returning how many were removed
    async fn cleanup_expired(&self) -> GatewayResult<u64>;
}
