//! In-Memory Repository
//!
//! Backs both repositories with maps behind one `RwLock`. Used when no
//! database is configured, and by the tests.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{SessionId, UserId, login::Login};
use crate::error::{GatewayError, GatewayResult};

#[derive(Default)]
struct MemoryState {
    users: HashMap<UserId, User>,
    sessions: HashMap<SessionId, Session>,
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    state: Arc<RwLock<MemoryState>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions, expired ones included
    pub async fn session_count(&self) -> usize {
        self.state.read().await.sessions.len()
    }
}

impl UserRepository for MemoryRepository {
    async fn create(&self, user: &User) -> GatewayResult<()> {
        let mut state = self.state.write().await;
        if state.users.values().any(|u| u.login == user.login) {
            return Err(GatewayError::LoginTaken);
        }
        state.users.insert(user.user_id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, user_id: &UserId) -> GatewayResult<Option<User>> {
        Ok(self.state.read().await.users.get(user_id).cloned())
    }

    async fn find_by_login(&self, login: &Login) -> GatewayResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.login == *login)
            .cloned())
    }

    async fn find_by_remember_digest(&self, digest: &[u8]) -> GatewayResult<Option<User>> {
        Ok(self
            .state
            .read()
            .await
            .users
            .values()
            .find(|u| u.remember_token_digest.as_deref() == Some(digest))
            .cloned())
    }

    async fn update(&self, user: &User) -> GatewayResult<()> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&user.user_id) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(GatewayError::Internal(format!(
                "User {} not found",
                user.user_id
            ))),
        }
    }
}

impl SessionRepository for MemoryRepository {
    async fn find_session(&self, session_id: &SessionId) -> GatewayResult<Option<Session>> {
        Ok(self
            .state
            .read()
            .await
            .sessions
            .get(session_id)
            .filter(|s| !s.is_expired())
            .cloned())
    }

    async fn save_session(&self, session: &Session) -> GatewayResult<()> {
        self.state
            .write()
            .await
            .sessions
            .insert(session.session_id, session.clone());
        Ok(())
    }

    async fn delete_session(&self, session_id: &SessionId) -> GatewayResult<()> {
        self.state.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn cleanup_expired(&self) -> GatewayResult<u64> {
        let mut state = self.state.write().await;
        let before = state.sessions.len();
        state.sessions.retain(|_, s| !s.is_expired());
        let deleted = (before - state.sessions.len()) as u64;

        tracing::info!(sessions_deleted = deleted, "Cleaned up expired sessions");
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use platform::password::ClearTextPassword;

    fn user(login: &str) -> User {
        let hash = ClearTextPassword::presented("Correct-Horse-Battery".to_string())
            .hash(None)
            .unwrap();
        User::new(Login::parse(login).unwrap(), login, hash)
    }

    #[tokio::test]
    async fn test_duplicate_login_is_rejected() {
        let repo = MemoryRepository::new();
        repo.create(&user("alice")).await.unwrap();

        assert!(matches!(
            repo.create(&user("alice")).await,
            Err(GatewayError::LoginTaken)
        ));
        assert!(repo.create(&user("Alice")).await.is_ok());
    }

    #[tokio::test]
    async fn test_find_by_remember_digest() {
        let repo = MemoryRepository::new();
        let mut alice = user("alice");
        repo.create(&alice).await.unwrap();

        let cookie = alice.remember_until(chrono::Utc::now() + Duration::days(1));
        repo.update(&alice).await.unwrap();

        let found = repo
            .find_by_remember_digest(&cookie.token.digest())
            .await
            .unwrap();
        assert_eq!(found.map(|u| u.user_id), Some(alice.user_id));
        assert!(repo.find_by_remember_digest(&[0u8; 32]).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_sessions_are_invisible_and_cleaned() {
        let repo = MemoryRepository::new();
        let live = Session::new(Duration::hours(1));
        let dead = Session::new(Duration::seconds(-1));
        repo.save_session(&live).await.unwrap();
        repo.save_session(&dead).await.unwrap();

        assert!(repo.find_session(&live.session_id).await.unwrap().is_some());
        assert!(repo.find_session(&dead.session_id).await.unwrap().is_none());

        assert_eq!(repo.cleanup_expired().await.unwrap(), 1);
        assert_eq!(repo.session_count().await, 1);

        repo.delete_session(&live.session_id).await.unwrap();
        repo.delete_session(&live.session_id).await.unwrap();
        assert_eq!(repo.session_count().await, 0);
    }
}
