//! Current User Use Case
//!
//! Resolves who is making the request: the session principal first, then
//! the remember cookie. A cookie login re-establishes the session.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::user_store::UserStore;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::remember_token::{RememberCookie, RememberToken};
use crate::error::GatewayResult;

#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    /// Set when the user came back through the remember cookie; the cookie
    /// is sent again with its original expiry.
    pub remember_cookie: Option<RememberCookie>,
}

pub struct CurrentUserUseCase<U>
where
    U: UserRepository,
{
    users: UserStore<U>,
}

impl<U> CurrentUserUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<GatewayConfig>) -> Self {
        Self {
            users: UserStore::new(user_repo, config),
        }
    }

    pub async fn resolve(
        &self,
        session: &mut Session,
        remember_cookie: Option<&str>,
    ) -> GatewayResult<Option<CurrentUser>> {
        if let Some(user_id) = session.principal() {
            match self.users.find_active(&user_id).await? {
                Some(user) => {
                    return Ok(Some(CurrentUser {
                        user,
                        remember_cookie: None,
                    }));
                }
                None => {
                    tracing::debug!(user_id = %user_id, "Session principal no longer valid");
                    session.clear_principal();
                }
            }
        }

        let Some(token) = remember_cookie.and_then(RememberToken::from_cookie) else {
            return Ok(None);
        };

        let Some(user) = self.users.login_from_remember_token(&token).await? else {
            tracing::debug!("Remember cookie did not match any user");
            return Ok(None);
        };

        // principal changes: new session ID
        session.rotate();
        session.bind_principal(user.user_id);

        let expires_at = user
            .remember_token_expires_at
            .unwrap_or(session.expires_at);

        tracing::info!(user_id = %user.user_id, "User logged in from remember cookie");

        Ok(Some(CurrentUser {
            user,
            remember_cookie: Some(RememberCookie { token, expires_at }),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepository;

    async fn setup() -> (CurrentUserUseCase<MemoryRepository>, UserStore<MemoryRepository>, Arc<GatewayConfig>) {
        let repo = Arc::new(MemoryRepository::default());
        let config = Arc::new(GatewayConfig::development());
        (
            CurrentUserUseCase::new(repo.clone(), config.clone()),
            UserStore::new(repo, config.clone()),
            config,
        )
    }

    #[tokio::test]
    async fn test_anonymous_without_principal_or_cookie() {
        let (use_case, _, config) = setup().await;
        let mut session = Session::new(config.session_ttl());

        assert!(use_case.resolve(&mut session, None).await.unwrap().is_none());
        assert!(use_case
            .resolve(&mut session, Some("not-a-token"))
            .await
            .unwrap()
            .is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_session_principal_wins() {
        let (use_case, users, config) = setup().await;
        let alice = users
            .register("alice", "Alice", "Correct-Horse-Battery".to_string())
            .await
            .unwrap();

        let mut session = Session::new(config.session_ttl());
        session.bind_principal(alice.user_id);
        let id = session.session_id;

        let current = use_case.resolve(&mut session, None).await.unwrap().unwrap();
        assert_eq!(current.user.user_id, alice.user_id);
        assert!(current.remember_cookie.is_none());
        assert_eq!(session.session_id, id);
    }

    #[tokio::test]
    async fn test_stale_principal_is_cleared() {
        let (use_case, _, config) = setup().await;
        let mut session = Session::new(config.session_ttl());
        session.bind_principal(crate::domain::value_object::UserId::new());

        assert!(use_case.resolve(&mut session, None).await.unwrap().is_none());
        assert!(!session.is_authenticated());
    }

    #[tokio::test]
    async fn test_remember_cookie_logs_in_and_rotates() {
        let (use_case, users, config) = setup().await;
        let mut alice = users
            .register("alice", "Alice", "Correct-Horse-Battery".to_string())
            .await
            .unwrap();
        let cookie = users.remember_me(&mut alice).await.unwrap();

        let mut session = Session::new(config.session_ttl());
        let id = session.session_id;

        let current = use_case
            .resolve(&mut session, Some(cookie.token.as_str()))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(current.user.user_id, alice.user_id);
        assert_eq!(session.principal(), Some(alice.user_id));
        assert_ne!(session.session_id, id);

        let refreshed = current.remember_cookie.unwrap();
        assert_eq!(refreshed.token.as_str(), cookie.token.as_str());
        assert_eq!(refreshed.expires_at, cookie.expires_at);
    }
}
