//! User Store
//!
//! The user-side contract the gateway relies on: `authenticate`,
//! `remember_me`, `forget_me`, `on_logout`, plus remember-token lookup and
//! registration.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;

use crate::application::config::GatewayConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    login::Login,
    remember_token::{RememberCookie, RememberToken},
};
use crate::error::{GatewayError, GatewayResult};

pub struct UserStore<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<GatewayConfig>,
}

impl<U> UserStore<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<GatewayConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Verify credentials
    ///
    /// Unknown login, inactive account and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate(
        &self,
        login: &str,
        password: ClearTextPassword,
    ) -> GatewayResult<Option<User>> {
        let Ok(login) = Login::parse(login) else {
            return Ok(None);
        };

        let Some(mut user) = self.user_repo.find_by_login(&login).await? else {
            tracing::debug!(login = %login, "Authentication for unknown login");
            return Ok(None);
        };

        if !user.active {
            tracing::debug!(user_id = %user.user_id, "Authentication for inactive user");
            return Ok(None);
        }

        if !user.password_hash.verify(&password, self.config.pepper()) {
            return Ok(None);
        }

        user.record_login();
        self.user_repo.update(&user).await?;

        Ok(Some(user))
    }

    /// Issue a fresh remember token for `user` and persist its digest
    pub async fn remember_me(&self, user: &mut User) -> GatewayResult<RememberCookie> {
        let cookie = user.remember_until(Utc::now() + self.config.remember_ttl());
        self.user_repo.update(user).await?;

        tracing::debug!(
            user_id = %user.user_id,
            expires_at = %cookie.expires_at,
            "Remember token issued"
        );
        Ok(cookie)
    }

    /// Invalidate the remember token server-side
    pub async fn forget_me(&self, user: &mut User) -> GatewayResult<()> {
        user.forget();
        self.user_repo.update(user).await
    }

    /// Logout hook: audit trail
    pub async fn on_logout(&self, user: &mut User) -> GatewayResult<()> {
        user.record_logout();
        self.user_repo.update(user).await?;

        tracing::info!(user_id = %user.user_id, login = %user.login, "User logged out");
        Ok(())
    }

    /// Active user whose unexpired remember token is `token`
    pub async fn login_from_remember_token(
        &self,
        token: &RememberToken,
    ) -> GatewayResult<Option<User>> {
        let user = self
            .user_repo
            .find_by_remember_digest(&token.digest())
            .await?;

        Ok(user.filter(|u| u.active && u.remembers(token, Utc::now())))
    }

    /// Active user by ID
    pub async fn find_active(&self, user_id: &UserId) -> GatewayResult<Option<User>> {
        Ok(self
            .user_repo
            .find_by_id(user_id)
            .await?
            .filter(|u| u.active))
    }

    /// Create a user; the password must satisfy the password policy
    pub async fn register(&self, login: &str, name: &str, password: String) -> GatewayResult<User> {
        let login = Login::parse(login).map_err(|e| GatewayError::InvalidLogin(e.to_string()))?;

        if self.user_repo.find_by_login(&login).await?.is_some() {
            return Err(GatewayError::LoginTaken);
        }

        let password = ClearTextPassword::new(password)
            .map_err(|e| GatewayError::PasswordPolicy(e.to_string()))?;
        let password_hash = password
            .hash(self.config.pepper())
            .map_err(|e| GatewayError::Internal(e.to_string()))?;

        let user = User::new(login, name, password_hash);
        self.user_repo.create(&user).await?;

        tracing::info!(user_id = %user.user_id, login = %user.login, "User registered");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::MemoryRepository;

    const PASSWORD: &str = "Correct-Horse-Battery";

    async fn store_with_alice() -> (UserStore<MemoryRepository>, User) {
        let store = UserStore::new(
            Arc::new(MemoryRepository::default()),
            Arc::new(GatewayConfig::development()),
        );
        let alice = store
            .register("alice", "Alice", PASSWORD.to_string())
            .await
            .unwrap();
        (store, alice)
    }

    fn presented(password: &str) -> ClearTextPassword {
        ClearTextPassword::presented(password.to_string())
    }

    #[tokio::test]
    async fn test_authenticate_success_records_login() {
        let (store, alice) = store_with_alice().await;

        let user = store
            .authenticate("alice", presented(PASSWORD))
            .await
            .unwrap()
            .expect("valid credentials");
        assert_eq!(user.user_id, alice.user_id);
        assert!(user.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let (store, mut alice) = store_with_alice().await;

        assert!(store.authenticate("alice", presented("wrong")).await.unwrap().is_none());
        assert!(store.authenticate("bob", presented(PASSWORD)).await.unwrap().is_none());
        assert!(store.authenticate("", presented(PASSWORD)).await.unwrap().is_none());
        assert!(store.authenticate("ALICE", presented(PASSWORD)).await.unwrap().is_none());

        alice.active = false;
        store.user_repo.update(&alice).await.unwrap();
        assert!(store.authenticate("alice", presented(PASSWORD)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_remember_then_forget() {
        let (store, mut alice) = store_with_alice().await;

        let cookie = store.remember_me(&mut alice).await.unwrap();
        let found = store.login_from_remember_token(&cookie.token).await.unwrap();
        assert_eq!(found.map(|u| u.user_id), Some(alice.user_id));

        store.forget_me(&mut alice).await.unwrap();
        assert!(store.login_from_remember_token(&cookie.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_remember_token_is_ignored() {
        let (store, mut alice) = store_with_alice().await;

        let cookie = alice.remember_until(Utc::now() - chrono::Duration::seconds(1));
        store.user_repo.update(&alice).await.unwrap();

        assert!(store.login_from_remember_token(&cookie.token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_on_logout_records_timestamp() {
        let (store, mut alice) = store_with_alice().await;
        store.on_logout(&mut alice).await.unwrap();

        let stored = store.find_active(&alice.user_id).await.unwrap().unwrap();
        assert!(stored.last_logout_at.is_some());
    }

    #[tokio::test]
    async fn test_register_rejections() {
        let (store, _) = store_with_alice().await;

        assert!(matches!(
            store.register("alice", "Other", PASSWORD.to_string()).await,
            Err(GatewayError::LoginTaken)
        ));
        assert!(matches!(
            store.register("bob", "Bob", "short".to_string()).await,
            Err(GatewayError::PasswordPolicy(_))
        ));
        assert!(matches!(
            store.register("b ob", "Bob", PASSWORD.to_string()).await,
            Err(GatewayError::InvalidLogin(_))
        ));
    }
}
