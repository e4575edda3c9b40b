//! Login Use Case
//!
//! Authenticates credentials against the User Store and updates the session:
//! principal, optional remember token, flash and redirect target.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::GatewayConfig;
use crate::application::user_store::UserStore;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    flash::{FlashMessage, FlashSlot},
    remember_me::RememberMe,
    remember_token::RememberCookie,
};
use crate::error::GatewayResult;

/// Login input
pub struct LoginInput {
    pub login: String,
    pub password: ClearTextPassword,
    pub remember_me: RememberMe,
}

/// Login outcome
#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated {
        user: User,
        /// Saved return URL, or the home path
        redirect_to: String,
        /// Present only when remember-me was requested
        remember_cookie: Option<RememberCookie>,
    },
    /// Bad credentials; the login form is shown again with an error
    Rejected,
}

/// Login use case
pub struct LoginUseCase<U>
where
    U: UserRepository,
{
    users: UserStore<U>,
    config: Arc<GatewayConfig>,
}

impl<U> LoginUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<GatewayConfig>) -> Self {
        Self {
            users: UserStore::new(user_repo, config.clone()),
            config,
        }
    }

    pub async fn execute(
        &self,
        session: &mut Session,
        input: LoginInput,
    ) -> GatewayResult<LoginOutcome> {
        let Some(mut user) = self.users.authenticate(&input.login, input.password).await? else {
            // 失敗したログインで以前のユーザーを残さない
            if session.is_authenticated() {
                session.clear_principal();
                session.rotate();
            }
            session
                .flash_mut()
                .now(FlashSlot::LoginError, FlashMessage::AuthenticationFailed);

            tracing::warn!(login = %input.login, "Authentication failed");
            return Ok(LoginOutcome::Rejected);
        };

        session.rotate();
        session.bind_principal(user.user_id);

        let remember_cookie = if input.remember_me.is_requested() {
            Some(self.users.remember_me(&mut user).await?)
        } else {
            None
        };

        session
            .flash_mut()
            .set(FlashSlot::Notice, FlashMessage::LoggedIn);

        let redirect_to = session
            .take_return_to()
            .filter(|path| is_local_path(path))
            .unwrap_or_else(|| self.config.home_path.clone());

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            remember_me = input.remember_me.is_requested(),
            "User logged in"
        );

        Ok(LoginOutcome::Authenticated {
            user,
            redirect_to,
            remember_cookie,
        })
    }
}

/// Same-origin absolute path (`/foo`), never `//host` or `/\host`
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}
