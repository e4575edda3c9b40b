//! Logout Use Case
//!
//! Runs the logout hook, forgets the remember token and resets the session.
//! Logging out while anonymous is not an error.

use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::user_store::UserStore;
use crate::domain::entity::{session::Session, user::User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    UserId,
    flash::{FlashMessage, FlashSlot},
};
use crate::error::GatewayResult;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoutOutcome {
    pub redirect_to: String,
    /// The user whose remember token was invalidated, if any
    pub logged_out: Option<UserId>,
}

pub struct LogoutUseCase<U>
where
    U: UserRepository,
{
    users: UserStore<U>,
    config: Arc<GatewayConfig>,
}

impl<U> LogoutUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<GatewayConfig>) -> Self {
        Self {
            users: UserStore::new(user_repo, config.clone()),
            config,
        }
    }

    /// `current` is the user resolved from the session or remember cookie
    ///
    /// The caller deletes the `auth_token` cookie regardless of the outcome.
    pub async fn execute(
        &self,
        session: &mut Session,
        current: Option<User>,
    ) -> GatewayResult<LogoutOutcome> {
        let logged_out = match current {
            Some(mut user) => {
                self.users.on_logout(&mut user).await?;
                self.users.forget_me(&mut user).await?;
                Some(user.user_id)
            }
            None => None,
        };

        session
            .flash_mut()
            .set(FlashSlot::Notice, FlashMessage::LoggedOut);

        // decided before the reset; the reset keeps the pending notice
        let redirect_to = self.config.home_path.clone();
        session.reset(self.config.session_ttl());

        Ok(LogoutOutcome {
            redirect_to,
            logged_out,
        })
    }
}
