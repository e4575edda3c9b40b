//! User Entity
//!
//! Identity plus credentials. The remember token is kept as a SHA-256 digest;
//! the clear token only ever exists in the cookie.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{
    UserId,
    login::Login,
    remember_token::{RememberCookie, RememberToken},
};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Unique, used at the login form
    pub login: Login,
    /// Display name
    pub name: String,
    pub password_hash: HashedPassword,
    /// Inactive users can not authenticate
    pub active: bool,
    pub remember_token_digest: Option<Vec<u8>>,
    pub remember_token_expires_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub last_logout_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(login: Login, name: impl Into<String>, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            login,
            name: name.into(),
            password_hash,
            active: true,
            remember_token_digest: None,
            remember_token_expires_at: None,
            last_login_at: None,
            last_logout_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Issue a fresh remember token valid until `expires_at`
    ///
    /// Any previously issued token stops working.
    pub fn remember_until(&mut self, expires_at: DateTime<Utc>) -> RememberCookie {
        let token = RememberToken::generate();
        self.remember_token_digest = Some(token.digest());
        self.remember_token_expires_at = Some(expires_at);
        self.updated_at = Utc::now();

        RememberCookie { token, expires_at }
    }

    pub fn forget(&mut self) {
        self.remember_token_digest = None;
        self.remember_token_expires_at = None;
        self.updated_at = Utc::now();
    }

    /// `token` is this user's current, unexpired remember token
    pub fn remembers(&self, token: &RememberToken, now: DateTime<Utc>) -> bool {
        match (&self.remember_token_digest, self.remember_token_expires_at) {
            (Some(digest), Some(expires_at)) => now < expires_at && *digest == token.digest(),
            _ => false,
        }
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }

    pub fn record_logout(&mut self) {
        let now = Utc::now();
        self.last_logout_at = Some(now);
        self.updated_at = now;
    }
}
