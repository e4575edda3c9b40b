//! Session Entity
//!
//! Server-side session state referenced by the signed session cookie.
//! Handlers receive it explicitly and pass `&mut Session` into use cases.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_object::{
    SessionId, UserId,
    flash::Flash,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: SessionId,
    /// Authenticated principal
    principal: Option<UserId>,
    /// Where to go after login, saved when access was denied
    return_to: Option<String>,
    #[serde(default)]
    flash: Flash,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn new(ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            session_id: SessionId::new(),
            principal: None,
            return_to: None,
            flash: Flash::default(),
            created_at: now,
            updated_at: now,
            expires_at: now + ttl,
        }
    }

    /// Rebuild from storage
    pub fn from_stored(
        session_id: SessionId,
        principal: Option<UserId>,
        return_to: Option<String>,
        flash: Flash,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id,
            principal,
            return_to,
            flash,
            created_at,
            updated_at,
            expires_at,
        }
    }

    pub fn principal(&self) -> Option<UserId> {
        self.principal
    }

    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    pub fn bind_principal(&mut self, user_id: UserId) {
        self.principal = Some(user_id);
    }

    pub fn clear_principal(&mut self) {
        self.principal = None;
    }

    pub fn store_location(&mut self, path: impl Into<String>) {
        self.return_to = Some(path.into());
    }

    /// Saved return URL, removed from the session
    pub fn take_return_to(&mut self) -> Option<String> {
        self.return_to.take()
    }

    pub fn return_to(&self) -> Option<&str> {
        self.return_to.as_deref()
    }

    pub fn flash(&self) -> &Flash {
        &self.flash
    }

    pub fn flash_mut(&mut self) -> &mut Flash {
        &mut self.flash
    }

    /// Move to a new session ID keeping the contents
    ///
    /// Done whenever the principal changes so a pre-login ID planted by an
    /// attacker is worthless afterwards.
    pub fn rotate(&mut self) {
        self.session_id = SessionId::new();
    }

    /// Replace with a fresh, anonymous session under a new ID
    ///
    /// Only the flash messages already set for the next request survive.
    pub fn reset(&mut self, ttl: Duration) {
        let carried = self.flash.carried();
        *self = Session::new(ttl);
        self.flash = carried;
    }

    /// Nothing worth storing
    pub fn is_blank(&self) -> bool {
        self.principal.is_none() && self.return_to.is_none() && !self.flash.has_pending()
    }

    /// Slide the idle expiry forward
    pub fn touch(&mut self, ttl: Duration) {
        let now = Utc::now();
        self.updated_at = now;
        self.expires_at = now + ttl;
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}
