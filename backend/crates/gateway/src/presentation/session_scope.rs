//! Session Scope
//!
//! Loads the session named by the signed session cookie at the start of a
//! request and writes it back at the end.
//!
//! Cookie value: `<session uuid>.<base64url HMAC-SHA256>`.

use axum::http::HeaderMap;
use platform::cookie::extract_cookie;
use platform::crypto::{sign, verify_signed};

use crate::application::config::GatewayConfig;
use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::SessionId;
use crate::error::GatewayResult;

pub struct SessionScope {
    /// ID the session was stored under when the request began
    stored_id: Option<SessionId>,
    /// The client sent a session cookie (valid or not)
    had_cookie: bool,
    pub session: Session,
}

impl SessionScope {
    /// Load the request's session and sweep its flash
    ///
    /// Missing, forged or expired cookies start a fresh session.
    pub async fn open<R>(repo: &R, config: &GatewayConfig, headers: &HeaderMap) -> GatewayResult<Self>
    where
        R: SessionRepository,
    {
        let cookie = extract_cookie(headers, &config.session_cookie_name);
        let had_cookie = cookie.is_some();

        let session_id = cookie.as_deref().and_then(|value| {
            let id = verify_signed(&config.session_secret, value)
                .and_then(|payload| payload.parse::<SessionId>().ok());
            if id.is_none() {
                tracing::debug!("Ignoring session cookie with bad signature");
            }
            id
        });

        let stored = match session_id {
            Some(id) => repo.find_session(&id).await?,
            None => None,
        };

        let mut scope = match stored {
            Some(session) => Self {
                stored_id: Some(session.session_id),
                had_cookie,
                session,
            },
            None => {
                if session_id.is_some() {
                    tracing::debug!("Session cookie names an unknown or expired session");
                }
                Self {
                    stored_id: None,
                    had_cookie,
                    session: Session::new(config.session_ttl()),
                }
            }
        };

        scope.session.flash_mut().sweep();
        Ok(scope)
    }

    /// Persist the session and return the `Set-Cookie` values to send
    ///
    /// - a rotated or reset session deletes the old stored ID
    /// - a blank session is not stored; its cookie is cleared
    /// - the cookie is only (re)issued when the ID changed
    pub async fn commit<R>(mut self, repo: &R, config: &GatewayConfig) -> GatewayResult<Vec<String>>
    where
        R: SessionRepository,
    {
        let cookie_config = config.session_cookie();
        let current_id = self.session.session_id;
        let mut cookies = Vec::new();

        if let Some(old_id) = self.stored_id {
            if old_id != current_id || self.session.is_blank() {
                repo.delete_session(&old_id).await?;
            }
        }

        if self.session.is_blank() {
            if self.had_cookie {
                cookies.push(cookie_config.build_delete_cookie());
            }
            return Ok(cookies);
        }

        self.session.touch(config.session_ttl());
        repo.save_session(&self.session).await?;

        if self.stored_id != Some(current_id) {
            let value = sign(&config.session_secret, &current_id.to_string());
            cookies.push(cookie_config.build_set_cookie(&value));
        }

        Ok(cookies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::{
        UserId,
        flash::{FlashMessage, FlashSlot},
    };
    use crate::infra::memory::MemoryRepository;
    use axum::http::{HeaderValue, header};

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    fn cookie_pair(set_cookie: &str) -> String {
        set_cookie.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_blank_session_is_not_stored() {
        let repo = MemoryRepository::new();
        let config = GatewayConfig::development();

        let scope = SessionScope::open(&repo, &config, &HeaderMap::new()).await.unwrap();
        let cookies = scope.commit(&repo, &config).await.unwrap();

        assert!(cookies.is_empty());
        assert_eq!(repo.session_count().await, 0);
    }

    #[tokio::test]
    async fn test_session_survives_round_trip() {
        let repo = MemoryRepository::new();
        let config = GatewayConfig::development();
        let user_id = UserId::new();

        let mut scope = SessionScope::open(&repo, &config, &HeaderMap::new()).await.unwrap();
        scope.session.bind_principal(user_id);
        let cookies = scope.commit(&repo, &config).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].starts_with("_session_id="));

        let headers = headers_with(&cookie_pair(&cookies[0]));
        let scope = SessionScope::open(&repo, &config, &headers).await.unwrap();
        assert_eq!(scope.session.principal(), Some(user_id));

        // unchanged ID: no new cookie
        let cookies = scope.commit(&repo, &config).await.unwrap();
        assert!(cookies.is_empty());
    }

    #[tokio::test]
    async fn test_forged_cookie_starts_fresh_session() {
        let repo = MemoryRepository::new();
        let config = GatewayConfig::development();
        let other = GatewayConfig::development();

        let mut scope = SessionScope::open(&repo, &other, &HeaderMap::new()).await.unwrap();
        scope.session.bind_principal(UserId::new());
        let forged_id = scope.session.session_id;
        let cookies = scope.commit(&repo, &other).await.unwrap();

        // signed with a different secret
        let headers = headers_with(&cookie_pair(&cookies[0]));
        let scope = SessionScope::open(&repo, &config, &headers).await.unwrap();
        assert_ne!(scope.session.session_id, forged_id);
        assert!(!scope.session.is_authenticated());

        let headers = headers_with(&format!("_session_id={}", forged_id));
        let scope = SessionScope::open(&repo, &config, &headers).await.unwrap();
        assert!(!scope.session.is_authenticated());

        // blank session with a cookie present: cookie is cleared
        let cookies = scope.commit(&repo, &config).await.unwrap();
        assert_eq!(cookies.len(), 1);
        assert!(cookies[0].contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn test_rotation_deletes_old_id() {
        let repo = MemoryRepository::new();
        let config = GatewayConfig::development();

        let mut scope = SessionScope::open(&repo, &config, &HeaderMap::new()).await.unwrap();
        scope.session.store_location("/account");
        let old_id = scope.session.session_id;
        let cookies = scope.commit(&repo, &config).await.unwrap();

        let headers = headers_with(&cookie_pair(&cookies[0]));
        let mut scope = SessionScope::open(&repo, &config, &headers).await.unwrap();
        scope.session.rotate();
        let new_id = scope.session.session_id;
        let cookies = scope.commit(&repo, &config).await.unwrap();

        assert_eq!(cookies.len(), 1);
        assert!(repo.find_session(&old_id).await.unwrap().is_none());
        assert!(repo.find_session(&new_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_flash_is_shown_once() {
        let repo = MemoryRepository::new();
        let config = GatewayConfig::development();

        let mut scope = SessionScope::open(&repo, &config, &HeaderMap::new()).await.unwrap();
        scope
            .session
            .flash_mut()
            .set(FlashSlot::Notice, FlashMessage::LoggedOut);
        let cookies = scope.commit(&repo, &config).await.unwrap();
        let headers = headers_with(&cookie_pair(&cookies[0]));

        let scope = SessionScope::open(&repo, &config, &headers).await.unwrap();
        assert_eq!(
            scope.session.flash().get(FlashSlot::Notice),
            Some(FlashMessage::LoggedOut)
        );
        let cookies = scope.commit(&repo, &config).await.unwrap();
        // nothing left to keep: session dropped, cookie cleared
        assert!(cookies[0].contains("Max-Age=0"));
        assert_eq!(repo.session_count().await, 0);

        let scope = SessionScope::open(&repo, &config, &headers).await.unwrap();
        assert_eq!(scope.session.flash().get(FlashSlot::Notice), None);
    }
}
