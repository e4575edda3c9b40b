//! Access Control Middleware
//!
//! `require_login` guards protected routes. Navigations (GET/HEAD) by an
//! anonymous client save the requested URL and go to the login page; other
//! methods get 401.

use axum::extract::{Request, State};
use axum::http::Method;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::cookie::extract_cookie;

use crate::application::CurrentUserUseCase;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{GatewayError, GatewayResult};
use crate::presentation::handlers::{GatewayState, found, remember_set_cookie, with_cookies};
use crate::presentation::session_scope::SessionScope;

/// Middleware that requires a current user
///
/// On success the handler finds `CurrentUser` and this request's `Flash`
/// in the request extensions.
pub async fn require_login<R>(
    State(state): State<GatewayState<R>>,
    mut req: Request,
    next: Next,
) -> GatewayResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let headers = req.headers().clone();
    let mut scope = SessionScope::open(state.repo.as_ref(), &state.config, &headers).await?;

    let remember = extract_cookie(&headers, &state.config.remember_cookie_name);
    let current = CurrentUserUseCase::new(state.repo.clone(), state.config.clone())
        .resolve(&mut scope.session, remember.as_deref())
        .await?;

    let Some(current) = current else {
        let navigating = matches!(*req.method(), Method::GET | Method::HEAD);

        let response = if navigating {
            let location = req
                .uri()
                .path_and_query()
                .map(|pq| pq.as_str().to_string())
                .unwrap_or_else(|| req.uri().path().to_string());
            tracing::debug!(return_to = %location, "Login required, redirecting");

            scope.session.store_location(location);
            found(&state.config.login_path)
        } else {
            GatewayError::LoginRequired.into_response()
        };

        let cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
        return Ok(with_cookies(response, cookies));
    };

    let refreshed = current.remember_cookie.clone();
    req.extensions_mut().insert(current);
    req.extensions_mut().insert(scope.session.flash().clone());

    let response = next.run(req).await;

    let mut cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
    if let Some(remember) = refreshed {
        cookies.push(remember_set_cookie(&state.config, &remember));
    }

    Ok(with_cookies(response, cookies))
}
