//! HTTP Handlers

use axum::{Extension, Form};
use axum::extract::State;
use axum::extract::rejection::FormRejection;
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use std::sync::Arc;

use platform::cookie::{extract_cookie, to_header_value};
use platform::password::ClearTextPassword;

use crate::application::config::GatewayConfig;
use crate::application::messages::MessageCatalog;
use crate::application::{
    CurrentUser, CurrentUserUseCase, LoginInput, LoginOutcome, LoginUseCase, LogoutUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::{
    flash::Flash, remember_me::RememberMe, remember_token::RememberCookie,
};
use crate::error::GatewayResult;
use crate::presentation::dto::LoginForm;
use crate::presentation::session_scope::SessionScope;
use crate::presentation::views::{AccountPage, FlashLine, HomePage, LOGOUT_PATH, LoginPage, render};

/// Shared state for gateway handlers
#[derive(Clone)]
pub struct GatewayState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<GatewayConfig>,
    pub messages: Arc<MessageCatalog>,
}

impl<R> GatewayState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    fn remember_cookie_value(&self, headers: &HeaderMap) -> Option<String> {
        extract_cookie(headers, &self.config.remember_cookie_name)
    }

    async fn resolve_current_user(
        &self,
        scope: &mut SessionScope,
        headers: &HeaderMap,
    ) -> GatewayResult<Option<CurrentUser>> {
        let remember = self.remember_cookie_value(headers);
        CurrentUserUseCase::new(self.repo.clone(), self.config.clone())
            .resolve(&mut scope.session, remember.as_deref())
            .await
    }

    fn login_page(&self, flash: &Flash, login: String) -> LoginPage {
        LoginPage {
            flash: FlashLine::from_flash(flash, &self.messages),
            action: self.config.login_path.clone(),
            login,
        }
    }
}

// ============================================================================
// Login
// ============================================================================

/// /login
///
/// Write methods attempt a login; anything else shows the form.
pub async fn login<R>(
    State(state): State<GatewayState<R>>,
    method: Method,
    headers: HeaderMap,
    form: Result<Form<LoginForm>, FormRejection>,
) -> GatewayResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut scope = SessionScope::open(state.repo.as_ref(), &state.config, &headers).await?;

    if !is_write_method(&method) {
        let body = render(&state.login_page(scope.session.flash(), String::new()))?;
        let cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
        return Ok(with_cookies(body.into_response(), cookies));
    }

    let form = form.map(|Form(form)| form).unwrap_or_else(|rejection| {
        tracing::debug!(error = %rejection, "Unreadable login form");
        LoginForm::default()
    });

    // 失敗時にフォームへ再表示するため login は複製しておく
    let input = LoginInput {
        login: form.login.clone(),
        password: ClearTextPassword::presented(form.password),
        remember_me: RememberMe::from_form_value(form.remember_me.as_deref()),
    };

    let use_case = LoginUseCase::new(state.repo.clone(), state.config.clone());

    match use_case.execute(&mut scope.session, input).await? {
        LoginOutcome::Authenticated {
            redirect_to,
            remember_cookie,
            ..
        } => {
            let mut cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
            if let Some(remember) = remember_cookie {
                cookies.push(remember_set_cookie(&state.config, &remember));
            }
            Ok(with_cookies(found(&redirect_to), cookies))
        }
        LoginOutcome::Rejected => {
            let body = render(&state.login_page(scope.session.flash(), form.login))?;
            let cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
            Ok(with_cookies(body.into_response(), cookies))
        }
    }
}

// ============================================================================
// Logout
// ============================================================================

/// /logout (any method)
pub async fn logout<R>(
    State(state): State<GatewayState<R>>,
    headers: HeaderMap,
) -> GatewayResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut scope = SessionScope::open(state.repo.as_ref(), &state.config, &headers).await?;
    let current = state.resolve_current_user(&mut scope, &headers).await?;

    let use_case = LogoutUseCase::new(state.repo.clone(), state.config.clone());
    let outcome = use_case
        .execute(&mut scope.session, current.map(|c| c.user))
        .await?;

    let mut cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
    cookies.push(state.config.remember_cookie().build_delete_cookie());

    Ok(with_cookies(found(&outcome.redirect_to), cookies))
}

// ============================================================================
// Pages
// ============================================================================

/// GET /
pub async fn home<R>(
    State(state): State<GatewayState<R>>,
    headers: HeaderMap,
) -> GatewayResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let mut scope = SessionScope::open(state.repo.as_ref(), &state.config, &headers).await?;
    let current = state.resolve_current_user(&mut scope, &headers).await?;

    let page = HomePage {
        flash: FlashLine::from_flash(scope.session.flash(), &state.messages),
        user_name: current.as_ref().map(|c| c.user.name.clone()),
        login_path: state.config.login_path.clone(),
        logout_path: LOGOUT_PATH,
    };
    let body = render(&page)?;

    let mut cookies = scope.commit(state.repo.as_ref(), &state.config).await?;
    if let Some(remember) = current.and_then(|c| c.remember_cookie) {
        cookies.push(remember_set_cookie(&state.config, &remember));
    }

    Ok(with_cookies(body.into_response(), cookies))
}

/// GET /account (behind `require_login`)
pub async fn account<R>(
    State(state): State<GatewayState<R>>,
    Extension(current): Extension<CurrentUser>,
    Extension(flash): Extension<Flash>,
) -> GatewayResult<Response>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let page = AccountPage::new(&current.user, FlashLine::from_flash(&flash, &state.messages));
    Ok(render(&page)?.into_response())
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Methods that may change state
pub fn is_write_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}

/// 302 Found
pub fn found(location: &str) -> Response {
    match to_header_value(location) {
        Some(value) => (StatusCode::FOUND, [(header::LOCATION, value)]).into_response(),
        None => {
            tracing::error!(location = %location, "Redirect target is not a valid header value");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Append `Set-Cookie` headers
pub fn with_cookies(mut response: Response, cookies: Vec<String>) -> Response {
    for cookie in cookies {
        match to_header_value(&cookie) {
            Some(value) => {
                response.headers_mut().append(header::SET_COOKIE, value);
            }
            None => tracing::error!("Dropping malformed Set-Cookie value"),
        }
    }
    response
}

pub fn remember_set_cookie(config: &GatewayConfig, remember: &RememberCookie) -> String {
    config
        .remember_cookie()
        .build_set_cookie_until(remember.token.as_str(), remember.expires_at)
}
