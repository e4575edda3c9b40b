//! Gateway Router

use axum::{
    Router, middleware,
    routing::{any, get},
};
use std::sync::Arc;

use crate::application::config::GatewayConfig;
use crate::application::messages::MessageCatalog;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::presentation::handlers::{self, GatewayState};
use crate::presentation::middleware::require_login;
use crate::presentation::views::LOGOUT_PATH;

/// Create the gateway router for any repository implementation
pub fn gateway_router<R>(repo: R, config: GatewayConfig, messages: MessageCatalog) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let login_path = config.login_path.clone();
    let state = GatewayState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        messages: Arc::new(messages),
    };

    let protected = Router::new()
        .route("/account", get(handlers::account::<R>))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_login::<R>,
        ));

    Router::new()
        .route("/", get(handlers::home::<R>))
        .route(&login_path, any(handlers::login::<R>))
        .route(LOGOUT_PATH, any(handlers::logout::<R>))
        .merge(protected)
        .with_state(state)
}
