//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, session scope, middleware and views.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod session_scope;
pub mod views;

pub use handlers::GatewayState;
pub use middleware::require_login;
pub use router::gateway_router;
pub use session_scope::SessionScope;
