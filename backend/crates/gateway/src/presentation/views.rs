//! Server-rendered pages (askama)

use askama::Template;
use axum::response::Html;

use crate::application::messages::MessageCatalog;
use crate::domain::entity::user::User;
use crate::domain::value_object::flash::Flash;
use crate::error::GatewayResult;

/// One rendered flash message
pub struct FlashLine {
    pub class: &'static str,
    pub text: String,
}

impl FlashLine {
    pub fn from_flash(flash: &Flash, messages: &MessageCatalog) -> Vec<Self> {
        flash
            .visible()
            .into_iter()
            .map(|(slot, message)| FlashLine {
                class: slot.css_class(),
                text: messages.text(message).to_string(),
            })
            .collect()
    }
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    pub flash: Vec<FlashLine>,
    pub action: String,
    /// Echoed back after a failed attempt
    pub login: String,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomePage {
    pub flash: Vec<FlashLine>,
    pub user_name: Option<String>,
    pub login_path: String,
    pub logout_path: &'static str,
}

#[derive(Template)]
#[template(path = "account.html")]
pub struct AccountPage {
    pub flash: Vec<FlashLine>,
    pub name: String,
    pub login: String,
    pub last_login: String,
    pub logout_path: &'static str,
}

impl AccountPage {
    pub fn new(user: &User, flash: Vec<FlashLine>) -> Self {
        Self {
            flash,
            name: user.name.clone(),
            login: user.login.to_string(),
            last_login: user
                .last_login_at
                .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                .unwrap_or_else(|| "-".to_string()),
            logout_path: LOGOUT_PATH,
        }
    }
}

pub const LOGOUT_PATH: &str = "/logout";

pub fn render<T: Template>(page: &T) -> GatewayResult<Html<String>> {
    Ok(Html(page.render()?))
}
