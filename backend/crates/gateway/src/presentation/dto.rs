//! Form DTOs

use serde::Deserialize;

/// `POST /login` form body
///
/// Missing fields deserialize to empty strings; no `Debug` so the password
/// never ends up in a log line.
#[derive(Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    /// Raw checkbox value; only `"1"` opts in
    pub remember_me: Option<String>,
}
