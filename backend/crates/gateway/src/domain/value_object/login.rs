//! Login Value Object
//!
//! The unique identifier a user types into the login form. Matching is
//! exact: no case folding and no trimming.

use std::fmt;

use thiserror::Error;

pub const MIN_LOGIN_LENGTH: usize = 2;
pub const MAX_LOGIN_LENGTH: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Login must be between {min} and {max} characters (got {actual})")]
    Length {
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Login cannot contain whitespace or control characters")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Login(String);

impl Login {
    pub fn parse(raw: &str) -> Result<Self, LoginError> {
        let actual = raw.chars().count();
        if !(MIN_LOGIN_LENGTH..=MAX_LOGIN_LENGTH).contains(&actual) {
            return Err(LoginError::Length {
                min: MIN_LOGIN_LENGTH,
                max: MAX_LOGIN_LENGTH,
                actual,
            });
        }

        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(LoginError::InvalidCharacter);
        }

        Ok(Self(raw.to_string()))
    }

    /// Restore from storage without re-validating
    pub fn from_db(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Login {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
