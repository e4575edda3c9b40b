//! Remember Token
//!
//! Long-lived credential carried by the `auth_token` cookie. Only its
//! SHA-256 digest is ever stored with the user.

use std::fmt;

use chrono::{DateTime, Utc};
use platform::crypto::{random_token, sha256};

/// Random bytes per token
pub const REMEMBER_TOKEN_BYTES: usize = 32;

/// Clear remember token (URL-safe base64, no padding)
#[derive(Clone, PartialEq, Eq)]
pub struct RememberToken(String);

impl RememberToken {
    pub fn generate() -> Self {
        Self(random_token(REMEMBER_TOKEN_BYTES))
    }

    /// Accept a token presented in a cookie
    ///
    /// Rejects values that could not have been produced by [`generate`](Self::generate)
    /// before they reach the store.
    pub fn from_cookie(value: &str) -> Option<Self> {
        let well_formed = value.len() == encoded_len()
            && value
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

        well_formed.then(|| Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn digest(&self) -> Vec<u8> {
        sha256(self.0.as_bytes()).to_vec()
    }
}

const fn encoded_len() -> usize {
    (REMEMBER_TOKEN_BYTES * 4).div_ceil(3)
}

impl fmt::Debug for RememberToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RememberToken").field(&"[REDACTED]").finish()
    }
}

/// What the `auth_token` cookie carries: the token and its expiry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RememberCookie {
    pub token: RememberToken,
    pub expires_at: DateTime<Utc>,
}
