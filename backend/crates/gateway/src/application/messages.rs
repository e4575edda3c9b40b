//! Message Catalog
//!
//! Resolves [`FlashMessage`] values to display text. The built-in English
//! bundle can be overridden with a `.properties` style bundle:
//!
//! ```text
//! # comments start with '#' or '!'
//! session.flash_notice.logged_in=Welcome back.
//! ```

use std::collections::HashMap;

use crate::domain::value_object::flash::FlashMessage;

const ENGLISH: &[(&str, &str)] = &[
    ("session.flash_notice.logged_in", "Logged in successfully."),
    (
        "session.flash_notice.authentication_failed",
        "Authentication failed.",
    ),
    ("session.flash_notice.logged_out", "You have been logged out."),
];

#[derive(Debug, Clone)]
pub struct MessageCatalog {
    entries: HashMap<String, String>,
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}

impl MessageCatalog {
    pub fn english() -> Self {
        Self {
            entries: ENGLISH
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    /// English bundle overridden by the entries of `source`
    pub fn from_properties(source: &str) -> Self {
        let mut catalog = Self::english();
        catalog.entries.extend(parse_properties(source));
        catalog
    }

    /// Text for `message`; the key itself when the bundle lacks it
    pub fn text(&self, message: FlashMessage) -> &str {
        self.entries
            .get(message.key())
            .map(String::as_str)
            .unwrap_or(message.key())
    }
}

fn parse_properties(source: &str) -> impl Iterator<Item = (String, String)> + '_ {
    source.lines().filter_map(|line| {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            return None;
        }
        let split = line.find(['=', ':'])?;
        let (key, value) = (&line[..split], &line[split + 1..]);
        Some((key.trim().to_string(), value.trim().to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_covers_every_message() {
        let catalog = MessageCatalog::english();
        for message in FlashMessage::ALL {
            assert_ne!(catalog.text(message), message.key());
        }
        assert_eq!(
            catalog.text(FlashMessage::AuthenticationFailed),
            "Authentication failed."
        );
    }

    #[test]
    fn test_properties_override() {
        let catalog = MessageCatalog::from_properties(
            "# French\n\
             session.flash_notice.logged_out = Vous êtes déconnecté.\n\
             ! unrelated comment\n\
             \n\
             session.flash_notice.logged_in: Connecté.\n\
             garbage line without separator\n",
        );

        assert_eq!(catalog.text(FlashMessage::LoggedOut), "Vous êtes déconnecté.");
        assert_eq!(catalog.text(FlashMessage::LoggedIn), "Connecté.");
        // untouched entries keep the English text
        assert_eq!(
            catalog.text(FlashMessage::AuthenticationFailed),
            "Authentication failed."
        );
    }

    #[test]
    fn test_missing_key_falls_back_to_key() {
        let catalog = MessageCatalog {
            entries: HashMap::new(),
        };
        assert_eq!(
            catalog.text(FlashMessage::LoggedIn),
            "session.flash_notice.logged_in"
        );
    }
}
