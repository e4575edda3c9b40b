//! Flash Messages
//!
//! Two tiers:
//! - [`Flash::set`] survives until the end of the *next* request (used
//!   before a redirect).
//! - [`Flash::now`] is visible to the current render only and never stored.
//!
//! At the start of every request [`Flash::sweep`] moves what the previous
//! request left behind into the current-render tier.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where a message is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashSlot {
    Notice,
    LoginError,
}

impl FlashSlot {
    pub const fn css_class(&self) -> &'static str {
        match self {
            FlashSlot::Notice => "notice",
            FlashSlot::LoginError => "error",
        }
    }
}

/// What a message says; resolved to text through the message catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlashMessage {
    LoggedIn,
    AuthenticationFailed,
    LoggedOut,
}

impl FlashMessage {
    pub const ALL: [FlashMessage; 3] = [
        FlashMessage::LoggedIn,
        FlashMessage::AuthenticationFailed,
        FlashMessage::LoggedOut,
    ];

    /// Catalog key
    pub const fn key(&self) -> &'static str {
        match self {
            FlashMessage::LoggedIn => "session.flash_notice.logged_in",
            FlashMessage::AuthenticationFailed => "session.flash_notice.authentication_failed",
            FlashMessage::LoggedOut => "session.flash_notice.logged_out",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    #[serde(default)]
    next: BTreeMap<FlashSlot, FlashMessage>,
    #[serde(skip)]
    now: BTreeMap<FlashSlot, FlashMessage>,
}

impl Flash {
    /// Show in this request's render *and* the next request
    pub fn set(&mut self, slot: FlashSlot, message: FlashMessage) {
        self.next.insert(slot, message);
    }

    /// Show in this request's render only
    pub fn now(&mut self, slot: FlashSlot, message: FlashMessage) {
        self.now.insert(slot, message);
    }

    /// Start of request: last request's messages become current, nothing is carried
    pub fn sweep(&mut self) {
        self.now = std::mem::take(&mut self.next);
    }

    /// Messages for the current render, `now` tier first
    pub fn visible(&self) -> Vec<(FlashSlot, FlashMessage)> {
        let mut merged = self.now.clone();
        for (slot, message) in &self.next {
            merged.entry(*slot).or_insert(*message);
        }
        merged.into_iter().collect()
    }

    pub fn get(&self, slot: FlashSlot) -> Option<FlashMessage> {
        self.now.get(&slot).or_else(|| self.next.get(&slot)).copied()
    }

    /// Message that will still be there on the next request
    pub fn pending(&self, slot: FlashSlot) -> Option<FlashMessage> {
        self.next.get(&slot).copied()
    }

    pub fn has_pending(&self) -> bool {
        !self.next.is_empty()
    }

    /// Copy containing only what must survive to the next request
    pub fn carried(&self) -> Flash {
        Flash {
            next: self.next.clone(),
            now: BTreeMap::new(),
        }
    }
}
