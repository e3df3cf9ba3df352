//! Handler types and dependencies

use teloxide::types::User;

use crate::navigation::{Navigator, UserKey};

/// Error type for handlers
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependencies required by handlers
#[derive(Clone)]
pub struct HandlerDeps {
    pub navigator: Navigator,
}

impl HandlerDeps {
    /// Create new handler dependencies
    pub fn new(navigator: Navigator) -> Self {
        Self { navigator }
    }
}

/// Session key for a Telegram user
pub fn user_key(user: &User) -> UserKey {
    user.id.0
}
