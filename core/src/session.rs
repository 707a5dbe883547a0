//! Authenticated session handles.
//!
//! The dispatcher only reads the current token, once per call. Refreshing or
//! dropping credentials belongs to whoever owns the session, and that owner
//! takes the exclusive lock, never the dispatcher.

use std::sync::RwLock;

/// Source of the bearer token attached to every call.
pub trait Session: Send + Sync {
    /// The current access token, or `None` when logged out.
    fn access_token(&self) -> Option<String>;
}

/// A session whose token never changes.
#[derive(Debug, Clone)]
pub struct StaticSession {
    token: String,
}

impl StaticSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl Session for StaticSession {
    fn access_token(&self) -> Option<String> {
        Some(self.token.clone())
    }
}

/// A session that an auth collaborator can refresh or invalidate while
/// facades keep using it.
#[derive(Debug, Default)]
pub struct SharedSession {
    token: RwLock<Option<String>>,
}

impl SharedSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    /// A session with no credentials yet.
    pub fn logged_out() -> Self {
        Self::default()
    }

    pub fn refresh(&self, token: impl Into<String>) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(token.into());
    }

    pub fn invalidate(&self) {
        let mut guard = self.token.write().unwrap_or_else(|e| e.into_inner());
        *guard = None;
    }
}

impl Session for SharedSession {
    fn access_token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}
