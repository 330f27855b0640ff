//! Explicit session object handed to forms and request builders

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::RwLock;

use tracing::info;

use crate::models::{LoginUser, UserProfile};

/// Holder of the signed-in administrator and their bearer credential
pub trait SessionStore: Send + Sync {
    /// Record a successful login
    fn sign_in(&self, user: LoginUser);

    /// Forget the current user and credential
    fn clear(&self);

    /// Bearer credential to attach to mutating requests
    fn credential(&self) -> Option<String>;

    fn current_user(&self) -> Option<LoginUser>;

    /// Refresh name and email after a profile change; the credential stays
    fn update_user(&self, profile: &UserProfile);

    fn is_logged_in(&self) -> bool {
        self.credential().is_some()
    }
}

/// Session kept in process memory only
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    user: RwLock<Option<LoginUser>>,
    clears: AtomicUsize,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Session for a credential obtained elsewhere (e.g. `NEST_TOKEN`)
    pub fn with_token(token: impl Into<String>) -> Self {
        let store = Self::new();
        store.sign_in(LoginUser {
            id: String::new(),
            name: String::new(),
            email: String::new(),
            token: token.into(),
        });
        store
    }

    /// Number of times [`SessionStore::clear`] has run
    pub fn clear_count(&self) -> usize {
        self.clears.load(Ordering::SeqCst)
    }
}

impl SessionStore for MemorySessionStore {
    fn sign_in(&self, user: LoginUser) {
        let who = if user.email.is_empty() {
            "token holder"
        } else {
            user.email.as_str()
        };
        info!("Signed in as {}", who);
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    fn clear(&self) {
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.clears.fetch_add(1, Ordering::SeqCst);
        info!("Session cleared");
    }

    fn credential(&self) -> Option<String> {
        self.current_user()
            .map(|u| u.token)
            .filter(|token| !token.is_empty())
    }

    fn current_user(&self) -> Option<LoginUser> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn update_user(&self, profile: &UserProfile) {
        let mut guard = self.user.write().unwrap_or_else(|e| e.into_inner());
        let Some(user) = guard.as_mut() else {
            return;
        };
        if let Some(name) = profile.name.as_deref().filter(|n| !n.is_empty()) {
            user.name = name.to_string();
        }
        if let Some(email) = profile.email.as_deref().filter(|e| !e.is_empty()) {
            user.email = email.to_string();
        }
    }
}
