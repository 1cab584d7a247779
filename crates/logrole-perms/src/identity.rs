//! Identity lookup.
//!
//! The caller authenticates a request (Basic Auth, session cookie, ...) and
//! hands us a name. Turning that name into a [`User`] goes through
//! [`UserFinder`], so nothing in the core reaches for global state.

use std::collections::HashMap;
use std::sync::Arc;

use crate::user::User;

/// Resolve an authenticated name to a user.
pub trait UserFinder: Send + Sync {
    /// Find the user for `name`, if one exists.
    fn find(&self, name: &str) -> Option<Arc<User>>;
}

/// In-memory user registry.
///
/// Built once at startup and read-only afterwards. Several names may share
/// one identity.
#[derive(Debug, Default, Clone)]
pub struct UserMap {
    users: HashMap<String, Arc<User>>,
}

impl UserMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map every name to the same shared identity.
    pub fn shared<I, S>(names: I, user: User) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let user = Arc::new(user);
        let users = names
            .into_iter()
            .map(|name| (name.into(), Arc::clone(&user)))
            .collect();
        Self { users }
    }

    /// Register a user under `name`, replacing any previous entry.
    pub fn with_user(mut self, name: impl Into<String>, user: User) -> Self {
        self.users.insert(name.into(), Arc::new(user));
        self
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserFinder for UserMap {
    fn find(&self, name: &str) -> Option<Arc<User>> {
        self.users.get(name).cloned()
    }
}
