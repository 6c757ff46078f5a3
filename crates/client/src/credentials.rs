use std::sync::RwLock;

/// Boundary for bearer-credential storage. The shell only ever needs to
/// read the token, replace it after login, and clear it on logout; where
/// the token actually lives (memory, keychain, file) is the host's concern.
pub trait CredentialStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str);
    fn clear(&self);
}

/// Process-local credential store, used by tests and as a fallback when no
/// persistent store is configured.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl InMemoryCredentialStore {
    #[must_use]
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn token(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn set_token(&self, token: &str) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_and_clear_roundtrip() {
        let store = InMemoryCredentialStore::default();
        assert!(store.token().is_none());
        store.set_token("abc");
        assert_eq!(store.token().as_deref(), Some("abc"));
        store.clear();
        assert!(store.token().is_none());
    }
}
