use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use client::{CredentialStore, LearningApi};
use services::Clock;

/// What the composition root provides to the views: the remote service
/// boundary and the credential store behind it.
pub trait UiApp: Send + Sync {
    fn api(&self) -> Arc<dyn LearningApi>;
    fn credentials(&self) -> Arc<dyn CredentialStore>;
    fn clock(&self) -> Clock;
}

#[derive(Clone)]
pub struct AppContext {
    api: Arc<dyn LearningApi>,
    credentials: Arc<dyn CredentialStore>,
    clock: Clock,
    logging_out: Arc<AtomicBool>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            api: app.api(),
            credentials: app.credentials(),
            clock: app.clock(),
            logging_out: Arc::new(AtomicBool::new(false)),
        }
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn LearningApi> {
        Arc::clone(&self.api)
    }

    #[must_use]
    pub fn credentials(&self) -> Arc<dyn CredentialStore> {
        Arc::clone(&self.credentials)
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Latch the expired-credential logout. Several in-flight requests can
    /// observe the same 401; only the first caller gets `true` and performs
    /// the credential clear plus redirect.
    #[must_use]
    pub fn begin_logout(&self) -> bool {
        !self.logging_out.swap(true, Ordering::AcqRel)
    }

    /// Re-arm the latch after a fresh login.
    pub fn reset_logout(&self) {
        self.logging_out.store(false, Ordering::Release);
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use client::{FakeLearningApi, InMemoryCredentialStore};

    struct TestApp;

    impl UiApp for TestApp {
        fn api(&self) -> Arc<dyn LearningApi> {
            Arc::new(FakeLearningApi::new())
        }

        fn credentials(&self) -> Arc<dyn CredentialStore> {
            Arc::new(InMemoryCredentialStore::default())
        }

        fn clock(&self) -> Clock {
            Clock::fixed(til_core::time::fixed_now())
        }
    }

    #[test]
    fn logout_latch_fires_once_until_reset() {
        let app: Arc<dyn UiApp> = Arc::new(TestApp);
        let ctx = build_app_context(&app);

        assert!(ctx.begin_logout());
        assert!(!ctx.begin_logout());
        ctx.reset_logout();
        assert!(ctx.begin_logout());
    }
}
