// ============================================================================
// SESSION STATE - who is signed in, per browser tab
// ============================================================================
// Unknown → Checking → Authenticated | Unauthenticated
// login_success: any → Authenticated;  logout: any → Unauthenticated
// The snapshot {user, isAuthed} is mirrored to sessionStorage on every
// transition, so it survives reloads but not new tabs.
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::{SessionSnapshot, User};
use crate::services::{AuthService, Navigator};
use crate::state::reactivity::ReactiveState;
use crate::utils::storage::{load_from_storage, remove_from_storage, save_to_storage, KeyValueStore};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AuthPhase {
    #[default]
    Unknown,
    Checking,
    Authenticated,
    Unauthenticated,
}

/// Fields are private so `is_authenticated() == user().is_some()` always holds
#[derive(Clone, PartialEq, Debug, Default)]
pub struct SessionState {
    phase: AuthPhase,
    user: Option<User>,
}

impl SessionState {
    fn checking() -> Self {
        Self {
            phase: AuthPhase::Checking,
            user: None,
        }
    }

    fn authenticated(user: User) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            user: Some(user),
        }
    }

    fn unauthenticated() -> Self {
        Self {
            phase: AuthPhase::Unauthenticated,
            user: None,
        }
    }

    fn from_snapshot(snapshot: SessionSnapshot) -> Self {
        match snapshot.user {
            Some(user) => Self::authenticated(user),
            None => Self::default(),
        }
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            user: self.user.clone(),
            is_authed: self.is_authenticated(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LogoutMode {
    /// Clear state and send the user to the login view
    Redirect,
    /// Clear state only
    Silent,
}

pub struct SessionStore {
    state: ReactiveState<SessionState>,
    auth: AuthService,
    storage: Rc<dyn KeyValueStore>,
    storage_key: String,
    navigator: Rc<dyn Navigator>,
    login_path: String,
}

impl SessionStore {
    /// Builds the store, restoring whatever this tab persisted earlier
    pub fn new(
        config: &AppConfig,
        auth: AuthService,
        storage: Rc<dyn KeyValueStore>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        let restored = load_from_storage::<SessionSnapshot>(storage.as_ref(), &config.session_storage_key)
            .map(SessionState::from_snapshot)
            .unwrap_or_default();

        if restored.is_authenticated() {
            log::info!("💾 Session restored from this tab");
        }

        Self {
            state: ReactiveState::new(restored),
            auth,
            storage,
            storage_key: config.session_storage_key.clone(),
            navigator,
            login_path: config.login_path.clone(),
        }
    }

    /// Observable state, for views that re-render on change
    pub fn state(&self) -> ReactiveState<SessionState> {
        self.state.clone()
    }

    pub fn current(&self) -> SessionState {
        self.state.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(SessionState::is_authenticated)
    }

    pub fn user(&self) -> Option<User> {
        self.state.with(|s| s.user.clone())
    }

    /// Asks the backend who the cookie belongs to. No-op when already
    /// authenticated; failures leave the store unauthenticated, never error.
    pub async fn hydrate_from_server(&self) {
        if self.is_authenticated() {
            return;
        }

        self.transition(SessionState::checking());

        let result = self.auth.me().await;

        // A login that landed while we waited wins over this answer
        if self.state.with(|s| s.phase) != AuthPhase::Checking {
            return;
        }

        match result {
            Ok(me) => {
                log::info!("✅ Session hydrated for {}", me.email);
                self.transition(SessionState::authenticated(User { email: me.email }));
            }
            Err(e) => {
                log::debug!("No server session: {}", e);
                self.transition(SessionState::unauthenticated());
            }
        }
    }

    /// Call after a successful credential or OAuth round trip
    pub fn login_success(&self, email: impl Into<String>) {
        let email = email.into();
        log::info!("🔐 Signed in as {}", email);
        self.transition(SessionState::authenticated(User { email }));
    }

    /// Best-effort server logout, then local clear. The server call may fail;
    /// the local state is cleared regardless.
    pub async fn logout(&self, mode: LogoutMode) {
        if let Err(e) = self.auth.logout().await {
            log::warn!("⚠️ Logout request failed, clearing locally anyway: {}", e);
        }

        self.transition(SessionState::unauthenticated());
        log::info!("👋 Signed out");

        if mode == LogoutMode::Redirect {
            self.navigator.redirect(&self.login_path);
        }
    }

    /// Drops the persisted snapshot and subscribers (application teardown)
    pub fn dispose(&self) {
        self.state.clear_subscribers();
        if let Err(e) = remove_from_storage(self.storage.as_ref(), &self.storage_key) {
            log::warn!("⚠️ {}", e);
        }
    }

    fn transition(&self, next: SessionState) {
        if let Err(e) = save_to_storage(self.storage.as_ref(), &self.storage_key, &next.snapshot()) {
            log::warn!("⚠️ Could not persist session: {}", e);
        }
        self.state.set(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::HttpMethod;
    use crate::services::testing::{MockTransport, RecordingNavigator, Reply};
    use crate::services::ApiClient;
    use crate::utils::cookies::StaticCookies;
    use crate::utils::storage::MemoryStore;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        transport: Rc<MockTransport>,
        storage: Rc<MemoryStore>,
        navigator: Rc<RecordingNavigator>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                transport: MockTransport::new(),
                storage: Rc::new(MemoryStore::new()),
                navigator: RecordingNavigator::new(),
            }
        }

        fn store(&self) -> SessionStore {
            let config = AppConfig::default();
            let api = ApiClient::new(&config, self.transport.clone(), Rc::new(StaticCookies::default()));
            SessionStore::new(
                &config,
                AuthService::new(api),
                self.storage.clone(),
                self.navigator.clone(),
            )
        }

        fn persisted(&self) -> Option<SessionSnapshot> {
            load_from_storage(self.storage.as_ref(), "auth")
        }
    }

    #[test]
    fn starts_unknown_and_empty() {
        let fixture = Fixture::new();
        let store = fixture.store();
        assert_eq!(store.current().phase(), AuthPhase::Unknown);
        assert!(!store.is_authenticated());
        assert_eq!(store.user(), None);
    }

    #[test]
    fn login_then_logout_ends_signed_out() {
        let fixture = Fixture::new();
        fixture.transport.expect(HttpMethod::Post, "/auth/logout", Reply::raw(200, ""));
        let store = fixture.store();

        store.login_success("ada@example.com");
        assert_eq!(store.current().phase(), AuthPhase::Authenticated);
        assert_eq!(
            fixture.persisted(),
            Some(SessionSnapshot {
                user: Some(User { email: "ada@example.com".into() }),
                is_authed: true,
            })
        );

        block_on(store.logout(LogoutMode::Redirect));

        assert_eq!(store.current().phase(), AuthPhase::Unauthenticated);
        assert_eq!(store.current().snapshot(), SessionSnapshot { user: None, is_authed: false });
        assert_eq!(fixture.persisted(), Some(SessionSnapshot::default()));
        assert_eq!(fixture.navigator.visits(), vec!["/login"]);
    }

    #[test]
    fn logout_failure_is_swallowed_and_silent_mode_stays_put() {
        let fixture = Fixture::new();
        fixture.transport.expect(HttpMethod::Post, "/auth/logout", Reply::network("Network Error"));
        let store = fixture.store();
        store.login_success("ada@example.com");

        block_on(store.logout(LogoutMode::Silent));

        assert!(!store.is_authenticated());
        assert!(fixture.navigator.visits().is_empty());
    }

    #[test]
    fn hydrate_is_a_no_op_when_authenticated() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.login_success("ada@example.com");

        // No expectation registered: any request would panic the mock
        block_on(store.hydrate_from_server());

        assert!(fixture.transport.requests().is_empty());
        assert!(store.is_authenticated());
    }

    #[test]
    fn hydrate_picks_up_cookie_session() {
        let fixture = Fixture::new();
        fixture.transport.expect(
            HttpMethod::Get,
            "/auth/me",
            Reply::json(200, json!({"email": "ada@example.com", "name": "Ada"})),
        );
        let store = fixture.store();

        block_on(store.hydrate_from_server());

        assert_eq!(store.current().phase(), AuthPhase::Authenticated);
        assert_eq!(store.user(), Some(User { email: "ada@example.com".into() }));
    }

    #[test]
    fn hydrate_failure_leaves_store_unauthenticated() {
        let fixture = Fixture::new();
        fixture.transport.expect(HttpMethod::Get, "/auth/me", Reply::json(401, json!({"detail": "nope"})));
        let store = fixture.store();

        block_on(store.hydrate_from_server());

        assert_eq!(store.current().phase(), AuthPhase::Unauthenticated);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn reload_restores_persisted_session() {
        let fixture = Fixture::new();
        fixture.store().login_success("ada@example.com");

        let reloaded = fixture.store();
        assert!(reloaded.is_authenticated());
        assert_eq!(reloaded.current().phase(), AuthPhase::Authenticated);
    }

    #[test]
    fn login_during_hydration_is_not_overwritten() {
        let fixture = Fixture::new();
        let gate = fixture.transport.gate(HttpMethod::Get, "/auth/me");
        let store = Rc::new(fixture.store());

        let mut pool = LocalPool::new();
        let hydrating = store.clone();
        pool.spawner()
            .spawn_local(async move { hydrating.hydrate_from_server().await })
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(store.current().phase(), AuthPhase::Checking);

        store.login_success("grace@example.com");
        let _ = gate.send(Ok(crate::services::HttpResponse::new(401, "{}")));
        pool.run_until_stalled();

        assert_eq!(store.user(), Some(User { email: "grace@example.com".into() }));
    }

    #[test]
    fn subscribers_observe_transitions() {
        let fixture = Fixture::new();
        let store = fixture.store();
        let phases = Rc::new(std::cell::RefCell::new(Vec::new()));
        let state = store.state();
        let sink = phases.clone();
        let reader = state.clone();
        state.subscribe(move || sink.borrow_mut().push(reader.get().phase()));

        store.login_success("ada@example.com");
        assert_eq!(*phases.borrow(), vec![AuthPhase::Authenticated]);
    }

    #[test]
    fn dispose_forgets_the_tab_snapshot() {
        let fixture = Fixture::new();
        let store = fixture.store();
        store.login_success("ada@example.com");

        store.dispose();
        assert_eq!(fixture.persisted(), None);
    }
}
