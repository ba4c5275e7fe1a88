// ============================================================================
// ROUTE GUARD - protected pages
// ============================================================================
// Every mount asks the backend whether the cookie is still valid; the cached
// session is not trusted here. A rejected check sends the user to the login
// page. The page they asked for is not remembered.
// ============================================================================

use std::rc::Rc;

use crate::services::{AuthService, Navigator};
use crate::state::reactivity::ReactiveState;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum GuardState {
    /// Check in flight; render a placeholder
    #[default]
    Pending,
    Allowed,
    Redirected,
}

pub struct RouteGuard {
    auth: AuthService,
    navigator: Rc<dyn Navigator>,
    login_path: String,
    state: ReactiveState<GuardState>,
}

impl RouteGuard {
    pub fn new(auth: AuthService, navigator: Rc<dyn Navigator>, login_path: impl Into<String>) -> Self {
        Self {
            auth,
            navigator,
            login_path: login_path.into(),
            state: ReactiveState::default(),
        }
    }

    pub fn state(&self) -> ReactiveState<GuardState> {
        self.state.clone()
    }

    pub fn current(&self) -> GuardState {
        self.state.get()
    }

    pub async fn on_mount(&self) -> GuardState {
        self.state.set(GuardState::Pending);

        let next = match self.auth.me().await {
            Ok(_) => GuardState::Allowed,
            Err(e) => {
                log::warn!("🚫 Access check failed ({}), redirecting to {}", e, self.login_path);
                self.navigator.redirect(&self.login_path);
                GuardState::Redirected
            }
        };

        self.state.set(next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::http::{HttpMethod, HttpResponse};
    use crate::services::testing::{MockTransport, RecordingNavigator, Reply};
    use crate::services::ApiClient;
    use crate::utils::cookies::StaticCookies;
    use futures::executor::{block_on, LocalPool};
    use futures::task::LocalSpawnExt;
    use serde_json::json;

    fn guard(transport: &Rc<MockTransport>, navigator: &Rc<RecordingNavigator>) -> Rc<RouteGuard> {
        let api = ApiClient::new(&AppConfig::default(), transport.clone(), Rc::new(StaticCookies::default()));
        Rc::new(RouteGuard::new(AuthService::new(api), navigator.clone(), "/login"))
    }

    #[test]
    fn valid_cookie_lets_the_page_render() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/auth/me", Reply::json(200, json!({"email": "ada@example.com"})));
        let navigator = RecordingNavigator::new();
        let guard = guard(&transport, &navigator);

        assert_eq!(block_on(guard.on_mount()), GuardState::Allowed);
        assert!(navigator.visits().is_empty());
    }

    #[test]
    fn rejected_check_redirects_to_login() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/auth/me", Reply::json(401, json!({"detail": "Not authenticated"})));
        let navigator = RecordingNavigator::new();
        let guard = guard(&transport, &navigator);

        assert_eq!(block_on(guard.on_mount()), GuardState::Redirected);
        assert_eq!(guard.current(), GuardState::Redirected);
        assert_eq!(navigator.visits(), vec!["/login"]);
    }

    #[test]
    fn stays_pending_while_checking() {
        let transport = MockTransport::new();
        let gate = transport.gate(HttpMethod::Get, "/auth/me");
        let navigator = RecordingNavigator::new();
        let guard = guard(&transport, &navigator);

        let mut pool = LocalPool::new();
        let mounting = guard.clone();
        pool.spawner()
            .spawn_local(async move {
                mounting.on_mount().await;
            })
            .unwrap();
        pool.run_until_stalled();
        assert_eq!(guard.current(), GuardState::Pending);

        let _ = gate.send(Ok(HttpResponse::new(200, r#"{"email":"ada@example.com"}"#)));
        pool.run_until_stalled();
        assert_eq!(guard.current(), GuardState::Allowed);
    }

    #[test]
    fn network_failure_also_redirects() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/auth/me", Reply::network("Network Error"));
        let navigator = RecordingNavigator::new();
        let guard = guard(&transport, &navigator);

        block_on(guard.on_mount());
        assert_eq!(navigator.visits(), vec!["/login"]);
    }
}
