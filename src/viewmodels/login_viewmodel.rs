// ============================================================================
// LOGIN VIEWMODEL - sign in, registration and the OAuth return page
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::models::Credentials;
use crate::services::{AuthService, Navigator};
use crate::state::reactivity::ReactiveState;
use crate::state::session_state::SessionStore;
use crate::utils::constants::MIN_PASSWORD_LEN;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct LoginState {
    pub mode: AuthMode,
    pub submitting: bool,
    pub error: Option<String>,
}

#[derive(Clone, PartialEq, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Normalises the email and checks both fields before anything is sent
    pub fn validate(&self) -> Result<Credentials, ApiError> {
        let email = self.email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ApiError::Validation("Email is required.".to_string()));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "Password must be at least {} characters.",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(Credentials {
            email,
            password: self.password.clone(),
        })
    }
}

pub struct LoginViewModel {
    auth: AuthService,
    session: Rc<SessionStore>,
    navigator: Rc<dyn Navigator>,
    home_path: String,
    oauth_url: String,
    state: ReactiveState<LoginState>,
}

impl LoginViewModel {
    pub fn new(
        config: &AppConfig,
        auth: AuthService,
        session: Rc<SessionStore>,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            auth,
            session,
            navigator,
            home_path: config.home_path.clone(),
            oauth_url: config.oauth_start_url(),
            state: ReactiveState::default(),
        }
    }

    pub fn state(&self) -> ReactiveState<LoginState> {
        self.state.clone()
    }

    pub fn current(&self) -> LoginState {
        self.state.get()
    }

    pub fn set_mode(&self, mode: AuthMode) {
        self.state.update(|s| {
            s.mode = mode;
            s.error = None;
        });
    }

    /// "Continue with Google" target
    pub fn oauth_start_url(&self) -> &str {
        &self.oauth_url
    }

    /// Registers first when in register mode, then signs in. On success the
    /// session is marked authenticated and the user lands on the home page.
    pub async fn submit(&self, form: &LoginForm) -> Result<(), ApiError> {
        if self.state.with(|s| s.submitting) {
            return Ok(());
        }
        self.state.update(|s| s.error = None);

        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(e) => {
                self.state.update(|s| s.error = Some(e.to_string()));
                return Err(e);
            }
        };

        self.state.update(|s| s.submitting = true);
        let result = self.authenticate(&credentials).await;
        self.state.update(|s| {
            s.submitting = false;
            if let Err(e) = &result {
                s.error = Some(e.to_string());
            }
        });

        if result.is_ok() {
            self.session.login_success(credentials.email.clone());
            self.navigator.redirect(&self.home_path);
        }
        result
    }

    /// Landing page after the OAuth provider redirects back. Whatever `me`
    /// says, the user ends up on the home page without a history entry.
    pub async fn complete_oauth(&self) {
        match self.auth.me().await {
            Ok(me) => self.session.login_success(me.email),
            Err(e) => log::warn!("⚠️ OAuth return without a session: {}", e),
        }
        self.navigator.replace(&self.home_path);
    }

    async fn authenticate(&self, credentials: &Credentials) -> Result<(), ApiError> {
        let mode = self.state.with(|s| s.mode);
        if mode == AuthMode::Register {
            self.auth.register(credentials).await?;
        }
        self.auth.login(credentials).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::http::HttpMethod;
    use crate::services::testing::{MockTransport, RecordingNavigator, Reply};
    use crate::services::ApiClient;
    use crate::state::session_state::AuthPhase;
    use crate::utils::cookies::StaticCookies;
    use crate::utils::storage::MemoryStore;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Fixture {
        transport: Rc<MockTransport>,
        navigator: Rc<RecordingNavigator>,
        session: Rc<SessionStore>,
        vm: LoginViewModel,
    }

    fn fixture() -> Fixture {
        let config = AppConfig::default();
        let transport = MockTransport::new();
        let navigator = RecordingNavigator::new();
        let api = ApiClient::new(&config, transport.clone(), Rc::new(StaticCookies::default()));
        let session = Rc::new(SessionStore::new(
            &config,
            AuthService::new(api.clone()),
            Rc::new(MemoryStore::new()),
            navigator.clone(),
        ));
        let vm = LoginViewModel::new(&config, AuthService::new(api), session.clone(), navigator.clone());
        Fixture {
            transport,
            navigator,
            session,
            vm,
        }
    }

    fn form(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn validation_happens_before_any_request() {
        let f = fixture();

        let err = block_on(f.vm.submit(&form("   ", "longenough"))).unwrap_err();
        assert_eq!(err.to_string(), "Email is required.");

        let err = block_on(f.vm.submit(&form("ada@example.com", "short"))).unwrap_err();
        assert_eq!(err.to_string(), "Password must be at least 8 characters.");
        assert_eq!(
            f.vm.current().error.as_deref(),
            Some("Password must be at least 8 characters.")
        );
        assert!(f.transport.requests().is_empty());
    }

    #[test]
    fn login_normalises_email_and_goes_home() {
        let f = fixture();
        f.transport.expect(HttpMethod::Post, "/auth/login", Reply::json(200, json!({"ok": true})));

        block_on(f.vm.submit(&form("  Ada@Example.COM ", "correct horse"))).unwrap();

        assert_eq!(
            f.transport.last_request().json_body(),
            Some(json!({"email": "ada@example.com", "password": "correct horse"}))
        );
        assert_eq!(f.session.current().phase(), AuthPhase::Authenticated);
        assert_eq!(f.navigator.visits(), vec!["/"]);
        assert!(!f.vm.current().submitting);
    }

    #[test]
    fn register_mode_registers_then_logs_in() {
        let f = fixture();
        f.transport.expect(HttpMethod::Post, "/auth/register", Reply::json(200, json!({})));
        f.transport.expect(HttpMethod::Post, "/auth/login", Reply::json(200, json!({})));
        f.vm.set_mode(AuthMode::Register);

        block_on(f.vm.submit(&form("ada@example.com", "correct horse"))).unwrap();

        assert_eq!(f.transport.calls(), vec!["POST /auth/register", "POST /auth/login"]);
    }

    #[test]
    fn server_rejection_is_shown_inline() {
        let f = fixture();
        f.transport.expect(
            HttpMethod::Post,
            "/auth/login",
            Reply::json(401, json!({"detail": "Invalid credentials"})),
        );

        let err = block_on(f.vm.submit(&form("ada@example.com", "wrong password"))).unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(f.vm.current().error.as_deref(), Some("Invalid credentials"));
        assert!(!f.session.is_authenticated());
        assert!(f.navigator.visits().is_empty());
    }

    #[test]
    fn oauth_link_points_at_backend() {
        let f = fixture();
        assert_eq!(f.vm.oauth_start_url(), "http://localhost:8000/auth/google/start");
    }

    #[test]
    fn oauth_return_always_replaces_to_home() {
        let f = fixture();
        f.transport.expect(HttpMethod::Get, "/auth/me", Reply::json(200, json!({"email": "ada@example.com"})));
        block_on(f.vm.complete_oauth());
        assert!(f.session.is_authenticated());

        f.transport.expect(HttpMethod::Get, "/auth/me", Reply::json(401, json!({})));
        block_on(f.vm.complete_oauth());

        assert_eq!(f.navigator.visits(), vec!["replace:/", "replace:/"]);
    }

    #[test]
    fn switching_mode_clears_error() {
        let f = fixture();
        let _ = block_on(f.vm.submit(&form("", "")));
        assert!(f.vm.current().error.is_some());

        f.vm.set_mode(AuthMode::Register);
        assert_eq!(
            f.vm.current(),
            LoginState {
                mode: AuthMode::Register,
                submitting: false,
                error: None,
            }
        );
    }
}
