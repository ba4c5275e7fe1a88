use serde_json::Value;

use crate::error::ApiError;
use crate::models::{Credentials, MeResponse};
use crate::services::api_client::ApiClient;
use crate::services::http::HttpMethod;
use crate::utils::constants::{AUTH_LOGIN_PATH, AUTH_LOGOUT_PATH, AUTH_ME_PATH, AUTH_REGISTER_PATH};

/// Authentication endpoints. The session itself is an httpOnly cookie set by
/// the backend; nothing here ever sees it.
#[derive(Clone)]
pub struct AuthService {
    api: ApiClient,
}

impl AuthService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        log::info!("📝 Registering account {}", credentials.email);
        self.api
            .post::<_, Value>(AUTH_REGISTER_PATH, credentials)
            .await
            .map(|_| ())
    }

    /// On success the backend sets the session cookie
    pub async fn login(&self, credentials: &Credentials) -> Result<(), ApiError> {
        log::info!("🔐 Signing in {}", credentials.email);
        self.api
            .post::<_, Value>(AUTH_LOGIN_PATH, credentials)
            .await
            .map(|_| ())
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.api
            .send_ignoring_body::<()>(HttpMethod::Post, AUTH_LOGOUT_PATH, None)
            .await
    }

    /// Who the current cookie belongs to; an error means no valid session
    pub async fn me(&self) -> Result<MeResponse, ApiError> {
        self.api.get(AUTH_ME_PATH).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::services::testing::{MockTransport, Reply};
    use crate::utils::cookies::StaticCookies;
    use futures::executor::block_on;
    use serde_json::json;
    use std::rc::Rc;

    fn service(transport: &Rc<MockTransport>) -> AuthService {
        AuthService::new(ApiClient::new(
            &AppConfig::default(),
            transport.clone(),
            Rc::new(StaticCookies::new("csrf_token=abc")),
        ))
    }

    #[test]
    fn login_posts_credentials() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Post, "/auth/login", Reply::json(200, json!({"ok": true})));

        let credentials = Credentials {
            email: "ada@example.com".into(),
            password: "correct horse".into(),
        };
        block_on(service(&transport).login(&credentials)).unwrap();

        assert_eq!(
            transport.last_request().json_body(),
            Some(json!({"email": "ada@example.com", "password": "correct horse"}))
        );
    }

    #[test]
    fn logout_accepts_empty_body() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Post, "/auth/logout", Reply::raw(204, ""));

        block_on(service(&transport).logout()).unwrap();
        assert_eq!(transport.last_request().header("X-CSRF-Token"), Some("abc"));
    }

    #[test]
    fn me_reports_unauthenticated_as_error() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/auth/me", Reply::json(401, json!({"detail": "Not authenticated"})));

        let err = block_on(service(&transport).me()).unwrap_err();
        assert_eq!(err.to_string(), "Not authenticated");
    }

    #[test]
    fn credentials_debug_hides_password() {
        let credentials = Credentials {
            email: "ada@example.com".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{:?}", credentials).contains("hunter22"));
    }
}
