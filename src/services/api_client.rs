// ============================================================================
// API CLIENT - gateway for every backend call (stateless)
// ============================================================================
// Base URL, 15s timeout, JSON in/out, cookies included, anti-forgery header
// on mutating requests, and one normalised message per error.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::rc::Rc;

use crate::config::AppConfig;
use crate::error::ApiError;
use crate::services::http::{HttpMethod, HttpRequest, HttpResponse, Transport};
use crate::utils::cookies::CookieSource;

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    timeout_ms: u32,
    csrf_cookie: String,
    csrf_header: String,
    transport: Rc<dyn Transport>,
    cookies: Rc<dyn CookieSource>,
}

impl ApiClient {
    pub fn new(config: &AppConfig, transport: Rc<dyn Transport>, cookies: Rc<dyn CookieSource>) -> Self {
        Self {
            base_url: config.base_url().to_string(),
            timeout_ms: config.request_timeout_ms,
            csrf_cookie: config.csrf_cookie_name.clone(),
            csrf_header: config.csrf_header_name.clone(),
            transport,
            cookies,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Transport for direct-to-storage traffic that must bypass the gateway
    pub fn transport(&self) -> Rc<dyn Transport> {
        self.transport.clone()
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, Vec::new(), None::<&()>).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Get, path, query, None::<&()>).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.request(HttpMethod::Post, path, Vec::new(), Some(body)).await
    }

    pub async fn post_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
    ) -> Result<T, ApiError> {
        self.request(HttpMethod::Post, path, query, None::<&()>).await
    }

    pub async fn patch<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        self.request(HttpMethod::Patch, path, Vec::new(), Some(body)).await
    }

    /// Sends the request and ignores whatever body comes back
    pub async fn send_ignoring_body<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), ApiError> {
        self.execute(method, path, Vec::new(), body).await.map(|_| ())
    }

    pub async fn request<B: Serialize, T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        self.execute(method, path, query, body).await?.json()
    }

    async fn execute<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_request(method, path, query, body)?;

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("📴 {} {} failed: {}", method.as_str(), path, e);
                return Err(e);
            }
        };

        if response.ok() {
            Ok(response)
        } else {
            let error = ApiError::from_response(response.status, &response.body);
            log::warn!("❌ {} {} → HTTP {}: {}", method.as_str(), path, response.status, error);
            Err(error)
        }
    }

    fn build_request<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        query: Vec<(String, String)>,
        body: Option<&B>,
    ) -> Result<HttpRequest, ApiError> {
        let mut request = HttpRequest::new(method, format!("{}{}", self.base_url, path));
        request.query = query;
        request.timeout_ms = Some(self.timeout_ms);
        request.with_credentials = true;
        request.headers.push(("Content-Type".to_string(), "application/json".to_string()));
        request.headers.push(("Accept".to_string(), "application/json".to_string()));

        if method.is_mutating() {
            match self.cookies.get(&self.csrf_cookie) {
                Some(token) => request.headers.push((self.csrf_header.clone(), token)),
                None => log::debug!("No {} cookie; sending {} {} without it", self.csrf_cookie, method.as_str(), path),
            }
        }

        if let Some(body) = body {
            let json = serde_json::to_string(body)
                .map_err(|e| ApiError::Decode(format!("Serialization error: {}", e)))?;
            request.body = Some(json);
        }

        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::{MockTransport, Reply};
    use crate::utils::cookies::StaticCookies;
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn client(transport: &Rc<MockTransport>, cookies: &str) -> ApiClient {
        ApiClient::new(
            &AppConfig::default(),
            transport.clone(),
            Rc::new(StaticCookies::new(cookies)),
        )
    }

    #[test]
    fn mutating_requests_replay_csrf_cookie() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Patch, "/projects/api/1", Reply::json(200, json!({"ok": true})));
        let api = client(&transport, "csrf_token=s3cr3t");

        let _: Value = block_on(api.patch("/projects/api/1", &json!({"status": "inactive"}))).unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.url, "http://localhost:8000/projects/api/1");
        assert_eq!(sent.header("X-CSRF-Token"), Some("s3cr3t"));
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
        assert_eq!(sent.timeout_ms, Some(15_000));
        assert!(sent.with_credentials);
        assert_eq!(sent.json_body(), Some(json!({"status": "inactive"})));
    }

    #[test]
    fn reads_do_not_carry_csrf_header() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/auth/me", Reply::json(200, json!({"email": "a@b.c"})));
        let api = client(&transport, "csrf_token=s3cr3t");

        let _: Value = block_on(api.get("/auth/me")).unwrap();
        assert_eq!(transport.last_request().header("X-CSRF-Token"), None);
    }

    #[test]
    fn mutation_without_csrf_cookie_omits_header() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Post, "/projects/api/create", Reply::json(201, json!({})));
        let api = client(&transport, "session=xyz");

        let _: Value = block_on(api.post("/projects/api/create", &json!({"name": "Pilot"}))).unwrap();

        let sent = transport.last_request();
        assert_eq!(sent.header("X-CSRF-Token"), None);
        assert_eq!(sent.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn server_errors_are_normalised() {
        let transport = MockTransport::new();
        transport.expect(
            HttpMethod::Post,
            "/auth/login",
            Reply::json(401, json!({"detail": "Invalid credentials"})),
        );
        let api = client(&transport, "");

        let err = block_on(api.post::<_, Value>("/auth/login", &json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn transport_failures_keep_transport_text() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/projects/api/list", Reply::network("Network Error"));
        let api = client(&transport, "");

        let err = block_on(api.get::<Value>("/projects/api/list")).unwrap_err();
        assert_eq!(err, ApiError::Transport("Network Error".into()));
    }

    #[test]
    fn undecodable_success_body_is_an_error() {
        let transport = MockTransport::new();
        transport.expect(HttpMethod::Get, "/auth/me", Reply::raw(200, "<html>"));
        let api = client(&transport, "");

        let err = block_on(api.get::<crate::models::MeResponse>("/auth/me")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
