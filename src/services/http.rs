// ============================================================================
// HTTP - transport seam
// ============================================================================
// Services build plain request values; a `Transport` executes them.
// In the browser that is fetch/XHR, in tests an in-memory double.
// ============================================================================

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::{UploadFile, UploadProgress};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Mutating requests must carry the anti-forgery header
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Encoded by the transport
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    /// JSON body, already serialized
    pub body: Option<String>,
    pub timeout_ms: Option<u32>,
    /// Send cookies along (`credentials: "include"`)
    pub with_credentials: bool,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
            timeout_ms: None,
            with_credentials: false,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn json_body(&self) -> Option<serde_json::Value> {
        self.body
            .as_deref()
            .and_then(|body| serde_json::from_str(body).ok())
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decodes the body; an empty body decodes as JSON `null`
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ApiError::Decode(format!("Parse error: {}", e)))
    }
}

/// Multipart body for object storage: every ticket field, then the file
#[derive(Clone, PartialEq, Debug)]
pub struct MultipartForm {
    pub fields: Vec<(String, String)>,
    pub file_field: String,
    pub file: UploadFile,
}

pub type ProgressCallback = Rc<dyn Fn(UploadProgress)>;

#[async_trait(?Send)]
pub trait Transport {
    /// Executes a JSON request. `Err` only when no HTTP response was obtained.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;

    /// Posts a multipart form; the transport lets the platform set the
    /// boundary content type. Progress is reported when a callback is given.
    async fn send_form(
        &self,
        url: &str,
        form: MultipartForm,
        on_progress: Option<ProgressCallback>,
    ) -> Result<HttpResponse, ApiError>;
}
