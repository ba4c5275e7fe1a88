use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_CSRF_COOKIE, DEFAULT_CSRF_HEADER, DEFAULT_HOME_PATH,
    DEFAULT_LOGIN_PATH, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SESSION_STORAGE_KEY,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub request_timeout_ms: u32,
    pub enable_logging: bool,
    pub login_path: String,
    pub home_path: String,
    pub csrf_cookie_name: String,
    pub csrf_header_name: String,
    pub session_storage_key: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            enable_logging: true,
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            home_path: DEFAULT_HOME_PATH.to_string(),
            csrf_cookie_name: DEFAULT_CSRF_COOKIE.to_string(),
            csrf_header_name: DEFAULT_CSRF_HEADER.to_string(),
            session_storage_key: DEFAULT_SESSION_STORAGE_KEY.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads the configuration from compile-time environment variables
    pub fn from_env() -> Self {
        Self {
            api_base_url: option_env!("API_BASE_URL")
                .unwrap_or(DEFAULT_API_BASE_URL)
                .to_string(),
            request_timeout_ms: option_env!("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS),
            enable_logging: option_env!("ENABLE_LOGGING")
                .unwrap_or("true")
                .parse()
                .unwrap_or(true),
            login_path: option_env!("LOGIN_PATH")
                .unwrap_or(DEFAULT_LOGIN_PATH)
                .to_string(),
            home_path: option_env!("HOME_PATH")
                .unwrap_or(DEFAULT_HOME_PATH)
                .to_string(),
            csrf_cookie_name: option_env!("CSRF_COOKIE_NAME")
                .unwrap_or(DEFAULT_CSRF_COOKIE)
                .to_string(),
            csrf_header_name: option_env!("CSRF_HEADER_NAME")
                .unwrap_or(DEFAULT_CSRF_HEADER)
                .to_string(),
            session_storage_key: option_env!("SESSION_STORAGE_KEY")
                .unwrap_or(DEFAULT_SESSION_STORAGE_KEY)
                .to_string(),
        }
    }

    /// Base URL without trailing slash, so paths can always start with `/`
    pub fn base_url(&self) -> &str {
        self.api_base_url.trim_end_matches('/')
    }

    pub fn is_logging_enabled(&self) -> bool {
        self.enable_logging
    }

    /// Where the "Continue with Google" link points
    pub fn oauth_start_url(&self) -> String {
        format!("{}{}", self.base_url(), crate::utils::constants::OAUTH_GOOGLE_START_PATH)
    }
}

// Global static configuration
lazy_static::lazy_static! {
    pub static ref CONFIG: AppConfig = AppConfig::from_env();
}
