/// Backend base URL when `API_BASE_URL` is not set at build time
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";

/// Gateway timeout (15s)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u32 = 15_000;

pub const DEFAULT_LOGIN_PATH: &str = "/login";
pub const DEFAULT_HOME_PATH: &str = "/";

/// Anti-forgery token: read from this cookie, replayed in this header
pub const DEFAULT_CSRF_COOKIE: &str = "csrf_token";
pub const DEFAULT_CSRF_HEADER: &str = "X-CSRF-Token";

/// sessionStorage key for the `{user, isAuthed}` snapshot
pub const DEFAULT_SESSION_STORAGE_KEY: &str = "auth";

// Backend routes
pub const AUTH_REGISTER_PATH: &str = "/auth/register";
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_LOGOUT_PATH: &str = "/auth/logout";
pub const AUTH_ME_PATH: &str = "/auth/me";
pub const OAUTH_GOOGLE_START_PATH: &str = "/auth/google/start";

pub const PROJECTS_CREATE_PATH: &str = "/projects/api/create";
pub const PROJECTS_LIST_PATH: &str = "/projects/api/list";
pub const PROJECTS_BASE_PATH: &str = "/projects/api";

pub const UPLOADS_PRESIGN_PATH: &str = "/uploads/presign-post";

/// Minimum password length accepted by the login form
pub const MIN_PASSWORD_LEN: usize = 8;

pub const DELETE_PROJECT_PROMPT: &str = "Delete this project? This can\u{2019}t be undone.";
