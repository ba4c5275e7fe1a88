pub mod http;
pub mod api_client;
pub mod browser;
pub mod auth_service;
pub mod project_service;
pub mod upload_service;

#[cfg(target_arch = "wasm32")]
pub mod fetch_transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api_client::ApiClient;
pub use auth_service::AuthService;
pub use browser::{Confirmer, Navigator};
pub use http::{HttpMethod, HttpRequest, HttpResponse, MultipartForm, ProgressCallback, Transport};
pub use project_service::ProjectService;
pub use upload_service::UploadService;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserConfirmer, BrowserNavigator};
#[cfg(target_arch = "wasm32")]
pub use fetch_transport::FetchTransport;
