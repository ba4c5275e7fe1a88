// ============================================================================
// LOGIMA WEB - client core (MVVM)
// ============================================================================
// - Views: graph models and page snapshots handed to the JS renderer
// - ViewModels: page state + UI logic
// - Services: ONLY API / storage communication
// - State: observable state with Rc<RefCell>, session, app context
// - Models: structures shared with the backend
// ============================================================================

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;
pub mod viewmodels;
pub mod views;

#[cfg(target_arch = "wasm32")]
mod app;

pub use config::{AppConfig, CONFIG};
pub use error::{ApiError, UploadError};
pub use state::{AppContext, Platform};
