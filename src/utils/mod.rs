// Shared utilities

pub mod constants;
pub mod cookies;
pub mod dates;
pub mod mime;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod flow_ffi;

pub use constants::*;
pub use cookies::{cookie_value, CookieSource, StaticCookies};
pub use dates::format_utc;
pub use mime::{mime_from_filename, OCTET_STREAM};
pub use storage::{load_from_storage, remove_from_storage, save_to_storage, KeyValueStore, MemoryStore};
