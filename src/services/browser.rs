// ============================================================================
// BROWSER - navigation and confirmation seams
// ============================================================================

/// Moves the user to another view
pub trait Navigator {
    /// Full navigation; the current page is left in history
    fn redirect(&self, path: &str);

    /// Navigation that replaces the current history entry
    fn replace(&self, path: &str);
}

/// Interactive yes/no prompt
pub trait Confirmer {
    fn confirm(&self, message: &str) -> bool;
}

#[cfg(target_arch = "wasm32")]
pub struct BrowserNavigator;

#[cfg(target_arch = "wasm32")]
impl Navigator for BrowserNavigator {
    fn redirect(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if window.location().set_href(path).is_err() {
                log::error!("❌ Navigation to {} failed", path);
            }
        }
    }

    fn replace(&self, path: &str) {
        if let Some(window) = web_sys::window() {
            if window.location().replace(path).is_err() {
                log::error!("❌ Navigation to {} failed", path);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub struct BrowserConfirmer;

#[cfg(target_arch = "wasm32")]
impl Confirmer for BrowserConfirmer {
    fn confirm(&self, message: &str) -> bool {
        web_sys::window()
            .and_then(|w| w.confirm_with_message(message).ok())
            .unwrap_or(false)
    }
}
