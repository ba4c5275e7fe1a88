// ============================================================================
// COOKIES - client-visible cookies
// ============================================================================
// Only the anti-forgery cookie is readable; the session cookie is httpOnly.
// ============================================================================

/// Source of client-visible cookies
pub trait CookieSource {
    fn get(&self, name: &str) -> Option<String>;
}

/// Finds `name` in a `document.cookie` style string (`a=1; b=2`)
pub fn cookie_value(cookie_header: &str, name: &str) -> Option<String> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Fixed cookie jar, for non-browser targets and tests
#[derive(Clone, Debug, Default)]
pub struct StaticCookies {
    header: String,
}

impl StaticCookies {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
        }
    }
}

impl CookieSource for StaticCookies {
    fn get(&self, name: &str) -> Option<String> {
        cookie_value(&self.header, name)
    }
}

/// Reads `document.cookie` on every call, so a rotated token is picked up
#[cfg(target_arch = "wasm32")]
pub struct DocumentCookies;

#[cfg(target_arch = "wasm32")]
impl CookieSource for DocumentCookies {
    fn get(&self, name: &str) -> Option<String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let html = document.dyn_into::<web_sys::HtmlDocument>().ok()?;
        let header = html.cookie().ok()?;
        let raw = cookie_value(&header, name)?;
        js_sys::decode_uri_component(&raw)
            .ok()
            .and_then(|decoded| decoded.as_string())
            .or(Some(raw))
    }
}
