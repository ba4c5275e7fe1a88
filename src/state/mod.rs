// ============================================================================
// STATE MODULE - observable state with Rc<RefCell> + notifications
// ============================================================================

pub mod reactivity;
pub mod session_state;
pub mod app_state;

pub use reactivity::{ReactiveState, Subscription};
pub use session_state::{AuthPhase, LogoutMode, SessionState, SessionStore};
pub use app_state::{AppContext, Platform};
