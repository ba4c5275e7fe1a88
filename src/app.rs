// ============================================================================
// APP - browser entry points
// ============================================================================
// The context lives in a thread-local from start until logout. JS calls the
// exported functions below; each one borrows what it needs and spawns the
// async work on the browser's microtask queue.
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::config::CONFIG;
use crate::models::{ProjectId, ProjectStatus, UploadFile};
use crate::state::{AppContext, LogoutMode, Platform};
use crate::viewmodels::{
    AuthMode, GuardState, LoginForm, LoginViewModel, NewProjectForm, OutcomeViewModel,
    ProjectListViewModel, RouteGuard, UploadViewModel,
};
use crate::views::screens::{self, HomeScreen, LoginScreen, UploadScreen};
use crate::views::{graph, journey_map, opportunity_map, key_action, handle_key, KeyChord, OutcomeActions};

thread_local! {
    static APP: RefCell<Option<AppContext>> = RefCell::new(None);
    static HOME_PAGE: RefCell<Option<Rc<ProjectListViewModel>>> = RefCell::new(None);
    static PROJECT_PAGE: RefCell<Option<Rc<OutcomeViewModel>>> = RefCell::new(None);
    static LOGIN_PAGE: RefCell<Option<Rc<LoginViewModel>>> = RefCell::new(None);
    static UPLOAD_DIALOG: RefCell<Option<Rc<UploadViewModel>>> = RefCell::new(None);
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.is_logging_enabled() {
        wasm_logger::init(wasm_logger::Config::default());
    }
    log::info!("🚀 Logima web client starting");

    let context = AppContext::init(CONFIG.clone(), Platform::browser());
    let session = context.session();
    APP.with(|app| *app.borrow_mut() = Some(context));

    spawn_local(async move { session.hydrate_from_server().await });
    Ok(())
}

fn with_app<R>(f: impl FnOnce(&AppContext) -> R) -> Option<R> {
    APP.with(|app| app.borrow().as_ref().map(f))
}

fn project_page() -> Option<Rc<OutcomeViewModel>> {
    PROJECT_PAGE.with(|page| page.borrow().clone())
}

fn home_page() -> Option<Rc<ProjectListViewModel>> {
    HOME_PAGE.with(|page| page.borrow().clone())
}

fn login_page() -> Option<Rc<LoginViewModel>> {
    LOGIN_PAGE.with(|page| page.borrow().clone())
}

fn upload_dialog() -> Option<Rc<UploadViewModel>> {
    UPLOAD_DIALOG.with(|dialog| dialog.borrow().clone())
}

/// Runs the access check for a protected page. A rejected check has
/// already redirected to the login page.
async fn allowed(guard: RouteGuard) -> bool {
    guard.on_mount().await == GuardState::Allowed
}

#[wasm_bindgen]
pub fn is_authenticated() -> bool {
    with_app(|app| app.session().is_authenticated()).unwrap_or(false)
}

/// Logs out, tears the context down and goes to the login page
#[wasm_bindgen]
pub fn logout() {
    unmount_home();
    unmount_project_page();
    unmount_upload_dialog();
    match APP.with(|app| app.borrow_mut().take()) {
        Some(context) => spawn_local(context.teardown(LogoutMode::Redirect)),
        None => log::warn!("⚠️ Logout requested before the app started"),
    }
}

#[wasm_bindgen]
pub fn render_journey_map(container_id: &str) {
    graph::render(container_id, &journey_map::build_graph());
}

// ----------------------------------------------------------------------------
// Home: project list
// ----------------------------------------------------------------------------

/// Checks access, then loads the list and keeps `container_id` in sync
#[wasm_bindgen]
pub fn mount_home(container_id: String) {
    unmount_home();

    let Some((guard, vm)) = with_app(|app| (app.route_guard(), Rc::new(app.project_list()))) else {
        log::error!("❌ App not initialized");
        return;
    };

    let state = vm.state();
    let reader = state.clone();
    state.subscribe(move || {
        screens::render(&container_id, &reader.with(HomeScreen::from));
    });

    HOME_PAGE.with(|page| *page.borrow_mut() = Some(vm.clone()));
    spawn_local(async move {
        let still_mounted = || home_page().is_some_and(|current| Rc::ptr_eq(&current, &vm));
        if allowed(guard).await && still_mounted() {
            vm.refresh().await;
        }
    });
}

#[wasm_bindgen]
pub fn unmount_home() {
    if let Some(vm) = HOME_PAGE.with(|page| page.borrow_mut().take()) {
        vm.unmount();
        vm.state().clear_subscribers();
    }
}

/// `status` is "active", "inactive" or nothing for every project
#[wasm_bindgen]
pub fn set_project_filter(status: Option<String>) {
    let filter = match status.as_deref() {
        Some("active") => Some(ProjectStatus::Active),
        Some("inactive") => Some(ProjectStatus::Inactive),
        Some(other) => {
            log::warn!("⚠️ Unknown project status '{}', showing all", other);
            None
        }
        None => None,
    };
    if let Some(vm) = home_page() {
        spawn_local(async move { vm.set_status_filter(filter).await });
    }
}

#[wasm_bindgen]
pub fn create_project(name: String, description: String) {
    if let Some(vm) = home_page() {
        spawn_local(async move {
            let _ = vm.create(&NewProjectForm { name, description }).await;
        });
    }
}

#[wasm_bindgen]
pub fn delete_project(project_id: String) {
    if let Some(vm) = home_page() {
        spawn_local(async move {
            let _ = vm.soft_delete(&ProjectId::new(project_id)).await;
        });
    }
}

// ----------------------------------------------------------------------------
// Login and OAuth return
// ----------------------------------------------------------------------------

#[wasm_bindgen]
pub fn mount_login(container_id: String) {
    unmount_login();

    let Some(vm) = with_app(|app| Rc::new(app.login())) else {
        log::error!("❌ App not initialized");
        return;
    };

    let state = vm.state();
    let reader = state.clone();
    let oauth_url = vm.oauth_start_url().to_string();
    let render = move || {
        screens::render(&container_id, &reader.with(|s| LoginScreen::new(s, &oauth_url)));
    };
    render();
    state.subscribe(render);

    LOGIN_PAGE.with(|page| *page.borrow_mut() = Some(vm));
}

#[wasm_bindgen]
pub fn unmount_login() {
    if let Some(vm) = LOGIN_PAGE.with(|page| page.borrow_mut().take()) {
        vm.state().clear_subscribers();
    }
}

#[wasm_bindgen]
pub fn login_set_mode(register: bool) {
    if let Some(vm) = login_page() {
        vm.set_mode(if register { AuthMode::Register } else { AuthMode::Login });
    }
}

#[wasm_bindgen]
pub fn login_submit(email: String, password: String) {
    if let Some(vm) = login_page() {
        spawn_local(async move {
            let _ = vm.submit(&LoginForm { email, password }).await;
        });
    }
}

/// Entry point of the page the OAuth provider redirects back to
#[wasm_bindgen]
pub fn complete_oauth() {
    let Some(vm) = with_app(|app| app.login()) else {
        log::error!("❌ App not initialized");
        return;
    };
    spawn_local(async move { vm.complete_oauth().await });
}

// ----------------------------------------------------------------------------
// Upload dialog
// ----------------------------------------------------------------------------

/// Binds the dialog to `container_id`. The queue survives close/open.
#[wasm_bindgen]
pub fn mount_upload_dialog(container_id: String) {
    unmount_upload_dialog();

    let Some(vm) = with_app(|app| Rc::new(app.upload_queue())) else {
        log::error!("❌ App not initialized");
        return;
    };

    let state = vm.state();
    let reader = state.clone();
    state.subscribe(move || {
        screens::render(&container_id, &reader.with(UploadScreen::from));
    });

    UPLOAD_DIALOG.with(|dialog| *dialog.borrow_mut() = Some(vm));
}

#[wasm_bindgen]
pub fn unmount_upload_dialog() {
    if let Some(vm) = UPLOAD_DIALOG.with(|dialog| dialog.borrow_mut().take()) {
        vm.state().clear_subscribers();
    }
}

#[wasm_bindgen]
pub fn upload_open() {
    if let Some(vm) = upload_dialog() {
        vm.open();
    }
}

#[wasm_bindgen]
pub fn upload_close() {
    if let Some(vm) = upload_dialog() {
        vm.close();
    }
}

/// Queues one picked file. `content_type` is whatever the browser reported.
#[wasm_bindgen]
pub fn upload_add_file(name: String, content_type: Option<String>, bytes: Vec<u8>) {
    if let Some(vm) = upload_dialog() {
        vm.add_files([UploadFile::new(name, content_type, bytes)]);
    }
}

#[wasm_bindgen]
pub fn upload_remove(index: usize) {
    if let Some(vm) = upload_dialog() {
        vm.remove(index);
    }
}

#[wasm_bindgen]
pub fn upload_submit(project_id: String, max_bytes: Option<u64>) {
    let Some(vm) = upload_dialog() else {
        return;
    };
    let Some(target) = with_app(|app| app.upload_target(&ProjectId::new(project_id), max_bytes)).flatten() else {
        log::warn!("⚠️ Upload requested without a signed-in user");
        return;
    };
    spawn_local(async move {
        let _ = vm.submit(&target).await;
    });
}

// ----------------------------------------------------------------------------
// Project page: strategic outcome
// ----------------------------------------------------------------------------

/// Checks access, loads the project and keeps the outcome graph in
/// `container_id` in sync with the editor state
#[wasm_bindgen]
pub fn mount_project_page(container_id: String, project_id: String) {
    unmount_project_page();

    let Some((guard, vm)) = with_app(|app| (app.route_guard(), Rc::new(app.outcome_editor()))) else {
        log::error!("❌ App not initialized");
        return;
    };

    let state = vm.state();
    let reader = state.clone();
    state.subscribe(move || {
        graph::render(&container_id, &reader.with(opportunity_map::build_graph));
    });

    PROJECT_PAGE.with(|page| *page.borrow_mut() = Some(vm.clone()));
    spawn_local(async move {
        let still_mounted = || project_page().is_some_and(|current| Rc::ptr_eq(&current, &vm));
        if allowed(guard).await && still_mounted() {
            vm.load(ProjectId::new(project_id)).await;
        }
    });
}

#[wasm_bindgen]
pub fn unmount_project_page() {
    if let Some(vm) = PROJECT_PAGE.with(|page| page.borrow_mut().take()) {
        vm.unmount();
        vm.state().clear_subscribers();
    }
}

#[wasm_bindgen]
pub fn outcome_edit() {
    if let Some(vm) = project_page() {
        vm.edit_request();
    }
}

#[wasm_bindgen]
pub fn outcome_draft(draft: String) {
    if let Some(vm) = project_page() {
        vm.draft_change(draft);
    }
}

#[wasm_bindgen]
pub fn outcome_ai_refresh() {
    if let Some(vm) = project_page() {
        spawn_local(async move {
            let _ = OutcomeActions::ai_refresh(&*vm).await;
        });
    }
}

/// Keydown inside the outcome editor. Returns true when the key was
/// consumed and the default should be prevented.
#[wasm_bindgen]
pub fn outcome_key(key: String, ctrl: bool, meta: bool) -> bool {
    if key_action(&KeyChord { key: &key, ctrl, meta }).is_none() {
        return false;
    }
    if let Some(vm) = project_page() {
        spawn_local(async move {
            let chord = KeyChord { key: &key, ctrl, meta };
            let _ = handle_key(&*vm, &chord).await;
        });
    }
    true
}
