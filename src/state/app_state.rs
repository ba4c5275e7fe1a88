// ============================================================================
// APP STATE - application context
// ============================================================================
// Built once at start (`init`) and consumed at logout (`teardown`). Every
// viewmodel gets its services from here instead of from module globals.
// ============================================================================

use std::rc::Rc;

use crate::config::AppConfig;
use crate::models::{ProjectId, UploadTarget};
use crate::services::{
    ApiClient, AuthService, Confirmer, Navigator, ProjectService, Transport, UploadService,
};
use crate::state::session_state::{LogoutMode, SessionStore};
use crate::utils::cookies::CookieSource;
use crate::utils::storage::KeyValueStore;
use crate::viewmodels::{
    LoginViewModel, OutcomeViewModel, ProjectListViewModel, RouteGuard, UploadViewModel,
};

/// Everything that touches the browser, behind its seam
#[derive(Clone)]
pub struct Platform {
    pub transport: Rc<dyn Transport>,
    pub storage: Rc<dyn KeyValueStore>,
    pub cookies: Rc<dyn CookieSource>,
    pub navigator: Rc<dyn Navigator>,
    pub confirmer: Rc<dyn Confirmer>,
}

#[cfg(target_arch = "wasm32")]
impl Platform {
    pub fn browser() -> Self {
        use crate::services::{BrowserConfirmer, BrowserNavigator, FetchTransport};
        use crate::utils::cookies::DocumentCookies;
        use crate::utils::storage::BrowserSessionStore;

        Self {
            transport: Rc::new(FetchTransport::new()),
            storage: Rc::new(BrowserSessionStore),
            cookies: Rc::new(DocumentCookies),
            navigator: Rc::new(BrowserNavigator),
            confirmer: Rc::new(BrowserConfirmer),
        }
    }
}

pub struct AppContext {
    config: AppConfig,
    auth: AuthService,
    projects: ProjectService,
    uploads: UploadService,
    session: Rc<SessionStore>,
    navigator: Rc<dyn Navigator>,
    confirmer: Rc<dyn Confirmer>,
}

impl AppContext {
    pub fn init(config: AppConfig, platform: Platform) -> Self {
        log::info!("🚀 Initializing app context (api: {})", config.base_url());

        let api = ApiClient::new(&config, platform.transport, platform.cookies);
        let auth = AuthService::new(api.clone());
        let session = Rc::new(SessionStore::new(
            &config,
            auth.clone(),
            platform.storage,
            platform.navigator.clone(),
        ));

        Self {
            auth,
            projects: ProjectService::new(api.clone()),
            uploads: UploadService::new(api),
            session,
            navigator: platform.navigator,
            confirmer: platform.confirmer,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> Rc<SessionStore> {
        self.session.clone()
    }

    pub fn route_guard(&self) -> RouteGuard {
        RouteGuard::new(self.auth.clone(), self.navigator.clone(), self.config.login_path.clone())
    }

    pub fn login(&self) -> LoginViewModel {
        LoginViewModel::new(&self.config, self.auth.clone(), self.session.clone(), self.navigator.clone())
    }

    pub fn project_list(&self) -> ProjectListViewModel {
        ProjectListViewModel::new(self.projects.clone(), self.confirmer.clone())
    }

    pub fn outcome_editor(&self) -> OutcomeViewModel {
        OutcomeViewModel::new(self.projects.clone())
    }

    pub fn upload_queue(&self) -> UploadViewModel {
        UploadViewModel::new(self.uploads.clone())
    }

    /// Upload destination for `project`, owned by the signed-in user
    pub fn upload_target(&self, project: &ProjectId, max_bytes: Option<u64>) -> Option<UploadTarget> {
        self.session.user().map(|user| UploadTarget {
            project_id: project.to_string(),
            user_id: user.email,
            max_bytes,
        })
    }

    /// Signs out and drops everything this tab kept about the session
    pub async fn teardown(self, mode: LogoutMode) {
        self.session.logout(mode).await;
        self.session.dispose();
        log::info!("🧹 App context torn down");
    }
}
