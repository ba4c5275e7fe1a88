pub mod reconcile;
pub mod route_guard;
pub mod login_viewmodel;
pub mod project_list_viewmodel;
pub mod outcome_viewmodel;
pub mod upload_viewmodel;

pub use login_viewmodel::{AuthMode, LoginForm, LoginState, LoginViewModel};
pub use outcome_viewmodel::{OutcomeViewModel, ProjectDetailState};
pub use project_list_viewmodel::{DeleteOutcome, NewProjectForm, ProjectListState, ProjectListViewModel};
pub use route_guard::{GuardState, RouteGuard};
pub use upload_viewmodel::{FileStatus, QueuedFile, UploadQueueState, UploadViewModel};
