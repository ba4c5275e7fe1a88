// ============================================================================
// SCREENS - page snapshots handed to the JS renderer as JSON
// ============================================================================
// Each viewmodel state is flattened into what its page draws. Labels are
// computed here so the page does not re-derive them.
// ============================================================================

use serde::Serialize;

use crate::viewmodels::{AuthMode, FileStatus, LoginState, ProjectListState, QueuedFile, UploadQueueState};

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct ProjectCard {
    pub id: String,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub created: Option<String>,
    pub outcome: Option<String>,
    /// Delete in flight; the row's control is disabled
    pub busy: bool,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct HomeScreen {
    pub loading: bool,
    pub creating: bool,
    pub error: Option<String>,
    pub status_filter: Option<&'static str>,
    pub projects: Vec<ProjectCard>,
}

impl From<&ProjectListState> for HomeScreen {
    fn from(state: &ProjectListState) -> Self {
        let projects = state
            .projects
            .iter()
            .map(|p| ProjectCard {
                id: p.id.to_string(),
                name: p.name.clone(),
                description: p.description.clone(),
                active: p.is_active(),
                created: p.created_label(),
                outcome: p.outcome().map(str::to_string),
                busy: state.is_row_busy(&p.id),
            })
            .collect();

        Self {
            loading: state.loading,
            creating: state.creating,
            error: state.error.clone(),
            status_filter: state.status_filter.map(|s| s.as_str()),
            projects,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct LoginScreen {
    pub mode: &'static str,
    pub submitting: bool,
    pub error: Option<String>,
    pub oauth_url: String,
}

impl LoginScreen {
    pub fn new(state: &LoginState, oauth_url: &str) -> Self {
        Self {
            mode: match state.mode {
                AuthMode::Login => "login",
                AuthMode::Register => "register",
            },
            submitting: state.submitting,
            error: state.error.clone(),
            oauth_url: oauth_url.to_string(),
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct FileRow {
    pub name: String,
    pub size: String,
    pub percent: u8,
    pub status: &'static str,
    pub error: Option<String>,
    pub public_url: Option<String>,
}

impl From<&QueuedFile> for FileRow {
    fn from(entry: &QueuedFile) -> Self {
        let (status, error, public_url) = match &entry.status {
            FileStatus::Queued => ("queued", None, None),
            FileStatus::Uploading => ("uploading", None, None),
            FileStatus::Done(stored) => ("done", None, Some(stored.public_url.clone())),
            FileStatus::Failed(e) => ("failed", Some(e.clone()), None),
        };
        Self {
            name: entry.file.name.clone(),
            size: entry.size_label(),
            percent: entry.progress.percent,
            status,
            error,
            public_url,
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Debug)]
pub struct UploadScreen {
    pub open: bool,
    pub uploading: bool,
    pub can_submit: bool,
    pub files: Vec<FileRow>,
}

impl From<&UploadQueueState> for UploadScreen {
    fn from(state: &UploadQueueState) -> Self {
        Self {
            open: state.open,
            uploading: state.uploading,
            can_submit: state.can_submit(),
            files: state.files.iter().map(FileRow::from).collect(),
        }
    }
}

/// Hands a page snapshot to the page's view renderer
#[cfg(target_arch = "wasm32")]
pub fn render<V: Serialize>(container_id: &str, screen: &V) {
    match serde_json::to_string(screen) {
        Ok(json) => crate::utils::flow_ffi::render_view(container_id, &json),
        Err(e) => log::error!("❌ Error serializing view for #{}: {}", container_id, e),
    }
}
