use serde_json::Value;

use crate::error::ApiError;
use crate::models::{AiRefreshRequest, NewProject, Project, ProjectId, ProjectPatch, ProjectStatus};
use crate::services::api_client::ApiClient;
use crate::services::http::HttpMethod;
use crate::utils::constants::{PROJECTS_BASE_PATH, PROJECTS_CREATE_PATH, PROJECTS_LIST_PATH};

/// Project endpoints. Only talks HTTP: callers decide what to cache.
#[derive(Clone)]
pub struct ProjectService {
    api: ApiClient,
}

impl ProjectService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    fn project_path(id: &ProjectId) -> String {
        format!("{}/{}", PROJECTS_BASE_PATH, id)
    }

    /// The answer body is not read: callers reload the list afterwards
    pub async fn create(&self, project: &NewProject) -> Result<(), ApiError> {
        log::info!("🆕 Creating project '{}'", project.name);
        self.api
            .send_ignoring_body(HttpMethod::Post, PROJECTS_CREATE_PATH, Some(project))
            .await
    }

    /// Full list, optionally filtered by status. A body that is not an
    /// array is read as an empty list.
    pub async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<Project>, ApiError> {
        let query = status
            .map(|s| vec![("status".to_string(), s.as_str().to_string())])
            .unwrap_or_default();

        let body: Value = self.api.get_with_query(PROJECTS_LIST_PATH, query).await?;
        match body {
            Value::Array(_) => serde_json::from_value(body)
                .map_err(|e| ApiError::Decode(format!("Parse error: {}", e))),
            other => {
                log::warn!("⚠️ Project list was not an array ({}), showing none", kind_of(&other));
                Ok(Vec::new())
            }
        }
    }

    pub async fn get(&self, id: &ProjectId) -> Result<Project, ApiError> {
        self.api.get(&Self::project_path(id)).await
    }

    pub async fn update(&self, id: &ProjectId, patch: &ProjectPatch) -> Result<(), ApiError> {
        self.api
            .send_ignoring_body(HttpMethod::Patch, &Self::project_path(id), Some(patch))
            .await
    }

    /// Archives the project (status → inactive). Nothing is ever hard-deleted.
    pub async fn soft_delete(&self, id: &ProjectId) -> Result<(), ApiError> {
        log::info!("🗄️ Archiving project {}", id);
        self.update(id, &ProjectPatch::status(ProjectStatus::Inactive)).await
    }

    /// Asks the backend to regenerate the outcome. The answer body is
    /// deliberately dropped: callers re-read the project.
    pub async fn ai_refresh(&self, id: &ProjectId, description: Option<String>) -> Result<(), ApiError> {
        log::info!("✨ AI refresh requested for project {}", id);
        let path = format!("{}/ai-refresh", Self::project_path(id));
        self.api
            .send_ignoring_body(HttpMethod::Post, &path, Some(&AiRefreshRequest { description }))
            .await
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
