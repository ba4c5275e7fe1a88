use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::utils::dates::format_utc;

/// Project identifier. The backend may send it as a JSON number or string.
#[derive(Clone, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ProjectId(String);

impl ProjectId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<i64> for ProjectId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for ProjectId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for ProjectId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(n) => serializer.serialize_i64(n),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for ProjectId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => ProjectId(n.to_string()),
            RawId::Str(s) => ProjectId(s),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Active,
    Inactive,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Inactive => "inactive",
        }
    }
}

#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct Project {
    pub id: ProjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default, alias = "created")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub project_outcome: Option<String>,
}

impl Project {
    pub fn is_active(&self) -> bool {
        self.status == ProjectStatus::Active
    }

    /// Outcome text as shown to the user; `None` when unset or blank
    pub fn outcome(&self) -> Option<&str> {
        self.project_outcome
            .as_deref()
            .filter(|outcome| !outcome.trim().is_empty())
    }

    /// "Created: ..." label for the project card
    pub fn created_label(&self) -> Option<String> {
        self.created_at.as_deref().and_then(format_utc)
    }
}

/// Body of `POST /projects/api/create`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct NewProject {
    pub name: String,
    pub description: String,
    pub status: ProjectStatus,
}

/// Partial update for `PATCH /projects/api/{id}`. Unset fields are not sent.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ProjectPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_outcome: Option<String>,
}

impl ProjectPatch {
    pub fn status(status: ProjectStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn outcome(outcome: impl Into<String>) -> Self {
        Self {
            project_outcome: Some(outcome.into()),
            ..Self::default()
        }
    }
}

/// Body of `POST /projects/api/{id}/ai-refresh`
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct AiRefreshRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn id_accepts_numbers_and_strings() {
        let numeric: Project = serde_json::from_str(r#"{"id": 7, "name": "Pilot"}"#).unwrap();
        let textual: Project =
            serde_json::from_str(r#"{"id": "a1b2", "name": "Pilot"}"#).unwrap();
        assert_eq!(numeric.id, ProjectId::from(7));
        assert_eq!(textual.id.as_str(), "a1b2");
        assert_eq!(serde_json::to_value(&numeric.id).unwrap(), serde_json::json!(7));
    }

    #[test]
    fn backend_shape_decodes() {
        let project: Project = serde_json::from_str(
            r#"{"id": 1, "name": "Pilot", "description": "Will SMBs pay?",
                "status": "inactive", "created": "2025-08-13T01:07:12.444940Z",
                "project_outcome": "Ten paying users"}"#,
        )
        .unwrap();
        assert_eq!(project.status, ProjectStatus::Inactive);
        assert!(!project.is_active());
        assert_eq!(project.outcome(), Some("Ten paying users"));
        assert_eq!(project.created_at.as_deref(), Some("2025-08-13T01:07:12.444940Z"));
    }

    #[test]
    fn blank_outcome_is_unset() {
        let project: Project =
            serde_json::from_str(r#"{"id": 1, "name": "P", "project_outcome": "   "}"#).unwrap();
        assert_eq!(project.outcome(), None);
    }

    #[test]
    fn patch_only_sends_set_fields() {
        let body = serde_json::to_value(ProjectPatch::status(ProjectStatus::Inactive)).unwrap();
        assert_eq!(body, serde_json::json!({"status": "inactive"}));

        let body = serde_json::to_value(ProjectPatch::outcome("new")).unwrap();
        assert_eq!(body, serde_json::json!({"project_outcome": "new"}));
    }
}
