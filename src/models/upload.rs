use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::mime::mime_from_filename;

/// Backend-issued, single-use permission to POST one object to storage
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct UploadTicket {
    pub url: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    #[serde(rename = "key")]
    pub object_key: String,
    #[serde(rename = "public_url")]
    pub public_url: String,
}

/// `POST /uploads/presign-post` answer
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct PresignResponse {
    pub upload: UploadTicket,
}

/// A file picked by the user, already read into memory
#[derive(Clone, PartialEq, Debug)]
pub struct UploadFile {
    pub name: String,
    /// Type reported by the browser; often empty for office/audio files
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type,
            bytes,
        }
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Reported type, or the extension lookup when the browser gave none
    pub fn effective_content_type(&self) -> String {
        match self.content_type.as_deref().map(str::trim) {
            Some(reported) if !reported.is_empty() => reported.to_string(),
            _ => mime_from_filename(&self.name).to_string(),
        }
    }
}

/// Query parameters for the presign handshake
#[derive(Clone, PartialEq, Debug)]
pub struct PresignParams {
    pub filename: String,
    pub content_type: String,
    pub project_id: String,
    pub user_id: String,
    pub max_bytes: Option<u64>,
}

impl PresignParams {
    pub fn for_file(file: &UploadFile, target: &UploadTarget) -> Self {
        Self {
            filename: file.name.clone(),
            content_type: file.effective_content_type(),
            project_id: target.project_id.clone(),
            user_id: target.user_id.clone(),
            max_bytes: target.max_bytes,
        }
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = vec![
            ("filename".to_string(), self.filename.clone()),
            ("content_type".to_string(), self.content_type.clone()),
            ("project_id".to_string(), self.project_id.clone()),
            ("user_id".to_string(), self.user_id.clone()),
        ];
        if let Some(max) = self.max_bytes {
            query.push(("max_bytes".to_string(), max.to_string()));
        }
        query
    }
}

/// Where uploaded documents belong
#[derive(Clone, PartialEq, Debug)]
pub struct UploadTarget {
    pub project_id: String,
    pub user_id: String,
    pub max_bytes: Option<u64>,
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
pub struct UploadProgress {
    pub loaded: u64,
    pub total: u64,
    pub percent: u8,
}

impl UploadProgress {
    pub fn new(loaded: u64, total: u64) -> Self {
        let percent = if total == 0 {
            0
        } else {
            ((loaded.min(total) as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            loaded,
            total,
            percent,
        }
    }
}

/// Object that made it to storage
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug)]
pub struct StoredObject {
    pub object_key: String,
    pub public_url: String,
}
