// ============================================================================
// UPLOAD SERVICE - presigned direct-to-storage uploads
// ============================================================================
// 1. presign: the backend hands out a single-use ticket for one file
// 2. upload:  the file goes straight to object storage, never through
//    the backend. No retries: a failed ticket is dead, presign again.
// ============================================================================

use std::rc::Rc;

use crate::error::{ApiError, UploadError};
use crate::models::{PresignParams, PresignResponse, StoredObject, UploadFile, UploadTicket};
use crate::services::api_client::ApiClient;
use crate::services::http::{MultipartForm, ProgressCallback, Transport};
use crate::utils::constants::UPLOADS_PRESIGN_PATH;

/// Name of the multipart part holding the file bytes
const FILE_FIELD: &str = "file";

#[derive(Clone)]
pub struct UploadService {
    api: ApiClient,
    storage: Rc<dyn Transport>,
}

impl UploadService {
    pub fn new(api: ApiClient) -> Self {
        let storage = api.transport();
        Self { api, storage }
    }

    pub async fn presign(&self, params: &PresignParams) -> Result<UploadTicket, ApiError> {
        log::info!("🎫 Presigning upload for {} ({})", params.filename, params.content_type);
        let response: PresignResponse = self
            .api
            .post_with_query(UPLOADS_PRESIGN_PATH, params.to_query())
            .await?;
        Ok(response.upload)
    }

    /// Posts `file` with every ticket field to the storage URL. Consumes the
    /// ticket. With `on_progress` the transport reports transfer progress.
    pub async fn upload(
        &self,
        ticket: UploadTicket,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> Result<StoredObject, UploadError> {
        let UploadTicket {
            url,
            fields,
            object_key,
            public_url,
        } = ticket;

        let form = MultipartForm {
            fields: fields.into_iter().collect(),
            file_field: FILE_FIELD.to_string(),
            file: file.clone(),
        };

        log::info!("⬆️ Uploading {} ({} bytes) to storage", file.name, file.size());

        let response = self
            .storage
            .send_form(&url, form, on_progress)
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        if !response.ok() {
            log::error!("❌ Storage rejected {}: HTTP {}", file.name, response.status);
            return Err(UploadError::Storage {
                status: response.status,
            });
        }

        log::info!("✅ Uploaded {} → {}", file.name, object_key);
        Ok(StoredObject {
            object_key,
            public_url,
        })
    }

    /// Presign then upload, the usual path for a freshly picked file
    pub async fn presign_and_upload(
        &self,
        params: &PresignParams,
        file: &UploadFile,
        on_progress: Option<ProgressCallback>,
    ) -> Result<StoredObject, UploadError> {
        let ticket = self.presign(params).await?;
        self.upload(ticket, file, on_progress).await
    }
}
