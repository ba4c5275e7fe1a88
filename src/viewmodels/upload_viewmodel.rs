// ============================================================================
// UPLOAD VIEWMODEL - "Upload documents" dialog
// ============================================================================
// Files are uploaded one after another, each with its own presign. The
// queue is only emptied (and the dialog closed) when every file made it;
// failed files stay queued and a retry presigns them again.
// ============================================================================

use std::rc::Rc;

use crate::error::UploadError;
use crate::models::{PresignParams, StoredObject, UploadFile, UploadProgress, UploadTarget};
use crate::services::{ProgressCallback, UploadService};
use crate::state::reactivity::ReactiveState;

#[derive(Clone, PartialEq, Debug, Default)]
pub enum FileStatus {
    #[default]
    Queued,
    Uploading,
    Done(StoredObject),
    Failed(String),
}

#[derive(Clone, PartialEq, Debug)]
pub struct QueuedFile {
    pub file: UploadFile,
    pub progress: UploadProgress,
    pub status: FileStatus,
}

impl QueuedFile {
    fn new(file: UploadFile) -> Self {
        Self {
            file,
            progress: UploadProgress::default(),
            status: FileStatus::Queued,
        }
    }

    /// Size as listed in the dialog, rounded up to whole kilobytes
    pub fn size_label(&self) -> String {
        format!("{} KB", self.file.size().div_ceil(1024))
    }

    pub fn is_done(&self) -> bool {
        matches!(self.status, FileStatus::Done(_))
    }
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct UploadQueueState {
    pub open: bool,
    pub files: Vec<QueuedFile>,
    pub uploading: bool,
}

impl UploadQueueState {
    pub fn can_submit(&self) -> bool {
        !self.uploading && !self.files.is_empty()
    }
}

pub struct UploadViewModel {
    service: UploadService,
    state: ReactiveState<UploadQueueState>,
}

impl UploadViewModel {
    pub fn new(service: UploadService) -> Self {
        Self {
            service,
            state: ReactiveState::default(),
        }
    }

    pub fn state(&self) -> ReactiveState<UploadQueueState> {
        self.state.clone()
    }

    pub fn current(&self) -> UploadQueueState {
        self.state.get()
    }

    pub fn can_submit(&self) -> bool {
        self.state.with(UploadQueueState::can_submit)
    }

    pub fn open(&self) {
        self.state.update(|s| s.open = true);
    }

    /// Hides the dialog; the queue is kept for next time
    pub fn close(&self) {
        self.state.update(|s| s.open = false);
    }

    pub fn add_files(&self, files: impl IntoIterator<Item = UploadFile>) {
        self.state.update(|s| s.files.extend(files.into_iter().map(QueuedFile::new)));
    }

    pub fn remove(&self, index: usize) {
        self.state.update(|s| {
            if !s.uploading && index < s.files.len() {
                s.files.remove(index);
            }
        });
    }

    pub fn clear(&self) {
        self.state.update(|s| {
            if !s.uploading {
                s.files.clear();
            }
        });
    }

    /// Uploads every file not already stored. Returns what was stored when
    /// all files succeeded, otherwise the first failure.
    pub async fn submit(&self, target: &UploadTarget) -> Result<Vec<StoredObject>, UploadError> {
        if !self.can_submit() {
            return Ok(Vec::new());
        }
        self.state.update(|s| s.uploading = true);

        let count = self.state.with(|s| s.files.len());
        let mut first_error = None;

        for index in 0..count {
            let file = match self.state.with(|s| s.files.get(index).filter(|f| !f.is_done()).map(|f| f.file.clone())) {
                Some(file) => file,
                None => continue,
            };

            self.state.update(|s| {
                if let Some(entry) = s.files.get_mut(index) {
                    entry.status = FileStatus::Uploading;
                    entry.progress = UploadProgress::new(0, entry.file.size());
                }
            });

            let params = PresignParams::for_file(&file, target);
            let result = self
                .service
                .presign_and_upload(&params, &file, Some(self.progress_for(index)))
                .await;

            self.state.update(|s| {
                if let Some(entry) = s.files.get_mut(index) {
                    entry.status = match &result {
                        Ok(stored) => FileStatus::Done(stored.clone()),
                        Err(e) => FileStatus::Failed(e.to_string()),
                    };
                }
            });

            if let Err(e) = result {
                log::error!("❌ {} was not uploaded: {}", file.name, e);
                first_error.get_or_insert(e);
            }
        }

        let stored: Vec<StoredObject> = self.state.with(|s| {
            s.files
                .iter()
                .filter_map(|f| match &f.status {
                    FileStatus::Done(stored) => Some(stored.clone()),
                    _ => None,
                })
                .collect()
        });

        self.state.update(|s| {
            s.uploading = false;
            if first_error.is_none() {
                s.files.clear();
                s.open = false;
            }
        });

        match first_error {
            Some(e) => Err(e),
            None => {
                log::info!("📦 {} documents uploaded", stored.len());
                Ok(stored)
            }
        }
    }

    fn progress_for(&self, index: usize) -> ProgressCallback {
        let state = self.state.clone();
        Rc::new(move |progress: UploadProgress| {
            state.update(|s| {
                if let Some(entry) = s.files.get_mut(index) {
                    entry.progress = progress;
                }
            });
        })
    }
}
