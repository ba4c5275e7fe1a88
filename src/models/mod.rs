pub mod auth;
pub mod project;
pub mod upload;
pub mod edit;

pub use auth::{Credentials, MeResponse, SessionSnapshot, User};
pub use project::{AiRefreshRequest, NewProject, Project, ProjectId, ProjectPatch, ProjectStatus};
pub use upload::{
    PresignParams, PresignResponse, StoredObject, UploadFile, UploadProgress, UploadTarget,
    UploadTicket,
};
pub use edit::{DraftEditState, EditPhase};
