// ============================================================================
// OUTCOME VIEWMODEL - project detail page, strategic outcome editing
// ============================================================================
// Idle → Editing → Saving → Idle;  Editing → Idle on cancel.
// Saves are optimistic and reconciled against the server on failure.
// Detail fetches are abortable: a new load or an unmount cancels the
// previous one, and a generation counter drops anything that still lands.
// ============================================================================

use futures::future::{AbortHandle, Abortable};
use std::cell::{Cell, RefCell};

use crate::error::ApiError;
use crate::models::{DraftEditState, EditPhase, Project, ProjectId, ProjectPatch};
use crate::services::ProjectService;
use crate::state::reactivity::ReactiveState;
use crate::viewmodels::reconcile::{mutate_then_refetch, optimistic_update};

#[derive(Clone, PartialEq, Debug, Default)]
pub struct ProjectDetailState {
    pub project: Option<Project>,
    pub loading: bool,
    pub error: Option<String>,
    pub edit: DraftEditState,
    pub ai_refreshing: bool,
}

impl ProjectDetailState {
    pub fn outcome(&self) -> Option<&str> {
        self.project.as_ref().and_then(Project::outcome)
    }
}

pub struct OutcomeViewModel {
    service: ProjectService,
    state: ReactiveState<ProjectDetailState>,
    project_id: RefCell<Option<ProjectId>>,
    generation: Cell<u64>,
    inflight: RefCell<Option<AbortHandle>>,
}

impl OutcomeViewModel {
    pub fn new(service: ProjectService) -> Self {
        Self {
            service,
            state: ReactiveState::default(),
            project_id: RefCell::new(None),
            generation: Cell::new(0),
            inflight: RefCell::new(None),
        }
    }

    pub fn state(&self) -> ReactiveState<ProjectDetailState> {
        self.state.clone()
    }

    pub fn current(&self) -> ProjectDetailState {
        self.state.get()
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        self.project_id.borrow().clone()
    }

    /// Fetches the project. Any earlier fetch is cancelled first.
    pub async fn load(&self, id: ProjectId) {
        let generation = self.cancel_inflight();
        let (handle, registration) = AbortHandle::new_pair();
        *self.inflight.borrow_mut() = Some(handle);

        let switching = self.project_id.borrow().as_ref() != Some(&id);
        *self.project_id.borrow_mut() = Some(id.clone());

        self.state.update(|s| {
            s.loading = true;
            s.error = None;
            if switching {
                s.project = None;
                s.edit = DraftEditState::default();
                s.ai_refreshing = false;
            }
        });

        let result = match Abortable::new(self.service.get(&id), registration).await {
            Ok(result) => result,
            Err(_) => {
                log::debug!("Fetch of project {} aborted", id);
                return;
            }
        };

        if self.generation.get() != generation {
            log::debug!("Dropping stale response for project {}", id);
            return;
        }
        self.inflight.borrow_mut().take();

        self.state.update(|s| {
            s.loading = false;
            match result {
                Ok(project) => {
                    log::info!("📄 Project {} loaded", project.id);
                    s.project = Some(project);
                }
                Err(e) => {
                    log::error!("❌ Failed to load project {}: {}", id, e);
                    s.project = None;
                    s.error = Some(e.to_string());
                }
            }
        });
    }

    /// Cancels whatever is in flight. Late responses are ignored.
    pub fn unmount(&self) {
        self.cancel_inflight();
    }

    pub fn begin_edit(&self) {
        self.state.update(|s| {
            if s.edit.phase == EditPhase::Idle {
                let seed = s.outcome().unwrap_or_default().to_string();
                s.edit = DraftEditState {
                    phase: EditPhase::Editing,
                    draft: seed,
                };
            }
        });
    }

    pub fn set_draft(&self, draft: impl Into<String>) {
        let draft = draft.into();
        self.state.update(|s| {
            if s.edit.phase == EditPhase::Editing {
                s.edit.draft = draft;
            }
        });
    }

    pub fn cancel(&self) {
        self.state.update(|s| {
            if s.edit.phase == EditPhase::Editing {
                s.edit = DraftEditState::default();
            }
        });
    }

    /// Writes the draft into the local project right away, then PATCHes it.
    /// An empty draft clears the outcome. On failure the project is re-read
    /// from the server and the editor stays open with the draft.
    pub async fn save(&self) -> Result<(), ApiError> {
        let id = self.require_project()?;
        let draft = match self.state.with(|s| (s.edit.phase == EditPhase::Editing).then(|| s.edit.draft.clone())) {
            Some(draft) => draft,
            None => return Ok(()),
        };
        let patch = ProjectPatch::outcome(draft.clone());
        let generation = self.generation.get();

        let result = optimistic_update(
            &self.state,
            |s| {
                s.edit.phase = EditPhase::Saving;
                s.error = None;
                if let Some(project) = s.project.as_mut() {
                    project.project_outcome = Some(draft.clone());
                }
            },
            self.service.update(&id, &patch),
            || self.resync(&id, generation),
        )
        .await;

        if self.generation.get() != generation {
            log::debug!("Save for project {} finished after the page moved on", id);
            return result;
        }
        self.state.update(|s| match &result {
            Ok(()) => {
                log::info!("💾 Outcome saved for project {}", id);
                s.edit = DraftEditState::default();
            }
            Err(e) => {
                s.edit.phase = EditPhase::Editing;
                s.error = Some(e.to_string());
            }
        });

        result
    }

    /// Asks the backend to regenerate the outcome, then re-reads the
    /// project whatever the answer was.
    pub async fn ai_refresh(&self) -> Result<(), ApiError> {
        let id = self.require_project()?;
        if self.state.with(|s| s.ai_refreshing) {
            return Ok(());
        }

        let description = self.state.with(|s| {
            s.project
                .as_ref()
                .map(|p| p.description.trim().to_string())
                .filter(|d| !d.is_empty())
        });
        let generation = self.generation.get();

        self.state.update(|s| {
            s.ai_refreshing = true;
            s.error = None;
        });

        let result = mutate_then_refetch(self.service.ai_refresh(&id, description), || {
            self.resync(&id, generation)
        })
        .await;

        if self.generation.get() != generation {
            return result;
        }
        self.state.update(|s| {
            s.ai_refreshing = false;
            if let Err(e) = &result {
                s.error = Some(e.to_string());
            }
        });

        result
    }

    fn require_project(&self) -> Result<ProjectId, ApiError> {
        self.project_id()
            .ok_or_else(|| ApiError::Validation("No project loaded".to_string()))
    }

    /// Re-reads the project and replaces the local copy wholesale
    async fn resync(&self, id: &ProjectId, generation: u64) {
        if self.generation.get() != generation {
            return;
        }
        let result = self.service.get(id).await;
        if self.generation.get() != generation {
            return;
        }

        self.state.update(|s| match result {
            Ok(project) => s.project = Some(project),
            Err(e) => {
                log::error!("❌ Could not re-read project {}: {}", id, e);
                s.error = Some(e.to_string());
            }
        });
    }

    /// Aborts the in-flight fetch and returns the new generation
    fn cancel_inflight(&self) -> u64 {
        if let Some(handle) = self.inflight.borrow_mut().take() {
            handle.abort();
        }
        let next = self.generation.get() + 1;
        self.generation.set(next);
        next
    }
}
