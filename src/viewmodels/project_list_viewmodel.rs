// ============================================================================
// PROJECT LIST VIEWMODEL - home page
// ============================================================================
// The server list is the only trusted state: every mutation is followed by
// a full reload instead of merging the mutation's response.
// Concurrent refreshes are not coalesced: the last response to land wins.
// Unmounting or changing the status filter aborts every list fetch in
// flight, and a generation counter drops anything that still lands.
// ============================================================================

use futures::future::{AbortHandle, Abortable};
use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use crate::error::ApiError;
use crate::models::{NewProject, Project, ProjectId, ProjectStatus};
use crate::services::{Confirmer, ProjectService};
use crate::state::reactivity::ReactiveState;
use crate::utils::constants::DELETE_PROJECT_PROMPT;

#[derive(Clone, PartialEq, Debug, Default)]
pub struct ProjectListState {
    pub projects: Vec<Project>,
    pub loading: bool,
    pub error: Option<String>,
    pub creating: bool,
    /// Rows with a delete in flight; their control is disabled
    pub deleting: BTreeSet<ProjectId>,
    pub status_filter: Option<ProjectStatus>,
}

impl ProjectListState {
    pub fn is_row_busy(&self, id: &ProjectId) -> bool {
        self.deleting.contains(id)
    }

    pub fn has_projects(&self) -> bool {
        !self.projects.is_empty()
    }
}

/// "New project" form contents, as typed
#[derive(Clone, PartialEq, Debug, Default)]
pub struct NewProjectForm {
    pub name: String,
    pub description: String,
}

impl NewProjectForm {
    pub fn validate(&self) -> Result<NewProject, ApiError> {
        let name = self.name.trim();
        let description = self.description.trim();

        if name.is_empty() {
            return Err(ApiError::Validation("Project name cannot be empty".to_string()));
        }
        if description.is_empty() {
            return Err(ApiError::Validation("Project description cannot be empty".to_string()));
        }

        Ok(NewProject {
            name: name.to_string(),
            description: description.to_string(),
            status: ProjectStatus::Active,
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DeleteOutcome {
    /// The user declined the confirmation
    Cancelled,
    /// A delete for this row is already in flight
    AlreadyPending,
    Archived,
}

pub struct ProjectListViewModel {
    service: ProjectService,
    confirmer: Rc<dyn Confirmer>,
    state: ReactiveState<ProjectListState>,
    generation: Cell<u64>,
    next_fetch: Cell<u64>,
    inflight: RefCell<Vec<(u64, AbortHandle)>>,
}

impl ProjectListViewModel {
    pub fn new(service: ProjectService, confirmer: Rc<dyn Confirmer>) -> Self {
        Self {
            service,
            confirmer,
            state: ReactiveState::default(),
            generation: Cell::new(0),
            next_fetch: Cell::new(0),
            inflight: RefCell::new(Vec::new()),
        }
    }

    pub fn state(&self) -> ReactiveState<ProjectListState> {
        self.state.clone()
    }

    pub fn current(&self) -> ProjectListState {
        self.state.get()
    }

    /// Reloads the whole list. On failure the cache is emptied: stale rows
    /// are never shown next to an error.
    /// Cancelled by `unmount` or a status filter change.
    pub async fn refresh(&self) {
        let generation = self.generation.get();
        let fetch = self.next_fetch.get() + 1;
        self.next_fetch.set(fetch);
        let (handle, registration) = AbortHandle::new_pair();
        self.inflight.borrow_mut().push((fetch, handle));

        let filter = self.state.with(|s| s.status_filter);
        self.state.update(|s| {
            s.loading = true;
            s.error = None;
        });

        let result = match Abortable::new(self.service.list(filter), registration).await {
            Ok(result) => result,
            Err(_) => {
                log::debug!("Project list fetch aborted");
                return;
            }
        };

        if self.generation.get() != generation {
            log::debug!("Dropping stale project list");
            return;
        }
        self.inflight.borrow_mut().retain(|(id, _)| *id != fetch);

        self.state.update(|s| {
            s.loading = false;
            match result {
                Ok(projects) => {
                    log::info!("📋 {} projects loaded", projects.len());
                    s.projects = projects;
                }
                Err(e) => {
                    log::error!("❌ Failed to load projects: {}", e);
                    s.projects.clear();
                    s.error = Some(e.to_string());
                }
            }
        });
    }

    /// Cancels every list fetch in flight. Late responses are ignored.
    pub fn unmount(&self) {
        self.cancel_inflight();
    }

    fn cancel_inflight(&self) {
        for (_, handle) in self.inflight.borrow_mut().drain(..) {
            handle.abort();
        }
        self.generation.set(self.generation.get() + 1);
    }

    /// Changing the filter abandons lists fetched for the previous one
    pub async fn set_status_filter(&self, status: Option<ProjectStatus>) {
        self.cancel_inflight();
        self.state.update(|s| s.status_filter = status);
        self.refresh().await;
    }

    /// Validates and creates the project, then reloads the list. The create
    /// counts as done once its own call succeeded, even if the reload fails.
    pub async fn create(&self, form: &NewProjectForm) -> Result<(), ApiError> {
        let project = form.validate()?;

        self.state.update(|s| s.creating = true);
        let result = self.service.create(&project).await;
        self.state.update(|s| s.creating = false);

        match result {
            Ok(()) => {
                log::info!("✅ Project '{}' created", project.name);
                self.refresh().await;
                Ok(())
            }
            Err(e) => {
                log::error!("❌ Project creation failed: {}", e);
                Err(e)
            }
        }
    }

    /// Archives one project after confirmation. Only that row is locked
    /// while the request runs.
    pub async fn soft_delete(&self, id: &ProjectId) -> Result<DeleteOutcome, ApiError> {
        if self.state.with(|s| s.is_row_busy(id)) {
            return Ok(DeleteOutcome::AlreadyPending);
        }
        if !self.confirmer.confirm(DELETE_PROJECT_PROMPT) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.state.update(|s| {
            s.deleting.insert(id.clone());
        });

        let result = self.service.soft_delete(id).await;
        if result.is_ok() {
            self.refresh().await;
        }

        self.state.update(|s| {
            s.deleting.remove(id);
            if let Err(ref e) = result {
                s.error = Some(e.to_string());
            }
        });

        result.map(|_| DeleteOutcome::Archived)
    }
}
