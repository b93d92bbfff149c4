//! Stage editing session
//!
//! Drives a [`StageTaskComposer`] against the store: the task catalog is
//! loaded on open, the task picker is opened and finished through the
//! composer's transitions, and new or deleted tasks are written to the task
//! collection before the picker's catalog is refreshed.

use crate::config::AdminConfig;
use crate::error::AdminError;
use crate::loader::CatalogLoader;
use crate::notice::{Notice, Notices, SERVER_ERROR_MESSAGE};
use crate::session::SubmitGuard;
use crate::store::DocumentStore;
use parking_lot::Mutex;
use seed_catalog::{CatalogItem, Period, Stage, StageSpan, StageTask};
use seed_composition::{
    CompositionError, ResumeEffect, StageGate, StageTaskComposer, TaskDraft, TaskPicker,
};
use std::collections::BTreeSet;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Outcome of a successful stage submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReceipt {
    /// Written identifier
    pub id: String,
    /// Whether a document was created
    pub inserted: bool,
    /// Tasks saved with the stage
    pub task_count: usize,
}

#[derive(Debug)]
struct StageDraft {
    composer: StageTaskComposer,
    picker: Option<TaskPicker>,
    task_catalog: Arc<[StageTask]>,
}

/// Editing session for one stage and its tasks
pub struct StageSession {
    store: Arc<dyn DocumentStore>,
    config: AdminConfig,
    draft: Mutex<StageDraft>,
    submitting: AtomicBool,
    notices: Notices,
}

impl std::fmt::Debug for StageSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let draft = self.draft.lock();
        f.debug_struct("StageSession")
            .field("stage_id", &draft.composer.existing_id())
            .field("state", &draft.composer.state())
            .finish_non_exhaustive()
    }
}

impl StageSession {
    /// Open a session for `existing` or a new stage
    ///
    /// # Errors
    /// - [`AdminError::Unauthorized`] if `is_authorized` is false
    /// - [`AdminError::Persistence`] / [`AdminError::Catalog`] if the task
    ///   catalog cannot be loaded
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        config: AdminConfig,
        existing: Option<&Stage>,
        is_authorized: bool,
    ) -> Result<Self, AdminError> {
        if !is_authorized {
            tracing::warn!("stage session refused: not authorized");
            return Err(AdminError::Unauthorized);
        }

        let tasks = CatalogLoader::new(store.as_ref(), &config).load_tasks().await?;
        let composer = existing.map_or_else(StageTaskComposer::new, StageTaskComposer::edit);
        tracing::info!(stage = ?composer.existing_id(), "stage session opened");

        let notices = Notices::new(config.notification_limit);
        Ok(Self {
            store,
            config,
            draft: Mutex::new(StageDraft {
                composer,
                picker: None,
                task_catalog: tasks.into(),
            }),
            submitting: AtomicBool::new(false),
            notices,
        })
    }

    /// Stage name as entered
    #[must_use]
    pub fn stage_name(&self) -> String {
        self.draft.lock().composer.stage_name().to_string()
    }

    /// Replace the stage name
    pub fn set_stage_name(&self, name: impl Into<String>) {
        self.draft.lock().composer.set_stage_name(name);
    }

    /// Replace the growing period
    pub fn set_period(&self, period: Period) {
        self.draft.lock().composer.set_period(period);
    }

    /// Tasks attached to the stage
    #[must_use]
    pub fn tasks(&self) -> Vec<StageTask> {
        self.draft
            .lock()
            .composer
            .tasks()
            .into_iter()
            .cloned()
            .collect()
    }

    /// Derived span of the attached tasks
    #[must_use]
    pub fn span(&self) -> Option<StageSpan> {
        self.draft.lock().composer.span()
    }

    /// Current submit gate
    #[must_use]
    pub fn gate(&self) -> StageGate {
        self.draft.lock().composer.gate()
    }

    /// Task catalog as last loaded
    #[must_use]
    pub fn task_catalog(&self) -> Arc<[StageTask]> {
        Arc::clone(&self.draft.lock().task_catalog)
    }

    /// Open the task picker with the stage's tasks pre-marked
    ///
    /// # Errors
    /// [`AdminError::Composition`] if the picker is already open
    pub fn open_picker(&self) -> Result<BTreeSet<String>, AdminError> {
        let mut draft = self.draft.lock();
        let preselected = draft.composer.begin_picking()?;
        draft.picker = Some(TaskPicker::open(Arc::clone(&draft.task_catalog), &preselected));
        Ok(preselected)
    }

    /// Mark or unmark one task in the picker
    ///
    /// # Errors
    /// [`AdminError::PickerClosed`] if the picker is not open
    pub fn toggle_task(&self, identifier: &str, value: bool) -> Result<bool, AdminError> {
        self.with_picker(|picker| picker.toggle(identifier, value))
    }

    /// Mark every task in the picker
    ///
    /// # Errors
    /// [`AdminError::PickerClosed`] if the picker is not open
    pub fn select_all_tasks(&self) -> Result<(), AdminError> {
        self.with_picker(TaskPicker::select_all)
    }

    /// Unmark every task in the picker
    ///
    /// # Errors
    /// [`AdminError::PickerClosed`] if the picker is not open
    pub fn clear_tasks(&self) -> Result<(), AdminError> {
        self.with_picker(TaskPicker::clear)
    }

    /// Identifiers marked in the picker
    ///
    /// # Errors
    /// [`AdminError::PickerClosed`] if the picker is not open
    pub fn selected_task_ids(&self) -> Result<BTreeSet<String>, AdminError> {
        self.with_picker(|picker| picker.selected_ids())
    }

    /// Close the picker and fold its result into the stage
    ///
    /// # Errors
    /// [`AdminError::PickerClosed`] if the picker is not open
    pub fn finish_picker(&self) -> Result<ResumeEffect, AdminError> {
        let mut draft = self.draft.lock();
        let picker = draft.picker.take().ok_or(AdminError::PickerClosed)?;
        Ok(draft.composer.resume(picker.finish())?)
    }

    /// Validate `task`, store it and refresh the picker's catalog
    ///
    /// # Errors
    /// - [`AdminError::PickerClosed`] if the picker is not open
    /// - [`AdminError::Composition`] with field errors if the draft is invalid
    /// - [`AdminError::Persistence`] if the write or refresh fails
    pub async fn create_task(&self, task: TaskDraft) -> Result<StageTask, AdminError> {
        self.with_picker(|_| ())?;
        let task = task.into_task()?;
        let document = serde_json::to_value(&task)
            .map_err(|e| CompositionError::Encoding(e.to_string()))?;

        let collection = &self.config.collections.tasks;
        if let Err(err) = self.store.insert(collection, task.identifier(), document).await {
            return Err(self.write_failed(err.into()));
        }
        tracing::info!(id = task.identifier(), "task created");
        self.refresh_tasks().await?;
        Ok(task)
    }

    /// Delete every task marked in the picker and refresh its catalog
    ///
    /// Returns the number of deleted tasks.
    ///
    /// # Errors
    /// - [`AdminError::PickerClosed`] if the picker is not open
    /// - [`AdminError::Persistence`] if any delete or the refresh fails
    pub async fn delete_selected_tasks(&self) -> Result<usize, AdminError> {
        let ids = self.selected_task_ids()?;
        let collection = &self.config.collections.tasks;
        let deletes = ids.iter().map(|id| self.store.delete(collection, id));
        if let Err(err) = futures::future::try_join_all(deletes).await {
            if let Err(refresh) = self.refresh_tasks().await {
                tracing::warn!(error = %refresh, "task catalog refresh failed");
            }
            return Err(self.write_failed(err.into()));
        }
        tracing::info!(count = ids.len(), "tasks deleted");
        self.refresh_tasks().await?;
        Ok(ids.len())
    }

    /// Persist the stage
    ///
    /// # Errors
    /// - [`AdminError::SubmitInProgress`] if another submit is running
    /// - [`AdminError::Composition`] if the gate is closed
    /// - [`AdminError::Persistence`] if the write fails
    pub async fn submit(&self) -> Result<StageReceipt, AdminError> {
        let _guard = SubmitGuard::acquire(&self.submitting)?;
        let (payload, task_count) = {
            let draft = self.draft.lock();
            (draft.composer.to_payload()?, draft.composer.tasks().len())
        };
        let inserted = payload.is_insert();

        match self.store.write(&self.config.collections.stages, payload).await {
            Ok(id) => {
                self.draft.lock().composer.mark_saved(id.clone());
                tracing::info!(id = %id, inserted, "stage saved");
                Ok(StageReceipt {
                    id,
                    inserted,
                    task_count,
                })
            }
            Err(err) => Err(self.write_failed(err.into())),
        }
    }

    /// Pending notifications, oldest first
    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.pending()
    }

    /// Discard the session; nothing is persisted
    pub fn cancel(self) {
        tracing::debug!("stage session cancelled");
    }

    fn with_picker<R>(&self, f: impl FnOnce(&mut TaskPicker) -> R) -> Result<R, AdminError> {
        let mut draft = self.draft.lock();
        draft.picker.as_mut().map(f).ok_or(AdminError::PickerClosed)
    }

    async fn refresh_tasks(&self) -> Result<(), AdminError> {
        let tasks: Arc<[StageTask]> = CatalogLoader::new(self.store.as_ref(), &self.config)
            .load_tasks()
            .await?
            .into();
        let mut draft = self.draft.lock();
        if let Some(picker) = draft.picker.as_mut() {
            picker.reload(Arc::clone(&tasks));
        }
        draft.task_catalog = tasks;
        Ok(())
    }

    fn write_failed(&self, err: AdminError) -> AdminError {
        tracing::error!(error = %err, "stage session write failed");
        self.notices.push(Notice::error(SERVER_ERROR_MESSAGE));
        err
    }
}
