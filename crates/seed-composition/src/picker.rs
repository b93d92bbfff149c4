//! Task picker sub-dialog
//!
//! The picker lists the task catalog with the stage's current tasks
//! pre-marked. Finishing it yields a [`TaskPickerOutcome`], the typed payload
//! handed back to [`crate::StageTaskComposer::resume`].

use crate::error::CompositionError;
use crate::fields::FieldErrors;
use crate::payload::new_document_id;
use seed_catalog::{CatalogItem, SelectionSet, StageTask, TaskDate};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Tasks chosen in the picker, in task-catalog order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPickerOutcome {
    tasks: Vec<StageTask>,
}

impl TaskPickerOutcome {
    /// Wrap a chosen task list
    #[inline]
    #[must_use]
    pub fn new(tasks: Vec<StageTask>) -> Self {
        Self { tasks }
    }

    /// Chosen tasks
    #[inline]
    #[must_use]
    pub fn tasks(&self) -> &[StageTask] {
        &self.tasks
    }

    /// Nothing was chosen
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Take the task list
    #[inline]
    #[must_use]
    pub fn into_tasks(self) -> Vec<StageTask> {
        self.tasks
    }
}

/// Selection state of the open picker
#[derive(Debug, Clone)]
pub struct TaskPicker {
    tasks: SelectionSet<StageTask>,
}

impl TaskPicker {
    /// Open over `catalog`, pre-marking `preselected` identifiers
    #[must_use]
    pub fn open(catalog: impl Into<Arc<[StageTask]>>, preselected: &BTreeSet<String>) -> Self {
        let mut tasks = SelectionSet::from_items(catalog);
        tasks.mark_chosen_by_id(preselected);
        Self { tasks }
    }

    /// Swap in a refreshed catalog, keeping marks on tasks that still exist
    pub fn reload(&mut self, catalog: impl Into<Arc<[StageTask]>>) {
        let kept = self.tasks.chosen_identifiers();
        self.tasks.load(catalog);
        self.tasks.mark_chosen_by_id(&kept);
    }

    /// Mark or unmark one task; unknown identifiers are ignored
    pub fn toggle(&mut self, identifier: &str, value: bool) -> bool {
        self.tasks.toggle(identifier, value)
    }

    /// Mark every task
    pub fn select_all(&mut self) {
        self.tasks.select_all();
    }

    /// Unmark every task
    pub fn clear(&mut self) {
        self.tasks.clear();
    }

    /// Identifiers currently marked
    #[must_use]
    pub fn selected_ids(&self) -> BTreeSet<String> {
        self.tasks.chosen_identifiers()
    }

    /// Underlying selection, for display
    #[inline]
    #[must_use]
    pub fn selection(&self) -> &SelectionSet<StageTask> {
        &self.tasks
    }

    /// Close the picker
    #[must_use]
    pub fn finish(self) -> TaskPickerOutcome {
        let tasks = self.tasks.chosen_items().into_iter().cloned().collect();
        TaskPickerOutcome::new(tasks)
    }
}

/// New task as entered in the picker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task label
    pub label: String,
    /// Repeat interval in days, as entered
    pub repeat: String,
    /// First day
    pub start_date: Option<TaskDate>,
    /// Last day
    pub end_date: Option<TaskDate>,
}

impl TaskDraft {
    /// Per-field errors, keyed by wire name
    #[must_use]
    pub fn validate(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        errors.require_text("task", &self.label, "Task field is required");
        if errors.require_text("repeat", &self.repeat, "Repeat field is required")
            && self.repeat_days().is_none()
        {
            errors.insert("repeat", "Repeat must be a valid number");
        }

        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) if start > end => {
                errors.insert("startDate", "Start date must be lesser than end date");
            }
            (start, end) => {
                if start.is_none() {
                    errors.insert("startDate", "Start date field is required");
                }
                if end.is_none() {
                    errors.insert("endDate", "End date field is required");
                }
            }
        }
        errors
    }

    /// Derived duration, once both dates are set
    #[must_use]
    pub fn duration_days(&self) -> Option<i64> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(start.days_until(&end)),
            _ => None,
        }
    }

    /// Validate and build a task under a fresh identifier
    ///
    /// # Errors
    /// [`CompositionError::InvalidFields`] if any field fails
    pub fn into_task(self) -> Result<StageTask, CompositionError> {
        self.validate().into_result()?;
        let (Some(repeat), Some(start), Some(end)) =
            (self.repeat_days(), self.start_date, self.end_date)
        else {
            return Err(CompositionError::InvalidFields(self.validate()));
        };
        let task = StageTask::new(new_document_id(), self.label.trim(), repeat, start, end)?;
        tracing::debug!(id = task.identifier(), "task drafted");
        Ok(task)
    }

    fn repeat_days(&self) -> Option<u32> {
        self.repeat
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|days| *days > 0)
    }
}
