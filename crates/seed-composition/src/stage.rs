//! Stage task composer
//!
//! Two-state workflow for one stage draft:
//!
//! ```text
//! Editing --begin_picking--> PickingTasks --resume--> Editing
//! ```
//!
//! Resuming with a non-empty picker outcome replaces the task list and
//! recomputes the stage span. An empty outcome keeps the previous list.

use crate::error::CompositionError;
use crate::fields::FieldErrors;
use crate::payload::{new_document_id, WritePayload};
use crate::picker::TaskPickerOutcome;
use seed_catalog::{CatalogItem, Period, SelectionSet, Stage, StageSpan, StageTask};
use std::collections::BTreeSet;

/// Composer workflow state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComposerState {
    /// Stage fields are editable
    #[default]
    Editing,
    /// Task picker is open
    PickingTasks,
}

/// States reachable from `from`
#[must_use]
pub fn allowed_transitions(from: ComposerState) -> Vec<ComposerState> {
    match from {
        ComposerState::Editing => vec![ComposerState::PickingTasks],
        ComposerState::PickingTasks => vec![ComposerState::Editing],
    }
}

/// Check a composer transition
///
/// # Errors
/// [`CompositionError::IllegalTransition`] if `to` is not reachable from `from`
pub fn validate_transition(from: ComposerState, to: ComposerState) -> Result<(), CompositionError> {
    if allowed_transitions(from).contains(&to) {
        Ok(())
    } else {
        Err(CompositionError::IllegalTransition { from, to })
    }
}

/// What a resume did to the stage draft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeEffect {
    /// Picker returned nothing; previous tasks kept
    Unchanged,
    /// Task list replaced
    Replaced {
        /// New task count
        task_count: usize,
        /// Recomputed span
        span: StageSpan,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StageBaseline {
    stage_name: String,
    period: Period,
    task_ids: Vec<String>,
}

/// Submit gate of a stage draft
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageGate {
    /// Per-field errors
    pub field_errors: FieldErrors,
    /// Composer state when evaluated
    pub state: ComposerState,
    /// At least one task attached
    pub has_tasks: bool,
    /// Draft was never saved
    pub is_new: bool,
    /// Draft differs from what was loaded or last saved
    pub dirty: bool,
}

impl StageGate {
    /// Whether the stage may be saved
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ComposerState::Editing
            && self.field_errors.is_empty()
            && self.has_tasks
            && (self.is_new || self.dirty)
    }

    /// First blocking reason as an error
    ///
    /// # Errors
    /// The first failing condition: picker open, fields, no tasks, unchanged
    pub fn into_result(self) -> Result<(), CompositionError> {
        if self.state != ComposerState::Editing {
            return Err(CompositionError::PickerOpen);
        }
        self.field_errors.into_result()?;
        if !self.has_tasks {
            return Err(CompositionError::StageWithoutTasks);
        }
        if !(self.is_new || self.dirty) {
            return Err(CompositionError::Unchanged);
        }
        Ok(())
    }
}

/// Draft of one stage and its task sub-selection
#[derive(Debug, Clone)]
pub struct StageTaskComposer {
    existing_id: Option<String>,
    state: ComposerState,
    stage_name: String,
    period: Period,
    tasks: SelectionSet<StageTask>,
    baseline: Option<StageBaseline>,
}

impl Default for StageTaskComposer {
    fn default() -> Self {
        Self::new()
    }
}

impl StageTaskComposer {
    /// Blank draft for a new stage
    #[must_use]
    pub fn new() -> Self {
        Self {
            existing_id: None,
            state: ComposerState::Editing,
            stage_name: String::new(),
            period: Period::default(),
            tasks: SelectionSet::new(),
            baseline: None,
        }
    }

    /// Draft loaded from a persisted stage, every task pre-marked
    #[must_use]
    pub fn edit(stage: &Stage) -> Self {
        let mut tasks = SelectionSet::from_items(stage.tasks().to_vec());
        tasks.select_all();
        let mut composer = Self {
            existing_id: Some(stage.id().to_string()),
            state: ComposerState::Editing,
            stage_name: stage.stage_name().to_string(),
            period: stage.period(),
            tasks,
            baseline: None,
        };
        composer.baseline = Some(composer.snapshot());
        composer
    }

    /// Current state
    #[inline]
    #[must_use]
    pub fn state(&self) -> ComposerState {
        self.state
    }

    /// Identifier of the stage being edited, `None` for a new stage
    #[inline]
    #[must_use]
    pub fn existing_id(&self) -> Option<&str> {
        self.existing_id.as_deref()
    }

    /// Draft was never saved
    #[inline]
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.existing_id.is_none()
    }

    /// Stage name as entered
    #[inline]
    #[must_use]
    pub fn stage_name(&self) -> &str {
        &self.stage_name
    }

    /// Replace the stage name
    pub fn set_stage_name(&mut self, name: impl Into<String>) {
        self.stage_name = name.into();
    }

    /// Growing period
    #[inline]
    #[must_use]
    pub fn period(&self) -> Period {
        self.period
    }

    /// Replace the growing period
    pub fn set_period(&mut self, period: Period) {
        self.period = period;
    }

    /// Tasks attached to the draft, in picker order
    #[must_use]
    pub fn tasks(&self) -> Vec<&StageTask> {
        self.tasks.chosen_items()
    }

    /// Derived span of the attached tasks
    #[must_use]
    pub fn span(&self) -> Option<StageSpan> {
        StageSpan::from_tasks(self.tasks.chosen_items())
    }

    /// Open the task picker
    ///
    /// Returns the identifiers the picker should pre-mark.
    ///
    /// # Errors
    /// [`CompositionError::IllegalTransition`] if the picker is already open
    pub fn begin_picking(&mut self) -> Result<BTreeSet<String>, CompositionError> {
        validate_transition(self.state, ComposerState::PickingTasks)?;
        self.state = ComposerState::PickingTasks;
        Ok(self.tasks.chosen_identifiers())
    }

    /// Fold the picker result back into the draft
    ///
    /// # Errors
    /// [`CompositionError::IllegalTransition`] if the picker is not open
    pub fn resume(&mut self, outcome: TaskPickerOutcome) -> Result<ResumeEffect, CompositionError> {
        validate_transition(self.state, ComposerState::Editing)?;
        self.state = ComposerState::Editing;

        let tasks = outcome.into_tasks();
        let Some(span) = StageSpan::from_tasks(&tasks) else {
            tracing::debug!("picker closed without tasks, keeping previous list");
            return Ok(ResumeEffect::Unchanged);
        };

        let task_count = tasks.len();
        self.tasks.load(tasks);
        self.tasks.select_all();
        tracing::debug!(task_count, start = %span.start, end = %span.end, "stage tasks replaced");
        Ok(ResumeEffect::Replaced { task_count, span })
    }

    /// Evaluate the submit gate
    #[must_use]
    pub fn gate(&self) -> StageGate {
        let mut field_errors = FieldErrors::new();
        field_errors.require_text("stageName", &self.stage_name, "Stage Name field is required");
        StageGate {
            field_errors,
            state: self.state,
            has_tasks: self.tasks.has_any_chosen(),
            is_new: self.is_new(),
            dirty: self.is_dirty(),
        }
    }

    /// Assemble the persisted stage
    ///
    /// A new stage gets a fresh identifier on every call.
    ///
    /// # Errors
    /// The gate's blocking reason when it is closed
    pub fn build(&self) -> Result<Stage, CompositionError> {
        self.gate().into_result()?;
        let id = self.existing_id.clone().unwrap_or_else(new_document_id);
        let tasks = self.tasks.chosen_items().into_iter().cloned().collect();
        Ok(Stage::new(id, self.stage_name.trim(), self.period, tasks))
    }

    /// Build and encode as an insert or update
    ///
    /// # Errors
    /// As [`Self::build`], or [`CompositionError::Encoding`]
    pub fn to_payload(&self) -> Result<WritePayload, CompositionError> {
        let stage = self.build()?;
        WritePayload::from_document(&stage, self.is_new())
    }

    /// Record a successful save under `id`
    pub fn mark_saved(&mut self, id: impl Into<String>) {
        self.existing_id = Some(id.into());
        self.baseline = Some(self.snapshot());
    }

    fn is_dirty(&self) -> bool {
        self.baseline
            .as_ref()
            .map_or(true, |baseline| *baseline != self.snapshot())
    }

    fn snapshot(&self) -> StageBaseline {
        StageBaseline {
            stage_name: self.stage_name.clone(),
            period: self.period,
            task_ids: self
                .tasks
                .chosen_items()
                .iter()
                .map(|task| task.identifier().to_string())
                .collect(),
        }
    }
}
