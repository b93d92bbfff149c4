//! Operator commands
//!
//! Each command works against any [`DocumentStore`]; the binary wires them to
//! a snapshot-backed store and prints the results.

use crate::draft::CompositionDraft;
use crate::error::ToolError;
use seed_catalog::Category;
use seed_core::{
    AdminConfig, CatalogLoader, CompositionSession, DocumentStore, RiceSeedSummary,
    SessionTarget, SubmitReceipt,
};
use std::fmt::{self, Write as _};
use std::sync::Arc;

/// Item counts of the reference catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogReport {
    /// Count per category, in form order
    pub counts: Vec<(Category, usize)>,
    /// Tasks available to the task picker
    pub task_count: usize,
}

impl CatalogReport {
    /// Categories a composition cannot be completed without
    #[must_use]
    pub fn empty_categories(&self) -> Vec<Category> {
        self.counts
            .iter()
            .filter(|(_, count)| *count == 0)
            .map(|(category, _)| *category)
            .collect()
    }
}

impl fmt::Display for CatalogReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (category, count) in &self.counts {
            writeln!(f, "{:<12} {count}", category.label())?;
        }
        write!(f, "{:<12} {}", "tasks", self.task_count)?;
        let empty = self.empty_categories();
        if !empty.is_empty() {
            let names: Vec<_> = empty.iter().map(Category::label).collect();
            write!(f, "\nempty: {}", names.join(", "))?;
        }
        Ok(())
    }
}

/// Count the reference catalog and task collection
///
/// # Errors
/// [`ToolError::Admin`] if the store fails or a document is malformed
pub async fn catalog_report(
    store: &dyn DocumentStore,
    config: &AdminConfig,
) -> Result<CatalogReport, ToolError> {
    let loader = CatalogLoader::new(store, config);
    let catalog = loader.load().await?;
    let tasks = loader.load_tasks().await?;
    Ok(CatalogReport {
        counts: Category::ALL
            .into_iter()
            .map(|category| (category, catalog.count(category)))
            .collect(),
        task_count: tasks.len(),
    })
}

/// Apply `draft` in a fresh session and submit it
///
/// # Errors
/// - [`ToolError::UnknownKey`] if the draft names a missing item
/// - [`ToolError::Admin`] if the session refuses to open, the gate is
///   closed or the write fails
pub async fn compose(
    store: Arc<dyn DocumentStore>,
    config: AdminConfig,
    draft: &CompositionDraft,
    target: SessionTarget,
    is_authorized: bool,
) -> Result<SubmitReceipt, ToolError> {
    let session = CompositionSession::open(store, config, target, is_authorized).await?;
    draft.apply(&session)?;

    let gate = session.gate();
    if !gate.is_open() {
        tracing::warn!(
            missing = ?gate.missing_categories,
            fields = %gate.field_errors,
            dirty = gate.dirty,
            "composition gate closed"
        );
    }
    Ok(session.submit().await?)
}

/// Plain-text table of composition rows
#[must_use]
pub fn render_rows(rows: &[RiceSeedSummary]) -> String {
    let mut out = String::new();
    for row in rows {
        // Writing to a String cannot fail
        let _ = writeln!(
            out,
            "{}  {}  total {}",
            row.id, row.name, row.ingredient_total_price
        );
        for (label, names) in [
            ("locations", &row.locations),
            ("soils", &row.soils),
            ("weathers", &row.weathers),
            ("ingredients", &row.ingredients),
            ("stages", &row.stages),
        ] {
            let _ = writeln!(out, "  {label}: {names}");
        }
    }
    out
}
