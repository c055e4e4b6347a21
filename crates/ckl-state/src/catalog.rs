//! # Assigned Checklist Catalog
//!
//! Listing view over stored instances: a status per checklist, title search,
//! and the two supported orderings.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use ckl_core::{ChecklistDate, ChecklistId, ChecklistInstance};

/// Whether a checklist has been answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChecklistStatus {
    /// At least one submission was accepted.
    Completed,
    /// Never submitted.
    Pending,
}

impl std::fmt::Display for ChecklistStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Completed => f.write_str("Completed"),
            Self::Pending => f.write_str("Pending"),
        }
    }
}

/// Catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CatalogSort {
    /// Most recently assigned first.
    #[default]
    Assigned,
    /// Earliest due first.
    DueDate,
}

/// One row of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedSummary {
    /// Checklist identity.
    pub id: ChecklistId,
    /// Display title.
    pub title: String,
    /// When the checklist was assigned.
    pub assigned_date: Option<ChecklistDate>,
    /// When the checklist is due.
    pub due_date: Option<ChecklistDate>,
    /// Date of the most recent accepted submission.
    pub last_submitted: Option<ChecklistDate>,
    /// `Completed` when `last_submitted` is set.
    pub status: ChecklistStatus,
}

impl AssignedSummary {
    /// Summarize a stored instance.
    pub fn from_instance(instance: &ChecklistInstance) -> Self {
        let status = if instance.last_submitted.is_some() {
            ChecklistStatus::Completed
        } else {
            ChecklistStatus::Pending
        };
        Self {
            id: instance.id.clone(),
            title: instance.title.clone(),
            assigned_date: instance.assigned_date,
            due_date: instance.due_date,
            last_submitted: instance.last_submitted,
            status,
        }
    }
}

/// Summaries whose title contains `search` (case-insensitive), ordered by
/// `sort`.
///
/// An empty or whitespace-only search matches everything. Rows without the
/// sort date go last; ties keep their input order.
pub fn filter_and_sort(
    instances: &[ChecklistInstance],
    search: &str,
    sort: CatalogSort,
) -> Vec<AssignedSummary> {
    let needle = search.trim().to_lowercase();
    let mut rows: Vec<AssignedSummary> = instances
        .iter()
        .filter(|i| needle.is_empty() || i.title.to_lowercase().contains(&needle))
        .map(AssignedSummary::from_instance)
        .collect();

    match sort {
        CatalogSort::Assigned => {
            rows.sort_by(|a, b| missing_last(a.assigned_date, b.assigned_date, |x, y| y.cmp(x)))
        }
        CatalogSort::DueDate => {
            rows.sort_by(|a, b| missing_last(a.due_date, b.due_date, |x, y| x.cmp(y)))
        }
    }
    rows
}

fn missing_last(
    a: Option<ChecklistDate>,
    b: Option<ChecklistDate>,
    present: impl Fn(&ChecklistDate, &ChecklistDate) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => present(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
