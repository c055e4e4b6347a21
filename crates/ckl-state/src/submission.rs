//! # Submission Builder
//!
//! Assembles the payload persisted for a checklist from its identity, title,
//! date, and the current form state. Building has no side effects; sending
//! the payload is the store's job.
//!
//! Wire shape:
//!
//! ```json
//! {
//!   "checklistId": "c1",
//!   "title": "Daily Report",
//!   "date": "2025-03-01",
//!   "items": [{"title": "No of Tasks Worked", "response": "5", "comment": "", "field": "tasksWorked"}]
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ckl_core::{ChecklistDate, ChecklistId, ChecklistItem, Schema};

use crate::form::FormState;

/// Errors from the builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The form was opened from a submitted record.
    #[error("checklist {checklist_id} is read-only and cannot be submitted")]
    NotEditable {
        /// The checklist the caller tried to submit.
        checklist_id: ChecklistId,
    },
}

/// A complete submission, ready for the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    /// Which checklist this submission answers.
    pub checklist_id: ChecklistId,
    /// Checklist display title.
    pub title: String,
    /// Date the answers are for.
    pub date: ChecklistDate,
    /// One item per schema field, in schema order.
    pub items: Vec<ChecklistItem>,
}

/// Build a payload from an editable form.
///
/// # Errors
///
/// [`SubmissionError::NotEditable`] if the form is read-only.
pub fn build(
    checklist_id: &ChecklistId,
    title: &str,
    date: ChecklistDate,
    form: &FormState,
    schema: &Schema,
) -> Result<SubmissionPayload, SubmissionError> {
    if !form.mode().is_editable() {
        return Err(SubmissionError::NotEditable {
            checklist_id: checklist_id.clone(),
        });
    }
    Ok(SubmissionPayload {
        checklist_id: checklist_id.clone(),
        title: title.to_string(),
        date,
        items: form.responses().serialize(schema),
    })
}
