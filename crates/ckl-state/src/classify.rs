//! # Instance Classifier
//!
//! Decides whether a checklist instance is a blank template or an
//! already-submitted record:
//!
//! > ReadOnly iff at least one item has a `response` that is present and
//! > non-empty; otherwise Editable.
//!
//! The rule is total. An empty item list is a new checklist with no answers
//! yet and classifies as Editable. Malformed `items` never reach this
//! function: [`ckl_core::ChecklistInstance`] deserializes them as "no items".

use serde::{Deserialize, Serialize};

use ckl_core::ChecklistItem;

/// Whether fields of an opened checklist accept input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewMode {
    /// Unfilled template: fields accept input and a submit action exists.
    Editable,
    /// Submitted record: fields are frozen; only close is available.
    ReadOnly,
}

impl ViewMode {
    /// Whether fields accept input in this mode.
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Editable)
    }
}

impl std::fmt::Display for ViewMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editable => "EDITABLE",
            Self::ReadOnly => "READ_ONLY",
        };
        f.write_str(s)
    }
}

/// Classify an instance by its items.
pub fn classify(items: &[ChecklistItem]) -> ViewMode {
    let answered = items
        .iter()
        .any(|item| item.response.as_deref().is_some_and(|r| !r.is_empty()));
    if answered {
        ViewMode::ReadOnly
    } else {
        ViewMode::Editable
    }
}
