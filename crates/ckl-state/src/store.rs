//! # Checklist Store
//!
//! The persistence seam. The engine never talks to a network or a disk
//! itself; it fetches instances from, and hands payloads to, a
//! [`ChecklistStore`].
//!
//! Submission semantics are overwrite, not append: a submit replaces the
//! stored items and date of the checklist and records the submission date.
//! [`apply_submission`] is the shared implementation of that rule.

use std::collections::BTreeMap;

use parking_lot::RwLock;
use thiserror::Error;

use ckl_core::{ChecklistId, ChecklistInstance};

use crate::submission::SubmissionPayload;

/// Errors reported by a store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No checklist with this id.
    #[error("checklist not found: {0}")]
    NotFound(ChecklistId),

    /// A checklist with this id already exists.
    #[error("checklist already exists: {0}")]
    AlreadyExists(ChecklistId),

    /// The backend failed (I/O, transport, remote rejection).
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Persistence collaborator for checklist instances.
///
/// Implementations must be `Send + Sync` so one store can serve many
/// sessions across threads.
pub trait ChecklistStore: Send + Sync {
    /// Fetch one instance.
    fn fetch(&self, id: &ChecklistId) -> Result<ChecklistInstance, StoreError>;

    /// Persist a submission keyed by its checklist id, overwriting prior answers.
    fn submit(&self, payload: &SubmissionPayload) -> Result<(), StoreError>;

    /// Register a new instance (typically a blank template).
    fn create(&self, instance: ChecklistInstance) -> Result<(), StoreError>;

    /// All instances, ordered by id.
    fn list(&self) -> Result<Vec<ChecklistInstance>, StoreError>;
}

/// Overwrite an instance with a submission.
///
/// Replaces `items` and `date`, and sets `last_submitted` to the payload
/// date. The title is left as stored.
pub fn apply_submission(instance: &mut ChecklistInstance, payload: &SubmissionPayload) {
    instance.items = payload.items.clone();
    instance.date = Some(payload.date);
    instance.last_submitted = Some(payload.date);
}

/// Thread-safe in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    instances: RwLock<BTreeMap<ChecklistId, ChecklistInstance>>,
}

impl MemoryStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored instances.
    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }
}

impl ChecklistStore for MemoryStore {
    fn fetch(&self, id: &ChecklistId) -> Result<ChecklistInstance, StoreError> {
        self.instances
            .read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn submit(&self, payload: &SubmissionPayload) -> Result<(), StoreError> {
        let mut guard = self.instances.write();
        let instance = guard
            .get_mut(&payload.checklist_id)
            .ok_or_else(|| StoreError::NotFound(payload.checklist_id.clone()))?;
        apply_submission(instance, payload);
        tracing::debug!(
            checklist = %payload.checklist_id,
            date = %payload.date,
            "stored submission"
        );
        Ok(())
    }

    fn create(&self, instance: ChecklistInstance) -> Result<(), StoreError> {
        let mut guard = self.instances.write();
        if guard.contains_key(&instance.id) {
            return Err(StoreError::AlreadyExists(instance.id));
        }
        guard.insert(instance.id.clone(), instance);
        Ok(())
    }

    fn list(&self) -> Result<Vec<ChecklistInstance>, StoreError> {
        Ok(self.instances.read().values().cloned().collect())
    }
}
