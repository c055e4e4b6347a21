//! # ckl-state: Checklist Reconciliation & Submission Engine
//!
//! Turns a persisted checklist instance into a working form, governs whether
//! that form may be edited, and turns it back into a persistable payload.
//!
//! ## Pipeline
//!
//! ```text
//! ChecklistInstance ──▶ classify() ──▶ ViewMode
//!         │                               │
//!         └──▶ Responses::hydrate() ──▶ FormState ──▶ ChecklistSession
//!                                                          │
//!                                   begin_submit() ◀───────┘
//!                                          │
//!                                          ▼
//!                           SubmissionPayload ──▶ ChecklistStore::submit()
//! ```
//!
//! - **Classifier** (`classify.rs`): blank template vs submitted record.
//! - **Reconciler** (`reconcile.rs`): generic items ⇄ keyed responses.
//! - **Form** (`form.rs`): responses + mode + working date; read-only forms
//!   ignore input.
//! - **Submission** (`submission.rs`): payload assembly.
//! - **Session** (`session.rs`): view-mode state machine with an at-most-one
//!   in-flight submission guard.
//! - **Store** (`store.rs`): the persistence seam and an in-memory store.
//! - **Catalog** (`catalog.rs`): assigned-checklist listing, search, and sort.
//!
//! Every operation except the store call is synchronous and pure. The schema
//! is always passed in explicitly.

pub mod catalog;
pub mod classify;
pub mod form;
pub mod reconcile;
pub mod session;
pub mod store;
pub mod submission;

// ─── Classification & reconciliation re-exports ─────────────────────

pub use classify::{classify, ViewMode};
pub use form::{FieldView, FormState, InputError};
pub use reconcile::Responses;

// ─── Submission & session re-exports ────────────────────────────────

pub use session::{
    ChecklistSession, CompletionOutcome, SessionError, SessionState, SessionTransitionRecord,
};
pub use submission::{build, SubmissionError, SubmissionPayload};

// ─── Store & catalog re-exports ─────────────────────────────────────

pub use catalog::{filter_and_sort, AssignedSummary, CatalogSort, ChecklistStatus};
pub use store::{apply_submission, ChecklistStore, MemoryStore, StoreError};
