//! # Checklist Session: View-Mode Controller
//!
//! Governs one opening of one checklist instance, from classification to
//! close.
//!
//! ## States
//!
//! ```text
//!            open (classified Editable)
//!                      │
//!                      ▼
//!   ┌──────────────▶ Editable ──begin_submit──▶ Submitting ──ok──▶ Submitted (terminal)
//!   │                  │                            │
//!   └──────failed──────┼────────────────────────────┘
//!                      │
//!                    close ──▶ Closed (terminal)
//!
//!            open (classified ReadOnly)
//!                      │
//!                      ▼
//!                  ReadOnly ──close──▶ Closed (terminal)
//! ```
//!
//! - `Submitting` still accepts field input; only a second submit is refused.
//! - There is no path from `ReadOnly` back to `Editable`. Reopening a
//!   checklist builds a new session, which re-runs the classifier against
//!   the stored record.
//! - Closing while a submission is in flight is allowed. The eventual
//!   completion is then ignored.
//! - Input on a state that does not accept it is a no-op (`Ok(false)`), not
//!   an error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ckl_core::{ChecklistDate, ChecklistId, ChecklistInstance, Schema};

use crate::classify::ViewMode;
use crate::form::{FieldView, FormState, InputError};
use crate::store::{ChecklistStore, StoreError};
use crate::submission::{build, SubmissionError, SubmissionPayload};

// ─── Session State ───────────────────────────────────────────────────

/// Lifecycle state of an opened checklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Fields accept input; submit is available.
    Editable,
    /// A submission is in flight; fields still accept input.
    Submitting,
    /// Opened from a submitted record; fields are frozen.
    ReadOnly,
    /// The submission was accepted (terminal).
    Submitted,
    /// The view was closed (terminal).
    Closed,
}

impl SessionState {
    /// Whether this state is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Submitted | Self::Closed)
    }

    /// Whether fields accept input in this state.
    pub fn accepts_input(&self) -> bool {
        matches!(self, Self::Editable | Self::Submitting)
    }

    /// Whether a submit action is exposed in this state.
    pub fn can_submit(&self) -> bool {
        matches!(self, Self::Editable)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Editable => "EDITABLE",
            Self::Submitting => "SUBMITTING",
            Self::ReadOnly => "READ_ONLY",
            Self::Submitted => "SUBMITTED",
            Self::Closed => "CLOSED",
        };
        f.write_str(s)
    }
}

impl From<ViewMode> for SessionState {
    fn from(mode: ViewMode) -> Self {
        match mode {
            ViewMode::Editable => Self::Editable,
            ViewMode::ReadOnly => Self::ReadOnly,
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Errors raised by session operations.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Field input was rejected.
    #[error(transparent)]
    Input(#[from] InputError),

    /// Submit was requested on a read-only checklist.
    #[error("checklist {checklist_id} is read-only; only close is available")]
    ReadOnly {
        /// The checklist.
        checklist_id: ChecklistId,
    },

    /// A submission for this opening is already in flight.
    #[error("a submission for checklist {checklist_id} is already in flight")]
    SubmissionInFlight {
        /// The checklist.
        checklist_id: ChecklistId,
    },

    /// The session is in a terminal state.
    #[error("checklist session is in terminal state {state}")]
    TerminalState {
        /// The terminal state.
        state: SessionState,
    },

    /// A completion arrived with no submission in flight.
    #[error("no submission in flight for checklist {checklist_id}")]
    NoSubmissionInFlight {
        /// The checklist.
        checklist_id: ChecklistId,
    },

    /// The store did not accept the submission. The form is unchanged and
    /// the session is editable again.
    #[error("submission of checklist {checklist_id} failed: {source}")]
    SubmissionFailed {
        /// The checklist.
        checklist_id: ChecklistId,
        /// What the store reported.
        #[source]
        source: StoreError,
    },

    /// The builder refused the form.
    #[error(transparent)]
    Build(#[from] SubmissionError),
}

/// Result of delivering a submission outcome to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionOutcome {
    /// The submission was accepted and the session is now `Submitted`.
    Submitted,
    /// The session was closed before the outcome arrived; nothing changed.
    IgnoredAfterClose,
}

// ─── Transition Records ──────────────────────────────────────────────

/// Record of a session state transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionTransitionRecord {
    /// State before the transition.
    pub from_state: SessionState,
    /// State after the transition.
    pub to_state: SessionState,
    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
    /// Why the transition occurred.
    pub reason: String,
}

// ─── Session ─────────────────────────────────────────────────────────

/// One opening of one checklist.
///
/// Owns an independent [`FormState`]; sessions share nothing with each other.
#[derive(Debug, Clone)]
pub struct ChecklistSession<'s> {
    schema: &'s Schema,
    checklist_id: ChecklistId,
    title: String,
    form: FormState,
    state: SessionState,
    transitions: Vec<SessionTransitionRecord>,
}

impl<'s> ChecklistSession<'s> {
    /// Open an instance: classify, hydrate, and pick the initial state.
    pub fn open(instance: &ChecklistInstance, schema: &'s Schema) -> Self {
        let form = FormState::open(instance, schema);
        Self {
            schema,
            checklist_id: instance.id.clone(),
            title: instance.title.clone(),
            state: form.mode().into(),
            form,
            transitions: Vec::new(),
        }
    }

    /// Checklist being viewed.
    pub fn checklist_id(&self) -> &ChecklistId {
        &self.checklist_id
    }

    /// Checklist display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// View mode decided when the session was opened.
    pub fn mode(&self) -> ViewMode {
        self.form.mode()
    }

    /// Working form.
    pub fn form(&self) -> &FormState {
        &self.form
    }

    /// Working date.
    pub fn date(&self) -> ChecklistDate {
        self.form.date()
    }

    /// Ordered log of state transitions.
    pub fn transitions(&self) -> &[SessionTransitionRecord] {
        &self.transitions
    }

    /// Fields in schema order, with editability reflecting the current state.
    pub fn fields(&self) -> impl Iterator<Item = FieldView<'_>> + '_ {
        let accepts = self.state.accepts_input();
        self.form.fields(self.schema).map(move |mut view| {
            view.editable = accepts;
            view
        })
    }

    /// Whether a submit action is exposed right now.
    pub fn can_submit(&self) -> bool {
        self.state.can_submit()
    }

    /// Set a field value. `Ok(false)` when the state does not accept input.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<bool, SessionError> {
        if !self.state.accepts_input() {
            return Ok(false);
        }
        Ok(self.form.set_value(self.schema, key, value)?)
    }

    /// Set a field comment. `Ok(false)` when the state does not accept input.
    pub fn set_comment(&mut self, key: &str, text: &str) -> Result<bool, SessionError> {
        if !self.state.accepts_input() {
            return Ok(false);
        }
        Ok(self.form.set_comment(self.schema, key, text)?)
    }

    /// Change the working date. `false` when the state does not accept input.
    pub fn set_date(&mut self, date: ChecklistDate) -> bool {
        self.state.accepts_input() && self.form.set_date(date)
    }

    /// Start a submission (EDITABLE → SUBMITTING) and return its payload.
    ///
    /// The payload reflects the form at this instant; edits made while the
    /// submission is in flight are not part of it.
    pub fn begin_submit(&mut self) -> Result<SubmissionPayload, SessionError> {
        match self.state {
            SessionState::Editable => {}
            SessionState::Submitting => {
                return Err(SessionError::SubmissionInFlight {
                    checklist_id: self.checklist_id.clone(),
                })
            }
            SessionState::ReadOnly => {
                return Err(SessionError::ReadOnly {
                    checklist_id: self.checklist_id.clone(),
                })
            }
            state @ (SessionState::Submitted | SessionState::Closed) => {
                return Err(SessionError::TerminalState { state })
            }
        }

        let payload = build(
            &self.checklist_id,
            &self.title,
            self.form.date(),
            &self.form,
            self.schema,
        )?;
        self.do_transition(SessionState::Submitting, "submission started");
        Ok(payload)
    }

    /// Deliver the store's verdict for the in-flight submission.
    ///
    /// - success: SUBMITTING → SUBMITTED;
    /// - failure: SUBMITTING → EDITABLE, reported as
    ///   [`SessionError::SubmissionFailed`] with the form untouched;
    /// - closed session: ignored.
    pub fn complete_submit(
        &mut self,
        outcome: Result<(), StoreError>,
    ) -> Result<CompletionOutcome, SessionError> {
        match self.state {
            SessionState::Closed => {
                tracing::debug!(
                    checklist = %self.checklist_id,
                    succeeded = outcome.is_ok(),
                    "ignoring submission outcome for closed checklist"
                );
                return Ok(CompletionOutcome::IgnoredAfterClose);
            }
            SessionState::Submitting => {}
            _ => {
                return Err(SessionError::NoSubmissionInFlight {
                    checklist_id: self.checklist_id.clone(),
                })
            }
        }

        match outcome {
            Ok(()) => {
                self.do_transition(SessionState::Submitted, "submission accepted");
                tracing::info!(
                    checklist = %self.checklist_id,
                    date = %self.form.date(),
                    "checklist submitted"
                );
                Ok(CompletionOutcome::Submitted)
            }
            Err(source) => {
                self.do_transition(SessionState::Editable, "submission failed");
                tracing::warn!(
                    checklist = %self.checklist_id,
                    error = %source,
                    "checklist submission failed"
                );
                Err(SessionError::SubmissionFailed {
                    checklist_id: self.checklist_id.clone(),
                    source,
                })
            }
        }
    }

    /// Submit through a store in one call: begin, send, complete.
    pub fn submit_to<S>(&mut self, store: &S) -> Result<CompletionOutcome, SessionError>
    where
        S: ChecklistStore + ?Sized,
    {
        let payload = self.begin_submit()?;
        let outcome = store.submit(&payload);
        self.complete_submit(outcome)
    }

    /// Close the view. No-op on a terminal session.
    pub fn close(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        let reason = if self.state == SessionState::Submitting {
            "closed with submission in flight"
        } else {
            "closed"
        };
        self.do_transition(SessionState::Closed, reason);
    }

    fn do_transition(&mut self, to: SessionState, reason: &str) {
        self.transitions.push(SessionTransitionRecord {
            from_state: self.state,
            to_state: to,
            timestamp: Utc::now(),
            reason: reason.to_string(),
        });
        self.state = to;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ckl_core::ChecklistItem;

    fn template() -> ChecklistInstance {
        ChecklistInstance::new(ChecklistId::new("c1").unwrap(), "Daily Report")
    }

    fn submitted() -> ChecklistInstance {
        let mut inst = template();
        inst.items = vec![ChecklistItem::new("No of Tasks Worked").with_response("5")];
        inst
    }

    fn backend_down() -> StoreError {
        StoreError::Backend("503 Service Unavailable".to_string())
    }

    // ── Opening ──────────────────────────────────────────────────────

    #[test]
    fn test_open_template_is_editable() {
        let schema = Schema::daily_report();
        let s = ChecklistSession::open(&template(), &schema);
        assert_eq!(s.state(), SessionState::Editable);
        assert_eq!(s.mode(), ViewMode::Editable);
        assert!(s.can_submit());
        assert!(s.transitions().is_empty());
        assert!(s.fields().all(|f| f.editable));
    }

    #[test]
    fn test_open_submitted_is_read_only() {
        let schema = Schema::daily_report();
        let s = ChecklistSession::open(&submitted(), &schema);
        assert_eq!(s.state(), SessionState::ReadOnly);
        assert!(!s.can_submit());
        assert!(s.fields().all(|f| !f.editable));
    }

    // ── Happy path ───────────────────────────────────────────────────

    #[test]
    fn test_edit_then_submit() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        assert!(s.set_value("tasksWorked", "4").unwrap());
        assert!(s.set_comment("tasksWorked", "ok").unwrap());

        let payload = s.begin_submit().unwrap();
        assert_eq!(s.state(), SessionState::Submitting);
        assert_eq!(payload.items[0].response.as_deref(), Some("4"));
        assert_eq!(payload.items[0].comment.as_deref(), Some("ok"));

        assert_eq!(s.complete_submit(Ok(())).unwrap(), CompletionOutcome::Submitted);
        assert_eq!(s.state(), SessionState::Submitted);
        assert!(s.state().is_terminal());
        assert_eq!(s.transitions().len(), 2);
    }

    #[test]
    fn test_payload_uses_working_date() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        let date = ChecklistDate::parse("2025-03-01").unwrap();
        assert!(s.set_date(date));
        assert_eq!(s.begin_submit().unwrap().date, date);
    }

    // ── In-flight guard ──────────────────────────────────────────────

    #[test]
    fn test_second_submit_while_in_flight_is_refused() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        s.begin_submit().unwrap();
        assert!(matches!(
            s.begin_submit(),
            Err(SessionError::SubmissionInFlight { .. })
        ));
        assert_eq!(s.state(), SessionState::Submitting);
    }

    #[test]
    fn test_editing_allowed_while_in_flight() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        s.begin_submit().unwrap();
        assert!(s.set_value("bugsFixes", "1").unwrap());
        assert!(s.set_date(ChecklistDate::parse("2025-01-01").unwrap()));
        assert_eq!(s.form().responses().value("bugsFixes"), Some("1"));
    }

    // ── Failure ──────────────────────────────────────────────────────

    #[test]
    fn test_failure_returns_to_editable_and_preserves_form() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        s.set_value("codeReviews", "2").unwrap();
        s.begin_submit().unwrap();

        let err = s.complete_submit(Err(backend_down())).unwrap_err();
        assert!(matches!(err, SessionError::SubmissionFailed { .. }));
        assert_eq!(s.state(), SessionState::Editable);
        assert_eq!(s.form().responses().value("codeReviews"), Some("2"));

        // retry is a user-driven resubmit
        let retry = s.begin_submit().unwrap();
        assert_eq!(retry.items[5].response.as_deref(), Some("2"));
    }

    #[test]
    fn test_completion_without_submission_is_rejected() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        assert!(matches!(
            s.complete_submit(Ok(())),
            Err(SessionError::NoSubmissionInFlight { .. })
        ));
    }

    // ── Close ────────────────────────────────────────────────────────

    #[test]
    fn test_close_during_flight_ignores_outcome() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        s.begin_submit().unwrap();
        s.close();
        assert_eq!(s.state(), SessionState::Closed);
        assert_eq!(
            s.complete_submit(Ok(())).unwrap(),
            CompletionOutcome::IgnoredAfterClose
        );
        assert_eq!(
            s.complete_submit(Err(backend_down())).unwrap(),
            CompletionOutcome::IgnoredAfterClose
        );
        assert_eq!(s.state(), SessionState::Closed);
        assert_eq!(s.transitions().last().unwrap().reason, "closed with submission in flight");
    }

    #[test]
    fn test_closed_session_rejects_input_and_submit() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&template(), &schema);
        s.close();
        assert!(!s.set_value("tasksWorked", "1").unwrap());
        assert!(!s.set_date(ChecklistDate::parse("2025-01-01").unwrap()));
        assert!(matches!(
            s.begin_submit(),
            Err(SessionError::TerminalState { state: SessionState::Closed })
        ));
    }

    #[test]
    fn test_close_is_idempotent() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&submitted(), &schema);
        s.close();
        s.close();
        assert_eq!(s.transitions().len(), 1);
    }

    // ── Read-only ────────────────────────────────────────────────────

    #[test]
    fn test_read_only_input_is_a_no_op() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&submitted(), &schema);
        let before = s.form().clone();
        assert!(!s.set_value("tasksWorked", "99").unwrap());
        assert!(!s.set_comment("tasksWorked", "changed").unwrap());
        assert!(!s.set_date(ChecklistDate::parse("2031-01-01").unwrap()));
        assert_eq!(s.form(), &before);
    }

    #[test]
    fn test_read_only_cannot_submit() {
        let schema = Schema::daily_report();
        let mut s = ChecklistSession::open(&submitted(), &schema);
        assert!(matches!(s.begin_submit(), Err(SessionError::ReadOnly { .. })));
        assert_eq!(s.state(), SessionState::ReadOnly);
    }

    // ── Display ──────────────────────────────────────────────────────

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Editable.to_string(), "EDITABLE");
        assert_eq!(SessionState::Submitting.to_string(), "SUBMITTING");
        assert_eq!(SessionState::ReadOnly.to_string(), "READ_ONLY");
        assert_eq!(SessionState::Submitted.to_string(), "SUBMITTED");
        assert_eq!(SessionState::Closed.to_string(), "CLOSED");
    }
}
