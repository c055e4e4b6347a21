//! # Form State
//!
//! The ephemeral working copy of one opened checklist: keyed responses, the
//! view mode decided at open time, and the working date.
//!
//! Classification and hydration both happen inside [`FormState::open`], so a
//! form is never observable half-reconciled. A `ReadOnly` form ignores every
//! input: setters return `Ok(false)` and leave the form untouched.

use thiserror::Error;

use ckl_core::{ChecklistDate, ChecklistInstance, FieldSchema, Schema};

use crate::classify::{classify, ViewMode};
use crate::reconcile::Responses;

/// Input rejected by an editable form.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The key is not part of the schema.
    #[error("unknown field {key}")]
    UnknownField {
        /// The key that was addressed.
        key: String,
    },

    /// A binary field received something other than `Yes`/`No`.
    #[error("field {key} only accepts \"Yes\" or \"No\", got {value:?}")]
    InvalidBinaryAnswer {
        /// The binary field.
        key: String,
        /// The rejected value.
        value: String,
    },
}

/// One field as exposed to a presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldView<'a> {
    /// Schema row for the field.
    pub field: &'a FieldSchema,
    /// Current value.
    pub value: &'a str,
    /// Current comment.
    pub comment: &'a str,
    /// Whether the field currently accepts input.
    pub editable: bool,
}

/// Working state of one opened checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    responses: Responses,
    mode: ViewMode,
    date: ChecklistDate,
}

impl FormState {
    /// Classify and hydrate an instance in one step.
    ///
    /// The working date is the instance date, or today when it has none.
    pub fn open(instance: &ChecklistInstance, schema: &Schema) -> Self {
        let mode = classify(&instance.items);
        let responses = Responses::hydrate(&instance.items, schema);
        tracing::debug!(
            checklist = %instance.id,
            mode = %mode,
            items = instance.items.len(),
            "opened checklist form"
        );
        Self {
            responses,
            mode,
            date: instance.date_or_today(),
        }
    }

    /// The view mode decided at open time.
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// Working date.
    pub fn date(&self) -> ChecklistDate {
        self.date
    }

    /// Current responses.
    pub fn responses(&self) -> &Responses {
        &self.responses
    }

    /// Fields in schema order with their current values.
    pub fn fields<'a>(&'a self, schema: &'a Schema) -> impl Iterator<Item = FieldView<'a>> + 'a {
        let editable = self.mode.is_editable();
        schema.iter().map(move |field| FieldView {
            field,
            value: self.responses.value(field.key.as_str()).unwrap_or_default(),
            comment: self.responses.comment(field.key.as_str()).unwrap_or_default(),
            editable,
        })
    }

    /// Set a field value. Binary fields only accept `Yes`/`No`.
    ///
    /// Returns `Ok(false)` without validating anything when read-only.
    pub fn set_value(&mut self, schema: &Schema, key: &str, raw: &str) -> Result<bool, InputError> {
        if !self.mode.is_editable() {
            return Ok(false);
        }
        let field = lookup(schema, key)?;
        let value = field
            .kind
            .coerce(raw)
            .map_err(|_| InputError::InvalidBinaryAnswer {
                key: key.to_string(),
                value: raw.to_string(),
            })?;
        Ok(self.responses.put_value(key, value))
    }

    /// Set a field comment.
    ///
    /// Returns `Ok(false)` when read-only.
    pub fn set_comment(
        &mut self,
        schema: &Schema,
        key: &str,
        text: &str,
    ) -> Result<bool, InputError> {
        if !self.mode.is_editable() {
            return Ok(false);
        }
        lookup(schema, key)?;
        Ok(self.responses.put_comment(key, text.to_string()))
    }

    /// Change the working date. Returns `false` when read-only.
    pub fn set_date(&mut self, date: ChecklistDate) -> bool {
        if !self.mode.is_editable() {
            return false;
        }
        self.date = date;
        true
    }
}

fn lookup<'s>(schema: &'s Schema, key: &str) -> Result<&'s FieldSchema, InputError> {
    schema.by_key(key).ok_or_else(|| InputError::UnknownField {
        key: key.to_string(),
    })
}
