//! # Generic Checklist Items
//!
//! The persisted, schema-agnostic shape of a checklist: an ordered list of
//! `{title, response, comment}` records plus the identity and date of the
//! occurrence. The engine reads this shape when hydrating a form and produces
//! it when serializing one; it never mutates an instance in place.
//!
//! ## Stable field identifiers
//!
//! Items written by this engine also carry `field`, the schema key of the
//! question. Hydration prefers it over the human-readable `title`, so label
//! text can be edited without orphaning stored answers. Records written
//! before `field` existed are still matched by title.
//!
//! ## Leniency
//!
//! Records come from an external store and may be old or hand-edited.
//! Deserialization of [`ChecklistInstance`] therefore never fails on content:
//!
//! - a non-sequence `items` value becomes an empty list;
//! - individual entries that are not objects are dropped;
//! - scalar `response`/`comment` values are stringified (`5` → `"5"`);
//! - an unparseable `date` becomes absent;
//! - an invalid `field` key becomes absent.
//!
//! Only the checklist `id` is strict.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::identity::{ChecklistId, FieldKey};
use crate::schema::Schema;
use crate::temporal::ChecklistDate;

/// One persisted question/answer record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    /// Question text at the time of writing.
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    /// Answer, absent on unfilled templates.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub response: Option<String>,
    /// Free-text remark attached to the answer.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub comment: Option<String>,
    /// Stable schema key of the question.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_field_key"
    )]
    pub field: Option<FieldKey>,
}

impl ChecklistItem {
    /// An unanswered item with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the response.
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Set the comment.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the stable field key.
    pub fn with_field(mut self, field: FieldKey) -> Self {
        self.field = Some(field);
        self
    }
}

/// A concrete checklist occurrence as fetched from the external store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistInstance {
    /// Identity of this occurrence.
    pub id: ChecklistId,
    /// Display name, independent of the schema.
    #[serde(default, deserialize_with = "lenient_title")]
    pub title: String,
    /// Date the submission is associated with.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub date: Option<ChecklistDate>,
    /// Persisted items, in stored order.
    #[serde(default, deserialize_with = "lenient_items")]
    pub items: Vec<ChecklistItem>,
    /// When the checklist was assigned to its user.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub assigned_date: Option<ChecklistDate>,
    /// When the checklist is due.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub due_date: Option<ChecklistDate>,
    /// Date of the most recent accepted submission.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub last_submitted: Option<ChecklistDate>,
}

impl ChecklistInstance {
    /// An instance with no items and no dates.
    pub fn new(id: ChecklistId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            date: None,
            items: Vec::new(),
            assigned_date: None,
            due_date: None,
            last_submitted: None,
        }
    }

    /// A fresh template: one unanswered item per schema field, in order.
    ///
    /// The title is trimmed and must not be empty.
    pub fn blank(id: ChecklistId, title: &str, schema: &Schema) -> Result<Self, ValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        let mut instance = Self::new(id, title);
        instance.items = schema
            .iter()
            .map(|f| ChecklistItem::new(f.label.clone()).with_field(f.key.clone()))
            .collect();
        Ok(instance)
    }

    /// The stored date, or today when none is stored.
    pub fn date_or_today(&self) -> ChecklistDate {
        self.date.unwrap_or_else(ChecklistDate::today)
    }
}

// ─── Lenient deserializers ───────────────────────────────────────────

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?))
}

fn lenient_title<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_field_key<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<FieldKey>, D::Error> {
    Ok(value_to_text(Value::deserialize(deserializer)?).and_then(|s| FieldKey::new(s).ok()))
}

fn lenient_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ChecklistDate>, D::Error> {
    let raw = value_to_text(Value::deserialize(deserializer)?);
    Ok(raw.and_then(|s| {
        let parsed = ChecklistDate::parse_lenient(&s);
        if parsed.is_none() {
            tracing::warn!(date = %s, "unparseable checklist date, treating as absent");
        }
        parsed
    }))
}

fn lenient_items<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<ChecklistItem>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(entries) => Ok(entries
            .into_iter()
            .filter_map(|entry| match entry {
                Value::Object(_) => serde_json::from_value(entry).ok(),
                _ => None,
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => {
            tracing::warn!(
                kind = value_kind(&other),
                "checklist items is not a sequence, treating as empty"
            );
            Ok(Vec::new())
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
