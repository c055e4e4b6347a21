//! # Field Schema Registry
//!
//! The fixed, ordered set of questions the reconciler understands. A
//! [`Schema`] is an immutable value: it is validated once at construction
//! and then passed explicitly into the classifier, reconciler, and builder.
//!
//! ## Ordering
//!
//! `order` is the canonical rendering and serialization sequence. Reordering
//! a registry changes the item order of future submissions, but never breaks
//! hydration of past ones: matching against persisted items is by stable key
//! or label, not by position.
//!
//! ## Built-in Registry
//!
//! | # | Label | Key | Kind |
//! |---|-------|-----|------|
//! | 1 | No of Tasks Worked | `tasksWorked` | numeric |
//! | 2 | No of Tasks Completed | `tasksCompleted` | numeric |
//! | 3 | No of technical Interview conducted | `technicalInterviews` | numeric |
//! | 4 | Daily Clock In | `clockIn` | binary |
//! | 5 | Daily Clock Out | `clockOut` | binary |
//! | 6 | Code Reviews Done | `codeReviews` | numeric |
//! | 7 | No of Remaining tasks | `remainingTasks` | numeric |
//! | 8 | No of tasks in queue (Not yet started) | `tasksInQueue` | numeric |
//! | 9 | No of Bugs fixed | `bugsFixes` | numeric |

use std::collections::HashSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{SchemaError, ValidationError};
use crate::identity::FieldKey;

/// Number of fields in [`Schema::daily_report()`].
pub const DAILY_REPORT_FIELD_COUNT: usize = 9;

/// Input kind of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text intended to represent a count. No range validation.
    Numeric,
    /// Exactly `"Yes"` or `"No"`.
    Binary,
}

impl FieldKind {
    /// The value a fresh form starts with for a field of this kind.
    pub fn default_value(&self) -> &'static str {
        match self {
            Self::Numeric => "",
            Self::Binary => BinaryAnswer::Yes.as_str(),
        }
    }

    /// Coerce raw input for this kind.
    ///
    /// Numeric input is accepted verbatim. Binary input must be exactly
    /// `"Yes"` or `"No"`.
    pub fn coerce(&self, raw: &str) -> Result<String, ValidationError> {
        match self {
            Self::Numeric => Ok(raw.to_string()),
            Self::Binary => raw.parse::<BinaryAnswer>().map(|a| a.as_str().to_string()),
        }
    }

    /// Returns the snake_case identifier for this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Numeric => "numeric",
            Self::Binary => "binary",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer to a binary field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryAnswer {
    /// Affirmative.
    Yes,
    /// Negative.
    No,
}

impl BinaryAnswer {
    /// The persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }
}

impl std::fmt::Display for BinaryAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BinaryAnswer {
    type Err = ValidationError;

    /// Case-sensitive: only the exact persisted forms are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Yes" => Ok(Self::Yes),
            "No" => Ok(Self::No),
            other => Err(ValidationError::InvalidBinaryAnswer(other.to_string())),
        }
    }
}

/// One question of a checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSchema {
    /// 1-based position in rendering and serialization order.
    pub order: u32,
    /// Exact question text. Legacy join key against persisted item titles.
    pub label: String,
    /// Internal identifier used in form state and as the stable item `field`.
    pub key: FieldKey,
    /// Input kind.
    pub kind: FieldKind,
}

impl FieldSchema {
    /// Create a field definition.
    pub fn new(order: u32, label: impl Into<String>, key: FieldKey, kind: FieldKind) -> Self {
        Self {
            order,
            label: label.into(),
            key,
            kind,
        }
    }

    /// Default form value for this field.
    pub fn default_value(&self) -> &'static str {
        self.kind.default_value()
    }
}

/// A validated, ordered field registry.
///
/// Invariants (checked by [`Schema::new`]): at least one field; orders are
/// unique and start at 1; keys are unique; labels are unique and non-empty.
/// Fields are held sorted by `order`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<FieldSchema>", into = "Vec<FieldSchema>")]
pub struct Schema {
    fields: Vec<FieldSchema>,
}

impl Schema {
    /// Validate and build a registry from field definitions in any order.
    pub fn new(mut fields: Vec<FieldSchema>) -> Result<Self, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut orders = HashSet::new();
        let mut keys = HashSet::new();
        let mut labels = HashSet::new();
        for field in &fields {
            if field.order == 0 {
                return Err(SchemaError::ZeroOrder {
                    key: field.key.to_string(),
                });
            }
            if field.label.trim().is_empty() {
                return Err(SchemaError::EmptyLabel {
                    key: field.key.to_string(),
                });
            }
            if !orders.insert(field.order) {
                return Err(SchemaError::DuplicateOrder { order: field.order });
            }
            if !keys.insert(field.key.as_str()) {
                return Err(SchemaError::DuplicateKey {
                    key: field.key.to_string(),
                });
            }
            if !labels.insert(field.label.as_str()) {
                return Err(SchemaError::DuplicateLabel {
                    label: field.label.clone(),
                });
            }
        }

        fields.sort_by_key(|f| f.order);
        Ok(Self { fields })
    }

    /// The built-in daily report registry (nine questions).
    pub fn daily_report() -> Self {
        use FieldKind::{Binary, Numeric};

        let rows: [(&str, &'static str, FieldKind); DAILY_REPORT_FIELD_COUNT] = [
            ("No of Tasks Worked", "tasksWorked", Numeric),
            ("No of Tasks Completed", "tasksCompleted", Numeric),
            ("No of technical Interview conducted", "technicalInterviews", Numeric),
            ("Daily Clock In", "clockIn", Binary),
            ("Daily Clock Out", "clockOut", Binary),
            ("Code Reviews Done", "codeReviews", Numeric),
            ("No of Remaining tasks", "remainingTasks", Numeric),
            ("No of tasks in queue (Not yet started)", "tasksInQueue", Numeric),
            ("No of Bugs fixed", "bugsFixes", Numeric),
        ];

        let fields = rows
            .into_iter()
            .zip(1u32..)
            .map(|((label, key, kind), order)| {
                FieldSchema::new(order, label, FieldKey::from_static(key), kind)
            })
            .collect();
        Self { fields }
    }

    /// Fields in canonical order.
    pub fn fields(&self) -> &[FieldSchema] {
        &self.fields
    }

    /// Iterate fields in canonical order.
    pub fn iter(&self) -> std::slice::Iter<'_, FieldSchema> {
        self.fields.iter()
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false` for a validated schema; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a field by its internal key.
    pub fn by_key(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.key.as_str() == key)
    }

    /// Look up a field by its exact label.
    pub fn by_label(&self, label: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.label == label)
    }
}

impl TryFrom<Vec<FieldSchema>> for Schema {
    type Error = SchemaError;

    fn try_from(fields: Vec<FieldSchema>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<Schema> for Vec<FieldSchema> {
    fn from(schema: Schema) -> Self {
        schema.fields
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::daily_report()
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a FieldSchema;
    type IntoIter = std::slice::Iter<'a, FieldSchema>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
