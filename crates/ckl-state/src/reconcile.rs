//! # Response Reconciler
//!
//! Maps between the persisted item list (`[{title, response, comment}]`) and
//! the keyed working shape (`{key: value}` + `{key: comment}`).
//!
//! ## Hydration
//!
//! For each schema field, in order, the first matching item wins:
//!
//! 1. an item whose stable `field` equals the field key;
//! 2. otherwise, a legacy item (no `field`, or a `field` this schema does not
//!    know) whose `title` equals the field label exactly.
//!
//! A matched item copies its `response` (when present) and its `comment`
//! (default `""`). Unmatched fields keep the schema default. Items matching
//! no field are dropped without error.
//!
//! ## Serialization
//!
//! Exactly one item per schema field, in schema order, with
//! `title = label`, `response = values[key]`, `comment = comments[key]`
//! and `field = key`. Untouched fields are emitted at their defaults.

use std::collections::BTreeMap;

use ckl_core::{ChecklistItem, FieldKey, FieldSchema, Schema};

/// Keyed responses and comments for every field of a schema.
///
/// Both maps always hold exactly the schema's keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responses {
    values: BTreeMap<FieldKey, String>,
    comments: BTreeMap<FieldKey, String>,
}

impl Responses {
    /// Every field at its schema default, every comment empty.
    pub fn defaults(schema: &Schema) -> Self {
        let values = schema
            .iter()
            .map(|f| (f.key.clone(), f.default_value().to_string()))
            .collect();
        let comments = schema
            .iter()
            .map(|f| (f.key.clone(), String::new()))
            .collect();
        Self { values, comments }
    }

    /// Populate responses from a persisted item list.
    pub fn hydrate(items: &[ChecklistItem], schema: &Schema) -> Self {
        let mut responses = Self::defaults(schema);
        for field in schema {
            let Some(item) = find_item(items, field, schema) else {
                continue;
            };
            if let Some(response) = &item.response {
                responses.values.insert(field.key.clone(), response.clone());
            }
            responses
                .comments
                .insert(field.key.clone(), item.comment.clone().unwrap_or_default());
        }

        if tracing::enabled!(tracing::Level::TRACE) {
            for item in items.iter().filter(|i| !matches_any(i, schema)) {
                tracing::trace!(title = %item.title, "dropping item with no schema match");
            }
        }
        responses
    }

    /// Produce the persisted item list, one item per schema field in order.
    pub fn serialize(&self, schema: &Schema) -> Vec<ChecklistItem> {
        schema
            .iter()
            .map(|f| ChecklistItem {
                title: f.label.clone(),
                response: Some(
                    self.values
                        .get(&f.key)
                        .cloned()
                        .unwrap_or_else(|| f.default_value().to_string()),
                ),
                comment: Some(self.comments.get(&f.key).cloned().unwrap_or_default()),
                field: Some(f.key.clone()),
            })
            .collect()
    }

    /// Current value of a field.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Current comment of a field.
    pub fn comment(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }

    /// All values, keyed.
    pub fn values(&self) -> &BTreeMap<FieldKey, String> {
        &self.values
    }

    /// All comments, keyed.
    pub fn comments(&self) -> &BTreeMap<FieldKey, String> {
        &self.comments
    }

    /// Overwrite a value. Returns `false` if the key is not tracked.
    pub(crate) fn put_value(&mut self, key: &str, value: String) -> bool {
        match self.values.get_mut(key) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Overwrite a comment. Returns `false` if the key is not tracked.
    pub(crate) fn put_comment(&mut self, key: &str, comment: String) -> bool {
        match self.comments.get_mut(key) {
            Some(slot) => {
                *slot = comment;
                true
            }
            None => false,
        }
    }
}

fn find_item<'i>(
    items: &'i [ChecklistItem],
    field: &FieldSchema,
    schema: &Schema,
) -> Option<&'i ChecklistItem> {
    items
        .iter()
        .find(|i| i.field.as_ref() == Some(&field.key))
        .or_else(|| {
            items
                .iter()
                .find(|i| is_legacy(i, schema) && i.title == field.label)
        })
}

fn is_legacy(item: &ChecklistItem, schema: &Schema) -> bool {
    match &item.field {
        None => true,
        Some(key) => schema.by_key(key.as_str()).is_none(),
    }
}

fn matches_any(item: &ChecklistItem, schema: &Schema) -> bool {
    let by_field = item
        .field
        .as_ref()
        .is_some_and(|k| schema.by_key(k.as_str()).is_some());
    by_field || (is_legacy(item, schema) && schema.by_label(&item.title).is_some())
}
