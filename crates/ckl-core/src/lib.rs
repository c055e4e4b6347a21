//! # ckl-core: Foundational Types for the Checklist Engine
//!
//! This crate is the leaf of the workspace. It defines the data shapes that
//! every other crate agrees on: the field schema registry, checklist
//! identifiers, calendar dates, and the generic `{title, response, comment}`
//! item model that persisted checklists use.
//!
//! ## Key Design Principles
//!
//! 1. **The schema is a value.** [`Schema`] is constructed (validated) and then
//!    passed explicitly to whoever needs it. There is no global registry.
//!    [`Schema::daily_report()`] is the built-in nine-question registry.
//!
//! 2. **Persisted shape is schema-agnostic.** [`ChecklistItem`] is a flat,
//!    title-keyed record. It carries an optional stable `field` key so that
//!    label text can change without orphaning history.
//!
//! 3. **Lenient at the boundary.** [`ChecklistInstance`] deserialization never
//!    fails on a malformed `items` or `date` value; it degrades to "no items"
//!    and "no date" respectively.
//!
//! 4. **Date-only calendar values.** [`ChecklistDate`] is an ISO `YYYY-MM-DD`
//!    date with no time-of-day or offset component.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `ckl-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod item;
pub mod schema;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use error::{SchemaError, ValidationError};
pub use identity::{ChecklistId, FieldKey};
pub use item::{ChecklistInstance, ChecklistItem};
pub use schema::{BinaryAnswer, FieldKind, FieldSchema, Schema, DAILY_REPORT_FIELD_COUNT};
pub use temporal::ChecklistDate;
