//! # ckl-cli: Command-Line Front End for the Checklist Engine
//!
//! Provides the `ckl` binary. A directory of JSON files stands in for the
//! external checklist store, so the full lifecycle can be driven locally:
//!
//! ```bash
//! ckl create --id c1 --title "Daily Report" --due 2025-03-07
//! ckl show --id c1
//! ckl fill --id c1 --set tasksWorked=5 --comment tasksWorked="done early" --date 2025-03-01
//! ckl list --search daily --sort due
//! ```
//!
//! A checklist that already carries an answer opens read-only; `fill`
//! refuses it.

pub mod checklist;
pub mod config;
pub mod store;
