//! # Checklist Subcommands
//!
//! - `schema`: Print the field registry.
//! - `create`: Create a blank checklist.
//! - `show`: Open a checklist and print its mode, date and fields.
//! - `fill`: Answer an editable checklist and submit it.
//! - `list`: List checklists with status, search and sort.

use anyhow::{bail, Context, Result};
use clap::{Subcommand, ValueEnum};

use ckl_core::{ChecklistDate, ChecklistId, ChecklistInstance};
use ckl_state::{
    filter_and_sort, CatalogSort, ChecklistSession, ChecklistStore, CompletionOutcome, FormState,
    ViewMode,
};

use crate::config::Settings;
use crate::store::FileStore;

/// Checklist subcommands.
#[derive(Subcommand, Debug)]
pub enum ChecklistCommand {
    /// Print the field registry in order.
    Schema,

    /// Create a blank checklist from the field registry.
    Create {
        /// Checklist title.
        #[arg(long)]
        title: String,
        /// Checklist identifier. A random UUID when omitted.
        #[arg(long)]
        id: Option<String>,
        /// Assignment date (YYYY-MM-DD).
        #[arg(long)]
        assigned: Option<ChecklistDate>,
        /// Due date (YYYY-MM-DD).
        #[arg(long)]
        due: Option<ChecklistDate>,
    },

    /// Show a checklist as it opens: mode, working date and every field.
    Show {
        /// Checklist identifier.
        #[arg(long)]
        id: String,
        /// Print the opened form as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Answer an editable checklist and submit it.
    Fill {
        /// Checklist identifier.
        #[arg(long)]
        id: String,
        /// Field value, as KEY=VALUE. Repeatable.
        #[arg(long = "set", value_parser = parse_assignment)]
        set: Vec<(String, String)>,
        /// Field comment, as KEY=TEXT. Repeatable.
        #[arg(long = "comment", value_parser = parse_assignment)]
        comment: Vec<(String, String)>,
        /// Date the answers are for (YYYY-MM-DD). Defaults to the stored date or today.
        #[arg(long)]
        date: Option<ChecklistDate>,
    },

    /// List checklists.
    List {
        /// Case-insensitive title filter.
        #[arg(long, default_value = "")]
        search: String,
        /// Sort order.
        #[arg(long, value_enum, default_value = "assigned")]
        sort: SortArg,
    },
}

/// Sort order for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    /// Most recently assigned first.
    Assigned,
    /// Earliest due first.
    Due,
}

impl From<SortArg> for CatalogSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Assigned => CatalogSort::Assigned,
            SortArg::Due => CatalogSort::DueDate,
        }
    }
}

/// Parse `KEY=VALUE`. The value may be empty and may contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

/// Execute a checklist subcommand.
pub fn run_checklist(command: &ChecklistCommand, settings: &Settings) -> Result<u8> {
    let store = FileStore::new(&settings.state_dir);

    match command {
        ChecklistCommand::Schema => cmd_schema(settings),
        ChecklistCommand::Create {
            title,
            id,
            assigned,
            due,
        } => cmd_create(&store, settings, title, id.as_deref(), *assigned, *due),
        ChecklistCommand::Show { id, json } => cmd_show(&store, settings, id, *json),
        ChecklistCommand::Fill {
            id,
            set,
            comment,
            date,
        } => cmd_fill(&store, settings, id, set, comment, *date),
        ChecklistCommand::List { search, sort } => cmd_list(&store, search, (*sort).into()),
    }
}

fn parse_id(raw: &str) -> Result<ChecklistId> {
    ChecklistId::new(raw).with_context(|| format!("invalid checklist id {raw:?}"))
}

fn cmd_schema(settings: &Settings) -> Result<u8> {
    println!("Fields ({}):", settings.schema.len());
    for field in &settings.schema {
        println!(
            "  {:>2}. {} [{}, {}, default {:?}]",
            field.order,
            field.label,
            field.key,
            field.kind,
            field.default_value()
        );
    }
    Ok(0)
}

/// Create a blank checklist and return its id.
pub fn create_checklist(
    store: &impl ChecklistStore,
    settings: &Settings,
    title: &str,
    id: Option<&str>,
    assigned: Option<ChecklistDate>,
    due: Option<ChecklistDate>,
) -> Result<ChecklistId> {
    let id = match id {
        Some(raw) => parse_id(raw)?,
        None => parse_id(&uuid::Uuid::new_v4().to_string())?,
    };
    let mut instance = ChecklistInstance::blank(id.clone(), title, &settings.schema)
        .context("cannot create checklist")?;
    instance.assigned_date = Some(assigned.unwrap_or_else(ChecklistDate::today));
    instance.due_date = due;
    store.create(instance)?;
    Ok(id)
}

fn cmd_create(
    store: &FileStore,
    settings: &Settings,
    title: &str,
    id: Option<&str>,
    assigned: Option<ChecklistDate>,
    due: Option<ChecklistDate>,
) -> Result<u8> {
    let id = create_checklist(store, settings, title, id, assigned, due)?;
    println!("OK: created checklist {id}");
    Ok(0)
}

fn cmd_show(store: &FileStore, settings: &Settings, id: &str, json: bool) -> Result<u8> {
    let id = parse_id(id)?;
    let instance = store.fetch(&id)?;
    let form = FormState::open(&instance, &settings.schema);

    if json {
        let fields: Vec<serde_json::Value> = form
            .fields(&settings.schema)
            .map(|f| {
                serde_json::json!({
                    "key": f.field.key,
                    "label": f.field.label,
                    "value": f.value,
                    "comment": f.comment,
                })
            })
            .collect();
        let out = serde_json::json!({
            "checklistId": id,
            "title": instance.title,
            "mode": form.mode().to_string(),
            "date": form.date(),
            "fields": fields,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(0);
    }

    println!("Checklist: {id}");
    println!("  Title: {}", instance.title);
    println!("  Mode: {}", form.mode());
    println!("  Date: {}", form.date());
    for view in form.fields(&settings.schema) {
        println!("  [{}] {}: {}", view.field.key, view.field.label, view.value);
        if !view.comment.is_empty() {
            println!("      comment: {}", view.comment);
        }
    }
    Ok(0)
}

/// Open, answer and submit a checklist. Returns the submitted date.
pub fn fill_checklist(
    store: &impl ChecklistStore,
    settings: &Settings,
    id: &str,
    values: &[(String, String)],
    comments: &[(String, String)],
    date: Option<ChecklistDate>,
) -> Result<ChecklistDate> {
    let id = parse_id(id)?;
    let instance = store.fetch(&id)?;
    let mut session = ChecklistSession::open(&instance, &settings.schema);
    if session.mode() == ViewMode::ReadOnly {
        bail!("checklist {id} has already been submitted and is read-only");
    }

    for (key, value) in values {
        session
            .set_value(key, value)
            .with_context(|| format!("cannot set {key}"))?;
    }
    for (key, text) in comments {
        session
            .set_comment(key, text)
            .with_context(|| format!("cannot comment on {key}"))?;
    }
    if let Some(date) = date {
        session.set_date(date);
    }

    let submitted_for = session.date();
    match session.submit_to(store)? {
        CompletionOutcome::Submitted => Ok(submitted_for),
        CompletionOutcome::IgnoredAfterClose => {
            bail!("checklist {id} was closed before its submission completed")
        }
    }
}

fn cmd_fill(
    store: &FileStore,
    settings: &Settings,
    id: &str,
    values: &[(String, String)],
    comments: &[(String, String)],
    date: Option<ChecklistDate>,
) -> Result<u8> {
    let date = fill_checklist(store, settings, id, values, comments, date)?;
    println!("OK: submitted checklist {id} for {date}");
    Ok(0)
}

fn cmd_list(store: &FileStore, search: &str, sort: CatalogSort) -> Result<u8> {
    let instances = store.list()?;
    let rows = filter_and_sort(&instances, search, sort);

    if rows.is_empty() {
        println!("No checklists found.");
        return Ok(0);
    }

    println!("Checklists ({}):", rows.len());
    for row in &rows {
        let assigned = row.assigned_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        let due = row.due_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into());
        println!(
            "  {}: {} [{}] assigned {assigned} due {due}",
            row.id, row.title, row.status
        );
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ckl_core::Schema;
    use std::path::Path;

    fn settings(dir: &Path) -> Settings {
        Settings {
            state_dir: dir.to_path_buf(),
            schema: Schema::daily_report(),
        }
    }

    fn assignments(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_assignment_splits_on_first_equals() {
        assert_eq!(
            parse_assignment("tasksWorked=3"),
            Ok(("tasksWorked".to_string(), "3".to_string()))
        );
        assert_eq!(
            parse_assignment("clockIn=a=b"),
            Ok(("clockIn".to_string(), "a=b".to_string()))
        );
        assert_eq!(
            parse_assignment("bugsFixes="),
            Ok(("bugsFixes".to_string(), String::new()))
        );
        assert!(parse_assignment("novalue").is_err());
        assert!(parse_assignment("=3").is_err());
    }

    #[test]
    fn create_assigns_uuid_and_today_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path());
        let store = FileStore::new(dir.path());
        let id = create_checklist(&store, &s, "  Daily Report ", None, None, None).unwrap();
        assert!(uuid::Uuid::parse_str(id.as_str()).is_ok());

        let stored = store.fetch(&id).unwrap();
        assert_eq!(stored.title, "Daily Report");
        assert_eq!(stored.items.len(), 9);
        assert_eq!(stored.assigned_date, Some(ChecklistDate::today()));
        assert!(stored.due_date.is_none());
    }

    #[test]
    fn create_rejects_blank_title() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path());
        let store = FileStore::new(dir.path());
        let created = create_checklist(&store, &s, "   ", Some("c1"), None, None);
        assert!(created.is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn fill_submits_and_then_refuses() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path());
        let store = FileStore::new(dir.path());
        create_checklist(&store, &s, "Daily Report", Some("c1"), None, None).unwrap();

        let date = ChecklistDate::parse("2025-03-01").unwrap();
        let submitted = fill_checklist(
            &store,
            &s,
            "c1",
            &assignments(&[("tasksWorked", "5"), ("clockOut", "No")]),
            &assignments(&[("tasksWorked", "done early")]),
            Some(date),
        )
        .unwrap();
        assert_eq!(submitted, date);

        let stored = store.fetch(&ChecklistId::new("c1").unwrap()).unwrap();
        assert_eq!(stored.last_submitted, Some(date));
        let reopened = FormState::open(&stored, &s.schema);
        assert_eq!(reopened.mode(), ViewMode::ReadOnly);
        assert_eq!(reopened.responses().value("tasksWorked"), Some("5"));
        assert_eq!(reopened.responses().value("clockOut"), Some("No"));
        assert_eq!(reopened.responses().comment("tasksWorked"), Some("done early"));

        let err = fill_checklist(&store, &s, "c1", &assignments(&[("tasksWorked", "6")]), &[], None)
            .unwrap_err();
        assert!(err.to_string().contains("read-only"));
    }

    #[test]
    fn fill_rejects_bad_input_without_submitting() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path());
        let store = FileStore::new(dir.path());
        create_checklist(&store, &s, "Daily Report", Some("c1"), None, None).unwrap();

        let bad_binary = assignments(&[("clockIn", "maybe")]);
        assert!(fill_checklist(&store, &s, "c1", &bad_binary, &[], None).is_err());
        let unknown = assignments(&[("overtime", "1")]);
        assert!(fill_checklist(&store, &s, "c1", &unknown, &[], None).is_err());

        let stored = store.fetch(&ChecklistId::new("c1").unwrap()).unwrap();
        assert!(stored.last_submitted.is_none());
    }

    #[test]
    fn fill_unknown_checklist_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(fill_checklist(&store, &settings(dir.path()), "ghost", &[], &[], None).is_err());
    }

    #[test]
    fn fill_refuses_file_holding_another_checklist() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path());
        let store = FileStore::new(dir.path());
        create_checklist(&store, &s, "Daily Report", Some("c1"), None, None).unwrap();
        create_checklist(&store, &s, "Daily Report", Some("c2"), None, None).unwrap();
        let c2 = std::fs::read_to_string(dir.path().join("c2.json")).unwrap();
        std::fs::write(dir.path().join("c1.json"), &c2).unwrap();

        let values = assignments(&[("tasksWorked", "99")]);
        assert!(fill_checklist(&store, &s, "c1", &values, &[], None).is_err());

        let other = store.fetch(&ChecklistId::new("c2").unwrap()).unwrap();
        assert!(other.last_submitted.is_none());
        let reopened = FormState::open(&other, &s.schema);
        assert_eq!(reopened.responses().value("tasksWorked"), Some(""));
    }

    #[test]
    fn sort_arg_maps_to_catalog_sort() {
        assert_eq!(CatalogSort::from(SortArg::Assigned), CatalogSort::Assigned);
        assert_eq!(CatalogSort::from(SortArg::Due), CatalogSort::DueDate);
    }

    #[test]
    fn run_list_and_show_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let s = settings(dir.path());
        let store = FileStore::new(dir.path());
        create_checklist(&store, &s, "Daily Report", Some("c1"), None, None).unwrap();

        let list = ChecklistCommand::List {
            search: "daily".to_string(),
            sort: SortArg::Due,
        };
        assert_eq!(run_checklist(&list, &s).unwrap(), 0);
        let show = ChecklistCommand::Show {
            id: "c1".to_string(),
            json: true,
        };
        assert_eq!(run_checklist(&show, &s).unwrap(), 0);
        assert_eq!(run_checklist(&ChecklistCommand::Schema, &s).unwrap(), 0);
    }
}
