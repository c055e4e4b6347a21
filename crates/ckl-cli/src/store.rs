//! # File Store
//!
//! Local stand-in for the external persistence layer: one pretty-printed
//! JSON file per checklist, named `<id>.json`, in a state directory.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use ckl_core::{ChecklistId, ChecklistInstance};
use ckl_state::{apply_submission, ChecklistStore, StoreError, SubmissionPayload};

/// A directory of checklist JSON files.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// A store rooted at `dir`. The directory is created on first `create`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the file for `id`, with path traversal protection.
    pub fn path_for(&self, id: &ChecklistId) -> Result<PathBuf, StoreError> {
        let raw = id.as_str();
        if raw.contains('/') || raw.contains('\\') {
            return Err(StoreError::Backend(format!(
                "checklist id contains path separators: {raw:?}"
            )));
        }
        if raw == "." || raw == ".." {
            return Err(StoreError::Backend(format!(
                "checklist id is a relative path component: {raw:?}"
            )));
        }
        let file = self.dir.join(format!("{raw}.json"));
        let canonical_dir = self.dir.canonicalize().unwrap_or_else(|_| self.dir.clone());
        let canonical_file = file.canonicalize().unwrap_or_else(|_| file.clone());
        if !canonical_file.starts_with(&canonical_dir) {
            return Err(StoreError::Backend(format!(
                "checklist id resolves outside the state directory: {raw:?}"
            )));
        }
        Ok(file)
    }

    fn read(&self, path: &Path) -> Result<ChecklistInstance, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| backend(format!("failed to read {}", path.display()), e))?;
        serde_json::from_str(&content)
            .map_err(|e| backend(format!("invalid checklist file {}", path.display()), e))
    }

    fn write(&self, path: &Path, instance: &ChecklistInstance) -> Result<(), StoreError> {
        std::fs::write(path, encode(instance)?)
            .map_err(|e| backend(format!("failed to write {}", path.display()), e))
    }
}

fn encode(instance: &ChecklistInstance) -> Result<String, StoreError> {
    serde_json::to_string_pretty(instance)
        .map_err(|e| backend("failed to encode checklist".to_string(), e))
}

fn backend(context: String, err: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(format!("{context}: {err}"))
}

impl ChecklistStore for FileStore {
    fn fetch(&self, id: &ChecklistId) -> Result<ChecklistInstance, StoreError> {
        let path = self.path_for(id)?;
        if !path.is_file() {
            return Err(StoreError::NotFound(id.clone()));
        }
        let instance = self.read(&path)?;
        if &instance.id != id {
            tracing::warn!(
                path = %path.display(),
                stored = %instance.id,
                "checklist file id does not match its file name"
            );
            return Err(StoreError::Backend(format!(
                "checklist file {} holds id {:?}, expected {:?}",
                path.display(),
                instance.id.as_str(),
                id.as_str()
            )));
        }
        Ok(instance)
    }

    fn submit(&self, payload: &SubmissionPayload) -> Result<(), StoreError> {
        let mut instance = self.fetch(&payload.checklist_id)?;
        apply_submission(&mut instance, payload);
        let path = self.path_for(&payload.checklist_id)?;
        self.write(&path, &instance)?;
        tracing::info!(
            checklist = %payload.checklist_id,
            date = %payload.date,
            path = %path.display(),
            "stored submission"
        );
        Ok(())
    }

    fn create(&self, instance: ChecklistInstance) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)
            .map_err(|e| backend(format!("failed to create {}", self.dir.display()), e))?;
        let path = self.path_for(&instance.id)?;
        let json = encode(&instance)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(instance.id));
            }
            Err(e) => return Err(backend(format!("failed to create {}", path.display()), e)),
        };
        file.write_all(json.as_bytes())
            .map_err(|e| backend(format!("failed to write {}", path.display()), e))
    }

    /// Unreadable or malformed files are skipped with a warning.
    fn list(&self) -> Result<Vec<ChecklistInstance>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| backend(format!("failed to read {}", self.dir.display()), e))?;

        let mut instances = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!(
                        dir = %self.dir.display(),
                        error = %e,
                        "failed to read directory entry while listing checklists"
                    );
                    continue;
                }
            };
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read(&path) {
                Ok(instance) => instances.push(instance),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping checklist file");
                }
            }
        }
        instances.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(instances)
    }
}
