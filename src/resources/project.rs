//! # Projects
//!
//! Projects carry a free-text description, an ordered list of tech tags and
//! two optional links. The form takes the tags as one comma-separated string.
//!
//! A non-empty `github` link must have the shape
//! `[http(s)://][www.]github.com/<owner>/<repo>[/...]` (case-insensitive);
//! anything after the repo segment is accepted as is.

use crate::framework::{
    CollectionStore, CrudController, Editable, FormMode, Gateway, Resource, ResourceKind,
    ValidationError,
};
use crate::model::{Project, ProjectDraft, ProjectId, ProjectRecord};
use regex::Regex;
use std::sync::{Arc, LazyLock};

static GITHUB_REPO_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(https?://)?(www\.)?github\.com/[A-Za-z0-9_-]+/[A-Za-z0-9_.-]+/?.*$").unwrap()
});

impl Resource for Project {
    type Id = ProjectId;

    const KIND: ResourceKind = ResourceKind::Project;

    fn id(&self) -> Option<&ProjectId> {
        self.id.as_ref()
    }
}

impl Editable for Project {
    type Draft = ProjectDraft;
    type Record = ProjectRecord;

    const CREATE_LABEL: &'static str = "Add Project";
    const UPDATE_LABEL: &'static str = "Update Project";

    fn to_draft(&self) -> ProjectDraft {
        ProjectDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            tech: self.tech.join(", "),
            github: self.github.clone().unwrap_or_default(),
            demo: self.demo.clone().unwrap_or_default(),
        }
    }

    fn to_record(draft: &ProjectDraft) -> ProjectRecord {
        ProjectRecord {
            name: draft.name.clone(),
            description: draft.description.clone(),
            tech: parse_tech(&draft.tech),
            github: draft.github.trim().to_string(),
            demo: draft.demo.clone(),
        }
    }

    fn validate(
        draft: &ProjectDraft,
        _mode: &FormMode<ProjectId>,
        _snapshot: &[Project],
    ) -> Result<(), ValidationError> {
        if draft.name.trim().is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        let github = draft.github.trim();
        if !is_valid_github_url(github) {
            return Err(ValidationError::InvalidGithubUrl(github.to_string()));
        }
        Ok(())
    }
}

/// Accepts an empty string (the link is optional) or a GitHub owner/repo URL.
pub fn is_valid_github_url(url: &str) -> bool {
    url.is_empty() || GITHUB_REPO_PATTERN.is_match(url)
}

/// Splits the comma-separated tech input, trimming each element.
///
/// Empty elements are kept, so `"Go, Rust , "` gives `["Go", "Rust", ""]`.
pub fn parse_tech(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_string()).collect()
}

/// Creates the project store and its controller over a shared gateway.
pub fn new(gateway: Arc<dyn Gateway>) -> (CollectionStore<Project>, CrudController<Project>) {
    let store = CollectionStore::new(gateway.clone());
    let controller = CrudController::new(gateway, store.clone());
    (store, controller)
}
