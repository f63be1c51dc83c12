use serde::{Deserialize, Serialize};

super::record_id!(
    /// Server-assigned identifier of a [`Project`].
    ProjectId
);

/// A portfolio project.
///
/// `tech` is an ordered list of tags; `github` and `demo` are optional links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProjectId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo: Option<String>,
}

/// Staged project form.
///
/// `tech` is the raw comma-separated input; it is split on submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDraft {
    pub name: String,
    pub description: String,
    pub tech: String,
    pub github: String,
    pub demo: String,
}

/// Body of a project POST/PUT.
///
/// `github` and `demo` are always sent, empty when blank, so an update can clear them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub name: String,
    pub description: String,
    pub tech: Vec<String>,
    pub github: String,
    pub demo: String,
}
