use serde::{Deserialize, Serialize};

super::record_id!(
    /// Server-assigned identifier of a [`Skill`].
    SkillId
);

/// A skill shown on the public site.
///
/// The API calls the name field `skill`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SkillId>,
    #[serde(rename = "skill")]
    pub name: String,
}

impl Skill {
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
        }
    }
}

/// Staged skill form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillDraft {
    pub name: String,
}

/// Body of a skill POST/PUT.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillRecord {
    pub skill: String,
}
