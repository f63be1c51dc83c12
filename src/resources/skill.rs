//! # Skills
//!
//! Skills are a flat list of names. Creating a skill whose name matches an
//! existing entry (ignoring case) is rejected before any request is sent.
//! Renames through edit mode are not checked.

use crate::framework::{
    CollectionStore, CrudController, Editable, FormMode, Gateway, Resource, ResourceKind,
    ValidationError,
};
use crate::model::{Skill, SkillDraft, SkillId, SkillRecord};
use std::sync::Arc;

impl Resource for Skill {
    type Id = SkillId;

    const KIND: ResourceKind = ResourceKind::Skill;

    fn id(&self) -> Option<&SkillId> {
        self.id.as_ref()
    }
}

impl Editable for Skill {
    type Draft = SkillDraft;
    type Record = SkillRecord;

    const CREATE_LABEL: &'static str = "Add Skill";
    const UPDATE_LABEL: &'static str = "Update";

    fn to_draft(&self) -> SkillDraft {
        SkillDraft {
            name: self.name.clone(),
        }
    }

    fn to_record(draft: &SkillDraft) -> SkillRecord {
        SkillRecord {
            skill: draft.name.trim().to_string(),
        }
    }

    fn validate(
        draft: &SkillDraft,
        mode: &FormMode<SkillId>,
        snapshot: &[Skill],
    ) -> Result<(), ValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyField("name"));
        }
        if matches!(mode, FormMode::Create) && is_duplicate(name, snapshot) {
            return Err(ValidationError::Duplicate {
                kind: ResourceKind::Skill,
                name: name.to_string(),
            });
        }
        Ok(())
    }
}

/// True if some entry in `snapshot` has the same name, compared case-insensitively.
pub fn is_duplicate(name: &str, snapshot: &[Skill]) -> bool {
    let folded = name.to_lowercase();
    snapshot.iter().any(|s| s.name.to_lowercase() == folded)
}

/// Creates the skill store and its controller over a shared gateway.
pub fn new(gateway: Arc<dyn Gateway>) -> (CollectionStore<Skill>, CrudController<Skill>) {
    let store = CollectionStore::new(gateway.clone());
    let controller = CrudController::new(gateway, store.clone());
    (store, controller)
}
