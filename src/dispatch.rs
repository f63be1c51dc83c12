//! # Action Dispatch
//!
//! Maps the [`Action`] descriptors emitted by the renderer onto controller
//! calls. This is the only place that knows which controller owns which kind.

use crate::framework::{
    AdminError, Confirm, CrudController, DeleteController, Editable, Removal, ResourceKind,
};
use crate::model::{Message, Project, Skill};
use crate::render::{Action, Target};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// What a dispatched action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The controller for this kind is now in edit mode.
    Editing(ResourceKind),
    Deleted(ResourceKind),
    /// The operator declined the confirmation; nothing was sent.
    Declined,
    /// The caller should open this link.
    OpenExternal(String),
    /// The action did not apply (unknown entity, or not editable).
    Ignored,
}

#[derive(Clone)]
pub struct Dispatcher {
    skills: Arc<CrudController<Skill>>,
    projects: Arc<CrudController<Project>>,
    messages: Arc<DeleteController<Message>>,
}

impl Dispatcher {
    pub fn new(
        skills: Arc<CrudController<Skill>>,
        projects: Arc<CrudController<Project>>,
        messages: Arc<DeleteController<Message>>,
    ) -> Self {
        Self {
            skills,
            projects,
            messages,
        }
    }

    #[instrument(skip(self, confirm))]
    pub async fn dispatch(
        &self,
        action: Action,
        confirm: &dyn Confirm,
    ) -> Result<DispatchOutcome, AdminError> {
        match action {
            Action::Edit(Target::Skill(id)) => {
                // Skills are edited from the cached snapshot, projects are re-fetched.
                match self.skills.store().find(&id) {
                    Some(skill) => {
                        self.skills.begin_edit(id, skill.to_draft());
                        Ok(DispatchOutcome::Editing(ResourceKind::Skill))
                    }
                    None => {
                        warn!(%id, "Skill not in snapshot, edit ignored");
                        Ok(DispatchOutcome::Ignored)
                    }
                }
            }
            Action::Edit(Target::Project(id)) => {
                self.projects.begin_edit_by_id(id).await?;
                Ok(DispatchOutcome::Editing(ResourceKind::Project))
            }
            Action::Edit(Target::Message(id)) => {
                debug!(%id, "Messages are read-only");
                Ok(DispatchOutcome::Ignored)
            }
            Action::Delete(target) => {
                let kind = target.kind();
                let removal = match target {
                    Target::Skill(id) => self.skills.remove(id, confirm).await?,
                    Target::Project(id) => self.projects.remove(id, confirm).await?,
                    Target::Message(id) => self.messages.remove(id, confirm).await?,
                };
                Ok(match removal {
                    Removal::Deleted => DispatchOutcome::Deleted(kind),
                    Removal::Declined => DispatchOutcome::Declined,
                })
            }
            Action::Reply { href } => Ok(DispatchOutcome::OpenExternal(href)),
        }
    }
}
