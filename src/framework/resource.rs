//! # Resource Traits
//!
//! The contract a remote collection entity implements so the generic
//! [`CollectionStore`](crate::framework::CollectionStore) and
//! [`CrudController`](crate::framework::CrudController) can manage it.
//!
//! - [`Resource`] is enough to list, fetch and delete an entity.
//! - [`Editable`] adds the form side: a staged draft, the record sent on
//!   create/update, and the pre-flight validation hook.
//!
//! Associated types keep the kinds apart at compile time: a `SkillDraft` can
//! never be submitted through a project controller.

use crate::framework::error::ValidationError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt::{self, Debug, Display};

/// Category of remote-managed entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Skill,
    Project,
    Message,
}

impl ResourceKind {
    /// Plural collection name, also the API sub-path segment.
    pub fn collection(&self) -> &'static str {
        match self {
            ResourceKind::Skill => "skills",
            ResourceKind::Project => "projects",
            ResourceKind::Message => "messages",
        }
    }

    pub fn path(&self) -> String {
        format!("/{}", self.collection())
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Skill => "skill",
            ResourceKind::Project => "project",
            ResourceKind::Message => "message",
        };
        f.write_str(name)
    }
}

/// Controller mode: whether `submit` creates a new entity or updates `Edit(id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode<Id> {
    Create,
    Edit(Id),
}

impl<Id> Default for FormMode<Id> {
    fn default() -> Self {
        FormMode::Create
    }
}

impl<Id> FormMode<Id> {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit(_))
    }
}

/// An entity living in a remote collection.
pub trait Resource: Clone + Debug + DeserializeOwned + Send + Sync + 'static {
    /// Server-assigned identifier.
    type Id: Clone + Eq + Debug + Display + Send + Sync + 'static;

    const KIND: ResourceKind;

    /// Whether listing (and fetching one) needs the bearer credential.
    /// Skills and projects are public; messages are not.
    const READ_REQUIRES_AUTH: bool = false;

    /// `None` for an entity the server has not created yet.
    fn id(&self) -> Option<&Self::Id>;

    fn collection_path() -> String {
        Self::KIND.path()
    }

    fn item_path(id: &Self::Id) -> String {
        format!("{}/{}", Self::KIND.path(), id)
    }

    /// Text of the yes/no gate shown before a delete.
    fn delete_prompt() -> String {
        format!("Delete this {}?", Self::KIND)
    }
}

/// An entity the operator can create and edit through a form.
pub trait Editable: Resource {
    /// The staged form fields, as the operator typed them.
    type Draft: Clone + Debug + Default + PartialEq + Send + Sync;

    /// The wire body sent on POST/PUT.
    type Record: Serialize + Debug + Send + Sync;

    /// Submit button text in create mode.
    const CREATE_LABEL: &'static str;

    /// Submit button text in edit mode.
    const UPDATE_LABEL: &'static str;

    /// Snapshot of this entity's fields for `begin_edit`.
    fn to_draft(&self) -> Self::Draft;

    fn to_record(draft: &Self::Draft) -> Self::Record;

    /// Pre-flight check run before any create or update request.
    ///
    /// `snapshot` is the current collection cache, used for uniqueness rules.
    fn validate(
        _draft: &Self::Draft,
        _mode: &FormMode<Self::Id>,
        _snapshot: &[Self],
    ) -> Result<(), ValidationError> {
        Ok(())
    }
}
