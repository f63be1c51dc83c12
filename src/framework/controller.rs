//! # CRUD Controller
//!
//! One controller per editable kind. It owns the form state machine:
//!
//! ```text
//!             begin_edit(id, fields)
//!   Create  ------------------------->  Edit(id)
//!     ^  <-------------------------------  |
//!     |     cancel() / submit() ok         |
//!     +-- begin_edit(other, fields) -------+
//! ```
//!
//! `submit` validates the staged draft, issues exactly one POST (create) or PUT
//! (edit), and on success resets the form and refreshes the collection store.
//! A form the operator changed while the request was in flight is not reset.
//! On any failure the mode and staged fields are left as they were so the
//! operator can retry.
//!
//! `remove` asks a [`Confirm`] gate first and only refreshes the store once the
//! server has accepted the DELETE; nothing is removed optimistically.
//!
//! A controller is shared behind `Arc` between event handlers, so it uses
//! interior mutability. While a `submit` or `remove` is outstanding, further
//! ones are rejected with [`AdminError::Busy`].

use crate::framework::error::AdminError;
use crate::framework::gateway::{ApiRequest, Gateway};
use crate::framework::resource::{Editable, FormMode, Resource, ResourceKind};
use crate::framework::store::CollectionStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info, instrument, warn};

/// Interactive yes/no gate shown before a destructive action.
pub trait Confirm: Send + Sync {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a `remove` call that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Deleted,
    /// The operator said no; no request was sent.
    Declined,
}

/// Per-controller reentrancy guard.
#[derive(Default)]
struct BusyFlag(AtomicBool);

struct BusyGuard<'a>(&'a AtomicBool);

impl BusyFlag {
    fn acquire(&self, kind: ResourceKind) -> Result<BusyGuard<'_>, AdminError> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| BusyGuard(&self.0))
            .map_err(|_| {
                warn!(%kind, "Rejected, another request is outstanding");
                AdminError::Busy(kind)
            })
    }

    fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct FormState<T: Editable> {
    mode: FormMode<T::Id>,
    staged: T::Draft,
}

impl<T: Editable> Default for FormState<T> {
    fn default() -> Self {
        Self {
            mode: FormMode::Create,
            staged: T::Draft::default(),
        }
    }
}

/// Create/edit/delete controller for one editable kind.
pub struct CrudController<T: Editable> {
    gateway: Arc<dyn Gateway>,
    store: CollectionStore<T>,
    form: Mutex<FormState<T>>,
    busy: BusyFlag,
}

impl<T: Editable> CrudController<T> {
    pub fn new(gateway: Arc<dyn Gateway>, store: CollectionStore<T>) -> Self {
        Self {
            gateway,
            store,
            form: Mutex::new(FormState::default()),
            busy: BusyFlag::default(),
        }
    }

    pub fn store(&self) -> &CollectionStore<T> {
        &self.store
    }

    pub fn mode(&self) -> FormMode<T::Id> {
        self.form().mode.clone()
    }

    pub fn staged(&self) -> T::Draft {
        self.form().staged.clone()
    }

    /// Replaces the staged fields without changing the mode.
    pub fn stage(&self, draft: T::Draft) {
        self.form().staged = draft;
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    pub fn submit_label(&self) -> &'static str {
        if self.form().mode.is_edit() {
            T::UPDATE_LABEL
        } else {
            T::CREATE_LABEL
        }
    }

    /// The cancel button is only offered while editing.
    pub fn show_cancel(&self) -> bool {
        self.form().mode.is_edit()
    }

    /// `Create | Edit(_) -> Edit(id)`, staging `fields`.
    pub fn begin_edit(&self, id: T::Id, fields: T::Draft) {
        debug!(kind = %T::KIND, %id, ?fields, "Begin edit");
        let mut form = self.form();
        form.mode = FormMode::Edit(id);
        form.staged = fields;
    }

    /// Fetches the entity from the server, then enters edit mode with its fields.
    ///
    /// On failure the form is left untouched.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn begin_edit_by_id(&self, id: T::Id) -> Result<(), AdminError> {
        let entity = self.store.fetch_one(&id).await?;
        self.begin_edit(id, entity.to_draft());
        Ok(())
    }

    /// `Edit(_) -> Create`, clearing the staged fields.
    pub fn cancel(&self) {
        debug!(kind = %T::KIND, "Cancel edit");
        *self.form() = FormState::default();
    }

    /// Validates and sends the staged draft.
    ///
    /// # Errors
    /// - [`AdminError::Busy`] if another submit/remove is outstanding.
    /// - [`AdminError::ValidationFailed`] before any request is made.
    /// - [`AdminError::SubmitFailed`] if the server or transport rejects the request.
    /// - [`AdminError::FetchFailed`] if the save went through but the follow-up refresh did not.
    #[instrument(skip(self), fields(kind = %T::KIND))]
    pub async fn submit(&self) -> Result<(), AdminError> {
        let _guard = self.busy.acquire(T::KIND)?;

        let (mode, draft) = {
            let form = self.form();
            (form.mode.clone(), form.staged.clone())
        };

        let snapshot = self.store.snapshot();
        if let Err(e) = T::validate(&draft, &mode, &snapshot) {
            warn!(error = %e, "Validation failed");
            return Err(e.into());
        }

        let record = T::to_record(&draft);
        let request = match &mode {
            FormMode::Create => ApiRequest::post(T::collection_path()),
            FormMode::Edit(id) => ApiRequest::put(T::item_path(id)),
        }
        .authenticated()
        .json(&record)
        .map_err(|source| AdminError::SubmitFailed {
            kind: T::KIND,
            source,
        })?;

        debug!(method = %request.method, path = %request.path, ?record, "Submitting");
        if let Err(source) = self.gateway.send(request).await {
            warn!(error = %source, "Submit failed, form kept for retry");
            return Err(AdminError::SubmitFailed {
                kind: T::KIND,
                source,
            });
        }

        match &mode {
            FormMode::Create => info!("Created"),
            FormMode::Edit(id) => info!(%id, "Updated"),
        }
        {
            let mut form = self.form();
            if form.mode == mode && form.staged == draft {
                *form = FormState::default();
            } else {
                debug!("Form changed while saving, kept as is");
            }
        }
        self.store.refresh().await.map(|_| ())
    }

    /// Deletes `id` after the operator confirms.
    #[instrument(skip(self, confirm), fields(kind = %T::KIND))]
    pub async fn remove(&self, id: T::Id, confirm: &dyn Confirm) -> Result<Removal, AdminError> {
        let _guard = self.busy.acquire(T::KIND)?;
        delete_confirmed(self.gateway.as_ref(), &self.store, id, confirm).await
    }

    fn form(&self) -> MutexGuard<'_, FormState<T>> {
        self.form.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reduced controller for read-only kinds that can only be deleted (messages).
pub struct DeleteController<T: Resource> {
    gateway: Arc<dyn Gateway>,
    store: CollectionStore<T>,
    busy: BusyFlag,
}

impl<T: Resource> DeleteController<T> {
    pub fn new(gateway: Arc<dyn Gateway>, store: CollectionStore<T>) -> Self {
        Self {
            gateway,
            store,
            busy: BusyFlag::default(),
        }
    }

    pub fn store(&self) -> &CollectionStore<T> {
        &self.store
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_set()
    }

    #[instrument(skip(self, confirm), fields(kind = %T::KIND))]
    pub async fn remove(&self, id: T::Id, confirm: &dyn Confirm) -> Result<Removal, AdminError> {
        let _guard = self.busy.acquire(T::KIND)?;
        delete_confirmed(self.gateway.as_ref(), &self.store, id, confirm).await
    }
}

async fn delete_confirmed<T: Resource>(
    gateway: &dyn Gateway,
    store: &CollectionStore<T>,
    id: T::Id,
    confirm: &dyn Confirm,
) -> Result<Removal, AdminError> {
    if !confirm.confirm(&T::delete_prompt()) {
        debug!(%id, "Delete declined");
        return Ok(Removal::Declined);
    }

    let request = ApiRequest::delete(T::item_path(&id)).authenticated();
    if let Err(source) = gateway.send(request).await {
        warn!(%id, error = %source, "Delete failed, collection left as is");
        return Err(AdminError::DeleteFailed {
            kind: T::KIND,
            source,
        });
    }

    info!(%id, "Deleted");
    store.refresh().await?;
    Ok(Removal::Deleted)
}
