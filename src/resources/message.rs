//! # Messages
//!
//! Visitor messages are created by the public contact form. The admin client
//! lists them with the credential and can delete them; nothing else.

use crate::framework::{CollectionStore, DeleteController, Gateway, Resource, ResourceKind};
use crate::model::{Message, MessageId};
use std::sync::Arc;

impl Resource for Message {
    type Id = MessageId;

    const KIND: ResourceKind = ResourceKind::Message;
    const READ_REQUIRES_AUTH: bool = true;

    fn id(&self) -> Option<&MessageId> {
        self.id.as_ref()
    }

    fn delete_prompt() -> String {
        "Are you sure you want to delete this message?".to_string()
    }
}

/// Creates the message store and its delete-only controller.
pub fn new(gateway: Arc<dyn Gateway>) -> (CollectionStore<Message>, DeleteController<Message>) {
    let store = CollectionStore::new(gateway.clone());
    let controller = DeleteController::new(gateway, store.clone());
    (store, controller)
}
