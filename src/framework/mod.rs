//! Generic client framework for remote resource collections.
//!
//! This module provides the building blocks the admin client is assembled from.
//! Nothing in here knows about skills or projects; those live in
//! [`resources`](crate::resources).
//!
//! # Main Components
//!
//! - [`Resource`] / [`Editable`] - Traits an entity implements to be managed
//! - [`Gateway`] / [`HttpGateway`] - The HTTP boundary
//! - [`CollectionStore`] - Cached snapshot of one collection
//! - [`CrudController`] / [`DeleteController`] - Form state machine and mutations
//! - [`AdminError`] - Operator-facing error taxonomy
//!
//! # Testing
//!
//! See [`mock`] for a gateway double that needs no server.

pub mod controller;
pub mod error;
pub mod gateway;
pub mod mock;
pub mod resource;
pub mod store;

pub use controller::{Confirm, CrudController, DeleteController, Removal};
pub use error::{AdminError, GatewayError, ValidationError};
pub use gateway::{ApiRequest, AuthSource, Gateway, HttpGateway, Method};
pub use resource::{Editable, FormMode, Resource, ResourceKind};
pub use store::CollectionStore;
