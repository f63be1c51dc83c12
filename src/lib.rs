#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Portfolio Admin
//!
//! > **An admin client for a small content-managed site.**
//!
//! The operator signs in, then creates, edits and deletes skills and projects
//! and moderates visitor messages, all against a remote HTTP API. The client
//! keeps its local form and list state in step with the server.
//!
//! ## 🏗️ Design
//!
//! ### One generic engine, three resource kinds
//! `CrudController<T: Editable>` and `CollectionStore<T: Resource>` are written
//! once. Skills, projects and messages only say what is specific to them:
//! paths, wire records and validation rules.
//!
//! ### Server truth first
//! Nothing is changed locally before the server accepts it. After every
//! successful create, update or delete the collection is fetched again and the
//! cached snapshot is replaced wholesale.
//!
//! ### No ambient globals
//! The [`Session`](session::Session) and the stores are built once by
//! [`AdminClient`](lifecycle::AdminClient) and handed to whoever needs them.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each layer has its own `thiserror` enum: `GatewayError` for one HTTP round
//! trip, `ValidationError` for pre-flight rejections and `AdminError` for what
//! the operator is told. [`AdminError::user_message`](framework::AdminError::user_message)
//! turns any of them into one line of text.
//!
//! ### 2. Reentrancy
//! Controllers are shared behind `Arc`. Each one holds a busy flag, so a
//! second submit or delete started while one is outstanding fails with
//! `Busy` instead of racing the first.
//!
//! ### 3. Observability
//! `tracing` spans wrap every gateway call and controller operation. See the
//! [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Gateway, stores, controllers and the error taxonomy, independent of any kind.
//! - **Key items**: [`Gateway`](framework::Gateway), [`CollectionStore`](framework::CollectionStore),
//!   [`CrudController`](framework::CrudController).
//!
//! ### 2. The Kinds ([`model`], [`resources`])
//! - **Role**: Wire types and the per-kind rules (duplicate skills, GitHub links, read-only messages).
//!
//! ### 3. The Guard ([`session`])
//! - **Role**: Holds the bearer credential, persists it and builds authorized headers.
//!
//! ### 4. The Surface ([`render`], [`dispatch`])
//! - **Role**: Snapshot to display nodes, and display actions back to controller calls.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! - **Role**: Reads configuration, restores the session and wires everything together.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Log in once, then list everything
//! PORTFOLIO_ADMIN_USER=admin PORTFOLIO_ADMIN_PASSWORD=... RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod config;
pub mod dispatch;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod render;
pub mod resources;
pub mod session;
