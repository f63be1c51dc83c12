//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter driven
//! by `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Gateway**: one span per request (`method`, `path`), with the status on rejection
//! - **Stores**: refresh results (`kind`, `size`) and failures that kept the old snapshot
//! - **Controllers**: submits, deletes, validation rejections and busy rejections
//! - **Session**: restore, login, logout and server-side credential rejection
//!
//! Request bodies are never recorded by the gateway, so neither the login
//! password nor the bearer token reaches the logs. Where a credential has to
//! be identified, only its last characters are logged.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs
//! RUST_LOG=info cargo run
//!
//! # Typed records and staged form fields
//! RUST_LOG=debug cargo run
//!
//! # Only the gateway
//! RUST_LOG=portfolio_admin::framework::gateway=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a create followed by its refresh reads:
//!
//! ```text
//! INFO submit: Created kind=skill
//! INFO submit:refresh: Refreshed kind=skill size=4
//! ```
//!
//! With `RUST_LOG=debug` the payload is logged once on the way out:
//!
//! ```text
//! DEBUG submit: Submitting kind=skill method=POST path=/skills record=SkillRecord { skill: "Rust" }
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // span names and `kind` fields say enough
        .compact()
        .init();
}
