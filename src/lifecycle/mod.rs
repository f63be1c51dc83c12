//! Startup wiring and observability for the admin client.

pub mod admin_client;
pub mod tracing;

pub use admin_client::AdminClient;
