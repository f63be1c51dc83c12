//! # Portfolio Admin
//!
//! Demo entry point: restores (or creates) the session, loads every
//! collection and prints what the admin page would show.
//!
//! Credentials for a first login are read from `PORTFOLIO_ADMIN_USER` and
//! `PORTFOLIO_ADMIN_PASSWORD`.

use portfolio_admin::config::ClientConfig;
use portfolio_admin::framework::AdminError;
use portfolio_admin::lifecycle::admin_client::http_gateway;
use portfolio_admin::lifecycle::tracing::setup_tracing;
use portfolio_admin::lifecycle::AdminClient;
use portfolio_admin::session::{
    CredentialStore, FileCredentialStore, MemoryCredentialStore, Session, SessionError,
};
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = ClientConfig::load_or_default().map_err(|e| e.to_string())?;
    info!(api_url = %config.api_url, "Starting admin client");

    let credentials: Arc<dyn CredentialStore> = match config.credential_path() {
        Some(path) => Arc::new(FileCredentialStore::new(path)),
        None => Arc::new(MemoryCredentialStore::default()),
    };

    let client = match AdminClient::start(&config, credentials.clone()) {
        Ok(client) => client,
        Err(AdminError::Session(SessionError::LoginRequired)) => {
            let span = tracing::info_span!("login");
            login(&config, credentials).instrument(span).await?
        }
        Err(e) => return Err(e.user_message()),
    };

    for failure in client.load_all().await {
        error!(error = %failure, "{}", failure.user_message());
    }
    for list in client.render() {
        println!("{list}");
    }

    info!("Done");
    Ok(())
}

async fn login(
    config: &ClientConfig,
    credentials: Arc<dyn CredentialStore>,
) -> Result<AdminClient, String> {
    let (Ok(username), Ok(password)) = (
        std::env::var("PORTFOLIO_ADMIN_USER"),
        std::env::var("PORTFOLIO_ADMIN_PASSWORD"),
    ) else {
        return Err("Login required: set PORTFOLIO_ADMIN_USER and PORTFOLIO_ADMIN_PASSWORD".into());
    };

    let session = Session::anonymous(credentials);
    let gateway = http_gateway(config, &session).map_err(|e| e.to_string())?;
    session
        .login(gateway.as_ref(), &username, &password)
        .await
        .map_err(|e| e.user_message())?;

    AdminClient::connect(config, session).map_err(|e| e.user_message())
}
