use crate::config::ClientConfig;
use crate::dispatch::{DispatchOutcome, Dispatcher};
use crate::framework::{
    AdminError, Confirm, CrudController, DeleteController, Gateway, GatewayError, HttpGateway,
};
use crate::model::{Message, Project, Skill};
use crate::render::{self, Action, RenderedList};
use crate::resources;
use crate::session::{CredentialStore, Route, Session, SessionError};
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// The admin client, wired once at startup.
///
/// `AdminClient` owns:
/// - **The session guard** shared with the HTTP gateway for bearer headers
/// - **One controller per kind**, each holding its collection store
/// - **The dispatcher** that routes rendered actions back to the controllers
///
/// # Example
///
/// ```ignore
/// let credentials = Arc::new(FileCredentialStore::new(path));
/// let client = AdminClient::start(&config, credentials)?;
///
/// for failure in client.load_all().await {
///     eprintln!("{}", failure.user_message());
/// }
/// for list in client.render() {
///     println!("{list}");
/// }
/// ```
pub struct AdminClient {
    pub session: Session,
    pub skills: Arc<CrudController<Skill>>,
    pub projects: Arc<CrudController<Project>>,
    pub messages: Arc<DeleteController<Message>>,
    dispatcher: Dispatcher,
}

impl AdminClient {
    /// Restores the stored session and connects to the configured API.
    ///
    /// # Errors
    /// [`SessionError::LoginRequired`] (as [`AdminError::Session`]) when no
    /// credential is stored; the caller should route to login.
    pub fn start(
        config: &ClientConfig,
        credentials: Arc<dyn CredentialStore>,
    ) -> Result<Self, AdminError> {
        let session = Session::bootstrap(credentials)?;
        Self::connect(config, session)
    }

    /// Connects an already signed-in session to the configured API.
    pub fn connect(config: &ClientConfig, session: Session) -> Result<Self, AdminError> {
        if !session.is_authenticated() {
            return Err(SessionError::LoginRequired.into());
        }
        let gateway = http_gateway(config, &session)?;
        Ok(Self::with_gateway(session, gateway))
    }

    /// Wires stores and controllers over any gateway.
    pub fn with_gateway(session: Session, gateway: Arc<dyn Gateway>) -> Self {
        let (_, skills) = resources::skill::new(gateway.clone());
        let (_, projects) = resources::project::new(gateway.clone());
        let (_, messages) = resources::message::new(gateway);

        let skills = Arc::new(skills);
        let projects = Arc::new(projects);
        let messages = Arc::new(messages);
        let dispatcher = Dispatcher::new(skills.clone(), projects.clone(), messages.clone());

        info!("Admin client ready");
        Self {
            session,
            skills,
            projects,
            messages,
            dispatcher,
        }
    }

    /// Refreshes all three collections concurrently.
    ///
    /// Each failure is logged and returned; the other collections still load.
    #[instrument(skip(self))]
    pub async fn load_all(&self) -> Vec<AdminError> {
        let (skills, projects, messages) = tokio::join!(
            self.skills.store().refresh(),
            self.projects.store().refresh(),
            self.messages.store().refresh(),
        );

        let failures: Vec<AdminError> = [skills.err(), projects.err(), messages.err()]
            .into_iter()
            .flatten()
            .collect();
        for failure in &failures {
            warn!(error = %failure, "Initial load incomplete");
        }
        failures
    }

    /// Renders the current snapshots: skills, projects, messages.
    pub fn render(&self) -> [RenderedList; 3] {
        [
            render::render_skills(&self.skills.store().snapshot()),
            render::render_projects(&self.projects.store().snapshot()),
            render::render_messages(&self.messages.store().snapshot()),
        ]
    }

    pub async fn dispatch(
        &self,
        action: Action,
        confirm: &dyn Confirm,
    ) -> Result<DispatchOutcome, AdminError> {
        self.dispatcher.dispatch(action, confirm).await
    }

    pub fn logout(&self) -> Route {
        self.session.logout()
    }
}

/// reqwest gateway for `config`, authorizing requests through `session`.
pub fn http_gateway(
    config: &ClientConfig,
    session: &Session,
) -> Result<Arc<dyn Gateway>, GatewayError> {
    let gateway = HttpGateway::new(
        config.api_url.as_str(),
        config.timeout(),
        Arc::new(session.clone()),
    )?;
    Ok(Arc::new(gateway))
}
