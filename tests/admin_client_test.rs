use portfolio_admin::dispatch::DispatchOutcome;
use portfolio_admin::framework::mock::MockGateway;
use portfolio_admin::framework::{AdminError, FormMode, GatewayError, ResourceKind};
use portfolio_admin::lifecycle::AdminClient;
use portfolio_admin::model::{Credential, SkillId};
use portfolio_admin::render::{Action, Target};
use portfolio_admin::session::{CredentialStore, MemoryCredentialStore, Route, Session};
use serde_json::json;
use std::sync::Arc;

fn signed_in() -> (Session, Arc<MemoryCredentialStore>) {
    let store = Arc::new(MemoryCredentialStore::with_credential(Credential::new(
        "tok-123", "admin",
    )));
    (Session::bootstrap(store.clone()).unwrap(), store)
}

fn yes(_: &str) -> bool {
    true
}

/// Load everything, render it, then feed rendered actions back through the
/// dispatcher: snapshot to display and back into a controller.
#[tokio::test]
async fn load_render_and_act() {
    let mut mock = MockGateway::new();
    mock.expect_get("/skills").return_ok(json!([{ "_id": "s1", "skill": "Go" }]));
    mock.expect_get("/projects").return_ok(json!([]));
    mock.expect_get("/messages").return_ok(json!([{
        "_id": "m1", "name": "Ana", "email": "ana@gmail.com",
        "message": "Hi!", "createdAt": "2024-05-01T09:30:00Z"
    }]));

    let (session, _) = signed_in();
    let client = AdminClient::with_gateway(session, mock.gateway());
    assert!(client.load_all().await.is_empty());

    let [skills, projects, messages] = client.render();
    assert_eq!(skills.nodes[0].title, "Go");
    assert_eq!(projects.placeholder, Some("No projects added yet."));
    assert_eq!(messages.nodes[0].footer.as_deref(), Some("2024-05-01 09:30:00 UTC"));

    // edit the rendered skill
    let edit = skills.nodes[0].actions[0].clone();
    assert_eq!(edit, Action::Edit(Target::Skill("s1".into())));
    let outcome = client.dispatch(edit, &yes).await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Editing(ResourceKind::Skill));
    assert_eq!(client.skills.mode(), FormMode::Edit(SkillId::from("s1")));
    assert_eq!(client.skills.submit_label(), "Update");
    assert!(client.skills.show_cancel());

    // reply on a gmail message opens the compose link
    let reply = messages
        .actions()
        .find(|a| matches!(a, Action::Reply { .. }))
        .cloned()
        .unwrap();
    assert_eq!(
        client.dispatch(reply, &yes).await.unwrap(),
        DispatchOutcome::OpenExternal(
            "https://mail.google.com/mail/?view=cm&fs=1&to=ana%40gmail.com".into()
        )
    );
    mock.verify();
}

/// One failing collection does not stop the others from loading.
#[tokio::test]
async fn load_all_reports_each_failure() {
    let mut mock = MockGateway::new();
    mock.expect_get("/skills").return_ok(json!([{ "_id": "s1", "skill": "Go" }]));
    mock.expect_get("/projects").return_status(500, Some("db down"));
    mock.expect_get("/messages").return_ok(json!({ "oops": true }));

    let (session, _) = signed_in();
    let client = AdminClient::with_gateway(session, mock.gateway());

    let failures = client.load_all().await;
    assert_eq!(failures.len(), 2);
    assert!(failures.contains(&AdminError::FetchFailed {
        kind: ResourceKind::Project,
        source: GatewayError::HttpStatus { status: 500, message: Some("db down".into()) },
    }));
    let messages: Vec<_> = failures.iter().map(|f| f.user_message()).collect();
    assert!(messages.contains(&"Error loading messages".to_string()));

    assert_eq!(client.skills.store().snapshot().len(), 1);
    let [skills, projects, _] = client.render();
    assert!(!skills.is_empty());
    assert!(projects.is_empty());
    mock.verify();
}

#[tokio::test]
async fn logout_forgets_credential() {
    let mock = MockGateway::new();
    let (session, store) = signed_in();
    let client = AdminClient::with_gateway(session, mock.gateway());

    assert_eq!(client.logout(), Route::Login);
    assert!(!client.session.is_authenticated());
    assert_eq!(store.load().unwrap(), None);
    assert!(mock.requests().is_empty());
}
