use portfolio_admin::framework::mock::{create_mock_gateway, expect_call, MockGateway};
use portfolio_admin::framework::{
    AdminError, FormMode, GatewayError, Method, Removal, ResourceKind, ValidationError,
};
use portfolio_admin::model::{ProjectDraft, SkillDraft, SkillId};
use portfolio_admin::resources;
use serde_json::json;
use std::sync::Arc;

fn skill(name: &str) -> SkillDraft {
    SkillDraft { name: name.into() }
}

/// A create whose name matches a cached skill (ignoring case) is rejected
/// before any POST is sent.
#[tokio::test]
async fn duplicate_skill_is_rejected_without_post() {
    let mut mock = MockGateway::new();
    mock.expect_get("/skills").return_ok(json!([{ "_id": "1", "skill": "Go" }]));

    let (store, controller) = resources::skill::new(mock.gateway());
    store.refresh().await.unwrap();

    controller.stage(skill("go"));
    let err = controller.submit().await.unwrap_err();

    assert!(matches!(
        err,
        AdminError::ValidationFailed(ValidationError::Duplicate { kind: ResourceKind::Skill, .. })
    ));
    assert_eq!(err.user_message(), "This skill already exists!");
    assert_eq!(mock.count(Method::Post, "/skills"), 0);
    assert_eq!(controller.staged(), skill("go"));
    mock.verify();
}

/// A valid project create sends one POST with the split tech list, then
/// refreshes the collection exactly once and resets the form.
#[tokio::test]
async fn duplicate_check_sees_numeric_ids() {
    let mut mock = MockGateway::new();
    mock.expect_get("/skills").return_ok(json!([{ "id": 1, "skill": "Go" }]));

    let (store, controller) = resources::skill::new(mock.gateway());
    store.refresh().await.unwrap();

    controller.stage(skill("GO"));
    assert!(matches!(
        controller.submit().await,
        Err(AdminError::ValidationFailed(ValidationError::Duplicate { .. }))
    ));
    assert_eq!(mock.count(Method::Post, "/skills"), 0);
    mock.verify();
}

#[tokio::test]
async fn project_create_posts_and_refreshes_once() {
    let mut mock = MockGateway::new();
    mock.expect_post("/projects").return_ok(json!({ "_id": "p1" }));
    mock.expect_get("/projects").return_ok(json!([{
        "_id": "p1", "name": "App", "description": "An app", "tech": ["Go", "Rust", ""],
        "github": "github.com/me/app", "demo": ""
    }]));

    let (store, controller) = resources::project::new(mock.gateway());
    controller.stage(ProjectDraft {
        name: "App".into(),
        description: "An app".into(),
        tech: "Go, Rust , ".into(),
        github: "github.com/me/app".into(),
        demo: String::new(),
    });
    controller.submit().await.expect("submit should succeed");

    let requests = mock.requests();
    let post = &requests[0];
    assert!(post.auth_required);
    assert_eq!(
        post.body,
        Some(json!({
            "name": "App",
            "description": "An app",
            "tech": ["Go", "Rust", ""],
            "github": "github.com/me/app",
            "demo": ""
        }))
    );
    assert_eq!(mock.count(Method::Get, "/projects"), 1);
    assert_eq!(store.generation(), 1);
    assert_eq!(store.snapshot()[0].name, "App");

    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(controller.staged(), ProjectDraft::default());
    mock.verify();
}

#[tokio::test]
async fn project_with_bad_github_link_is_not_sent() {
    let mock = MockGateway::new();
    let (_, controller) = resources::project::new(mock.gateway());
    controller.stage(ProjectDraft {
        name: "App".into(),
        github: "https://gitlab.com/me/app".into(),
        ..ProjectDraft::default()
    });

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::ValidationFailed(ValidationError::InvalidGithubUrl(_))
    ));
    assert!(mock.requests().is_empty());
}

/// Edit mode issues a PUT to the target id; duplicate names are not checked.
#[tokio::test]
async fn edit_submits_put_to_target() {
    let mut mock = MockGateway::new();
    mock.expect_get("/skills")
        .return_ok(json!([{ "_id": "1", "skill": "Go" }, { "_id": "7", "skill": "Rust" }]));
    mock.expect_put("/skills/7").return_ok(json!({ "_id": "7", "skill": "go" }));
    mock.expect_get("/skills")
        .return_ok(json!([{ "_id": "1", "skill": "Go" }, { "_id": "7", "skill": "go" }]));

    let (store, controller) = resources::skill::new(mock.gateway());
    store.refresh().await.unwrap();

    controller.begin_edit(SkillId::from("7"), skill("Rust"));
    controller.stage(skill("go"));
    controller.submit().await.unwrap();

    let put = &mock.requests()[1];
    assert_eq!(put.method, Method::Put);
    assert_eq!(put.body, Some(json!({ "skill": "go" })));
    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(controller.submit_label(), "Add Skill");
    mock.verify();
}

/// HTTP and transport failures leave the mode and staged fields as they were.
#[tokio::test]
async fn failed_submit_preserves_form_for_retry() {
    let mut mock = MockGateway::new();
    mock.expect_put("/skills/7").return_status(400, Some("Skill name too long"));
    mock.expect_put("/skills/7")
        .return_err(GatewayError::Transport("request timed out".into()));
    mock.expect_put("/skills/7").return_ok(json!({}));
    mock.expect_get("/skills").return_ok(json!([]));

    let (_, controller) = resources::skill::new(mock.gateway());
    controller.begin_edit(SkillId::from("7"), skill("Rust"));

    let err = controller.submit().await.unwrap_err();
    assert_eq!(err.user_message(), "Error saving skill: Skill name too long");
    assert_eq!(controller.mode(), FormMode::Edit(SkillId::from("7")));
    assert_eq!(controller.staged(), skill("Rust"));

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(
        err,
        AdminError::SubmitFailed { source: GatewayError::Transport(_), .. }
    ));
    assert_eq!(err.user_message(), "Error saving skill: Failed to save skill");
    assert_eq!(controller.mode(), FormMode::Edit(SkillId::from("7")));
    assert_eq!(controller.staged(), skill("Rust"));

    // the retry goes through
    controller.submit().await.unwrap();
    assert_eq!(controller.mode(), FormMode::Create);
    mock.verify();
}

#[tokio::test]
async fn saved_but_refresh_failed_still_resets_form() {
    let mut mock = MockGateway::new();
    mock.expect_post("/skills").return_ok(json!({ "_id": "9", "skill": "Zig" }));
    mock.expect_get("/skills").return_status(503, None);

    let (_, controller) = resources::skill::new(mock.gateway());
    controller.stage(skill("Zig"));

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, AdminError::FetchFailed { kind: ResourceKind::Skill, .. }));
    assert_eq!(controller.mode(), FormMode::Create);
    assert_eq!(controller.staged(), SkillDraft::default());
    mock.verify();
}

/// Declining sends nothing; a confirmed delete that fails leaves the cache alone.
#[tokio::test]
async fn remove_needs_confirmation_and_is_not_optimistic() {
    let mut mock = MockGateway::new();
    mock.expect_get("/skills")
        .return_ok(json!([{ "_id": "7", "skill": "Rust" }]));
    mock.expect_delete("/skills/7").return_status(500, Some("db down"));

    let (store, controller) = resources::skill::new(mock.gateway());
    store.refresh().await.unwrap();
    let before = store.snapshot();

    let outcome = controller
        .remove(SkillId::from("7"), &|_: &str| false)
        .await
        .unwrap();
    assert_eq!(outcome, Removal::Declined);
    assert_eq!(mock.count(Method::Delete, "/skills/7"), 0);

    let err = controller
        .remove(SkillId::from("7"), &|_: &str| true)
        .await
        .unwrap_err();
    assert!(matches!(err, AdminError::DeleteFailed { kind: ResourceKind::Skill, .. }));
    assert_eq!(err.user_message(), "Error deleting skill");
    assert_eq!(store.snapshot(), before);
    assert_eq!(store.generation(), 1);
    mock.verify();
}

#[tokio::test]
async fn confirmed_remove_refreshes_once() {
    let mut mock = MockGateway::new();
    mock.expect_delete("/projects/p1").return_ok(serde_json::Value::Null);
    mock.expect_get("/projects").return_ok(json!([]));

    let (store, controller) = resources::project::new(mock.gateway());
    let prompts = std::sync::Mutex::new(Vec::new());
    let confirm = |prompt: &str| {
        prompts.lock().unwrap().push(prompt.to_string());
        true
    };

    let outcome = controller.remove("p1".into(), &confirm).await.unwrap();
    assert_eq!(outcome, Removal::Deleted);
    assert_eq!(mock.count(Method::Get, "/projects"), 1);
    assert_eq!(store.generation(), 1);
    assert_eq!(*prompts.lock().unwrap(), vec!["Delete this project?"]);
    mock.verify();
}

#[tokio::test]
async fn message_delete_uses_its_own_prompt() {
    let mut mock = MockGateway::new();
    mock.expect_delete("/messages/m1").return_ok(json!({ "message": "Message deleted" }));
    mock.expect_get("/messages").return_ok(json!([]));

    let (_, controller) = resources::message::new(mock.gateway());
    let outcome = controller
        .remove("m1".into(), &|prompt: &str| {
            prompt == "Are you sure you want to delete this message?"
        })
        .await
        .unwrap();
    assert_eq!(outcome, Removal::Deleted);
    assert!(mock.requests().iter().all(|r| r.auth_required));
    mock.verify();
}

/// While a submit is in flight, further submits and removes on the same
/// controller are rejected with `Busy`.
#[tokio::test]
async fn controller_rejects_reentry_while_busy() {
    let (gateway, mut receiver) = create_mock_gateway(8);
    let (_, controller) = resources::skill::new(Arc::new(gateway));
    let controller = Arc::new(controller);
    controller.stage(skill("Rust"));

    let first = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });

    let post = expect_call(&mut receiver, Method::Post, "/skills")
        .await
        .expect("Expected POST /skills");
    assert!(controller.is_busy());

    assert_eq!(controller.submit().await, Err(AdminError::Busy(ResourceKind::Skill)));
    assert_eq!(
        controller.remove(SkillId::from("1"), &|_: &str| true).await,
        Err(AdminError::Busy(ResourceKind::Skill))
    );

    post.respond_to.send(Ok(json!({ "_id": "1", "skill": "Rust" }))).unwrap();
    let refresh = expect_call(&mut receiver, Method::Get, "/skills")
        .await
        .expect("Expected GET /skills");
    refresh
        .respond_to
        .send(Ok(json!([{ "_id": "1", "skill": "Rust" }])))
        .unwrap();

    assert_eq!(first.await.unwrap(), Ok(()));
    assert!(!controller.is_busy());
    assert!(receiver.try_recv().is_err());
}

/// An edit started while a create is in flight survives the create's success.
#[tokio::test]
async fn edit_begun_during_submit_is_not_reset() {
    let (gateway, mut receiver) = create_mock_gateway(8);
    let (_, controller) = resources::skill::new(Arc::new(gateway));
    let controller = Arc::new(controller);
    controller.stage(skill("Rust"));

    let submit = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });

    let post = expect_call(&mut receiver, Method::Post, "/skills")
        .await
        .expect("Expected POST /skills");
    controller.begin_edit(SkillId::from("3"), skill("Go"));

    post.respond_to.send(Ok(json!({ "_id": "1", "skill": "Rust" }))).unwrap();
    let refresh = expect_call(&mut receiver, Method::Get, "/skills")
        .await
        .expect("Expected GET /skills");
    refresh.respond_to.send(Ok(json!([]))).unwrap();

    assert_eq!(submit.await.unwrap(), Ok(()));
    assert_eq!(controller.mode(), FormMode::Edit(SkillId::from("3")));
    assert_eq!(controller.staged(), skill("Go"));
}
