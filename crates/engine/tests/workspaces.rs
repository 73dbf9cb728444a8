mod common;

use engine::{Actor, EngineError, WorkspaceNewCmd, WorkspaceRole, WorkspaceUpdateCmd};
use uuid::Uuid;

use common::{actor, count_rows, member, setup, uuid_value, workspace};

#[tokio::test]
async fn owner_membership_is_never_stored() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;

    let membership = ctx
        .engine
        .resolve_membership(ws.id, owner.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(membership.role, WorkspaceRole::Owner);
    assert_eq!(membership.id, None);
    assert_eq!(membership.joined_at, ws.created_at);

    let rows = count_rows(
        &ctx.db,
        "SELECT COUNT(*) AS n FROM workspace_members WHERE workspace_id = ?",
        vec![uuid_value(ws.id)],
    )
    .await;
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn resolve_membership_of_stranger_is_none() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;

    let none = ctx
        .engine
        .resolve_membership(ws.id, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(none, None);

    let err = ctx
        .engine
        .resolve_membership(Uuid::new_v4(), owner.id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::WorkspaceNotFound(_)));
}

#[tokio::test]
async fn viewer_cannot_update_workspace() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let viewer = member(&ctx.engine, &ws, owner, "x@example.com", WorkspaceRole::Viewer).await;

    let err = ctx
        .engine
        .update_workspace(ws.id, WorkspaceUpdateCmd::default().name("Renamed"), viewer)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("Insufficient permissions to update workspace".to_string())
    );

    // Reading is still allowed.
    let read = ctx.engine.workspace(ws.id, viewer).await.unwrap();
    assert_eq!(read.name, "Finance");
}

#[tokio::test]
async fn admin_cannot_invite_the_owner() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;

    let err = ctx
        .engine
        .invite_member(ws.id, "owner@example.com", WorkspaceRole::Editor, admin)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("User is the owner of the workspace".to_string())
    );
}

#[tokio::test]
async fn owner_role_is_never_assignable() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;
    let editor = member(&ctx.engine, &ws, owner, "editor@example.com", WorkspaceRole::Editor).await;
    let viewer = member(&ctx.engine, &ws, owner, "viewer@example.com", WorkspaceRole::Viewer).await;

    for caller in [owner, admin, editor, viewer] {
        let err = ctx
            .engine
            .update_member_role(ws.id, viewer.id, WorkspaceRole::Owner, caller)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            EngineError::Validation(
                "Cannot assign OWNER role via update. Transfer ownership instead.".to_string()
            )
        );
    }

    actor(&ctx.engine, "new@example.com").await;
    let err = ctx
        .engine
        .invite_member(ws.id, "new@example.com", WorkspaceRole::Owner, owner)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Cannot assign OWNER role via invitation".to_string())
    );
}

#[tokio::test]
async fn owner_membership_cannot_be_changed_or_removed() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;

    let err = ctx
        .engine
        .update_member_role(ws.id, owner.id, WorkspaceRole::Viewer, admin)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Cannot update the role of the workspace owner".to_string())
    );

    let err = ctx
        .engine
        .remove_member(ws.id, owner.id, admin)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("Cannot remove the workspace owner".to_string())
    );
}

#[tokio::test]
async fn member_roles_move_between_non_owner_roles() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;
    let x = member(&ctx.engine, &ws, owner, "x@example.com", WorkspaceRole::Viewer).await;

    let updated = ctx
        .engine
        .update_member_role(ws.id, x.id, WorkspaceRole::Editor, admin)
        .await
        .unwrap();
    assert_eq!(updated.role, WorkspaceRole::Editor);

    let resolved = ctx
        .engine
        .resolve_membership(ws.id, x.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(resolved.role, WorkspaceRole::Editor);

    // Editors do not manage members.
    let err = ctx
        .engine
        .update_member_role(ws.id, admin.id, WorkspaceRole::Viewer, x)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("Insufficient permissions to manage members".to_string())
    );

    let err = ctx
        .engine
        .update_member_role(ws.id, Uuid::new_v4(), WorkspaceRole::Viewer, owner)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MemberNotFound(_)));
}

#[tokio::test]
async fn invite_rejects_unknown_and_existing_members() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    member(&ctx.engine, &ws, owner, "x@example.com", WorkspaceRole::Viewer).await;

    let err = ctx
        .engine
        .invite_member(ws.id, "x@example.com", WorkspaceRole::Editor, owner)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Validation("User is already a member of the workspace".to_string())
    );

    let err = ctx
        .engine
        .invite_member(ws.id, "ghost@example.com", WorkspaceRole::Editor, owner)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("user".to_string()));

    let err = ctx
        .engine
        .invite_member(ws.id, "not-an-email", WorkspaceRole::Editor, owner)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::Validation("Invalid email format".to_string()));
}

#[tokio::test]
async fn list_members_puts_the_synthetic_owner_first() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let viewer = member(&ctx.engine, &ws, owner, "viewer@example.com", WorkspaceRole::Viewer).await;
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;

    let members = ctx.engine.list_members(ws.id, viewer).await.unwrap();
    let users: Vec<(Uuid, WorkspaceRole)> = members.iter().map(|m| (m.user_id, m.role)).collect();
    assert_eq!(
        users,
        vec![
            (owner.id, WorkspaceRole::Owner),
            (admin.id, WorkspaceRole::Admin),
            (viewer.id, WorkspaceRole::Viewer),
        ]
    );
    assert!(members[0].is_synthetic());
    assert!(members[1..].iter().all(|m| !m.is_synthetic()));
}

#[tokio::test]
async fn remove_member_revokes_access() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let x = member(&ctx.engine, &ws, owner, "x@example.com", WorkspaceRole::Editor).await;

    ctx.engine.remove_member(ws.id, x.id, owner).await.unwrap();

    let err = ctx.engine.workspace(ws.id, x).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("You do not have access to this workspace".to_string())
    );
    let err = ctx
        .engine
        .remove_member(ws.id, x.id, owner)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::MemberNotFound(_)));
}

#[tokio::test]
async fn workspace_names_are_unique_per_owner() {
    let ctx = setup().await;
    let alice = actor(&ctx.engine, "alice@example.com").await;
    let bob = actor(&ctx.engine, "bob@example.com").await;
    workspace(&ctx.engine, "Finance", alice).await;
    let home = workspace(&ctx.engine, "Home", alice).await;

    let err = ctx
        .engine
        .new_workspace(WorkspaceNewCmd::new("Finance"), alice)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("Workspace with name 'Finance' already exists for this owner".to_string())
    );

    // Another owner may reuse the name, and the check is case-sensitive.
    workspace(&ctx.engine, "Finance", bob).await;
    workspace(&ctx.engine, "finance", alice).await;

    let err = ctx
        .engine
        .update_workspace(home.id, WorkspaceUpdateCmd::default().name("Finance"), alice)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    // Keeping the current name is not a conflict.
    let same = ctx
        .engine
        .update_workspace(
            home.id,
            WorkspaceUpdateCmd::default()
                .name("Home")
                .description("House expenses"),
            alice,
        )
        .await
        .unwrap();
    assert_eq!(same.description.as_deref(), Some("House expenses"));
    assert!(same.updated_at >= home.updated_at);
}

#[tokio::test]
async fn admin_updates_and_clears_workspace_fields() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = ctx
        .engine
        .new_workspace(
            WorkspaceNewCmd::new("  Finance  ")
                .description("Shared")
                .category("Personal"),
            owner,
        )
        .await
        .unwrap();
    assert_eq!(ws.name, "Finance");
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;

    let updated = ctx
        .engine
        .update_workspace(
            ws.id,
            WorkspaceUpdateCmd::default().name("Family").description(""),
            admin,
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "Family");
    assert_eq!(updated.description, None);
    assert_eq!(updated.category.as_deref(), Some("Personal"));
    assert_eq!(updated.owner_id, owner.id);
}

#[tokio::test]
async fn workspace_name_length_is_validated() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;

    let err = ctx
        .engine
        .new_workspace(WorkspaceNewCmd::new("ab"), owner)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}

#[tokio::test]
async fn delete_is_owner_only_and_guarded_by_members() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;
    let admin = member(&ctx.engine, &ws, owner, "admin@example.com", WorkspaceRole::Admin).await;

    let err = ctx.engine.delete_workspace(ws.id, admin).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Unauthorized("Only the workspace owner can delete the workspace".to_string())
    );

    let err = ctx.engine.delete_workspace(ws.id, owner).await.unwrap_err();
    assert_eq!(
        err,
        EngineError::Conflict("workspace still has members".to_string())
    );

    ctx.engine.remove_member(ws.id, admin.id, owner).await.unwrap();
    ctx.engine.delete_workspace(ws.id, owner).await.unwrap();

    let err = ctx.engine.workspace(ws.id, owner).await.unwrap_err();
    assert!(matches!(err, EngineError::WorkspaceNotFound(_)));
}

#[tokio::test]
async fn list_workspaces_includes_invitations() {
    let ctx = setup().await;
    let alice = actor(&ctx.engine, "alice@example.com").await;
    let bob = actor(&ctx.engine, "bob@example.com").await;
    let shared = workspace(&ctx.engine, "Shared", alice).await;
    workspace(&ctx.engine, "Private", alice).await;
    workspace(&ctx.engine, "Bobs", bob).await;
    ctx.engine
        .invite_member(shared.id, "bob@example.com", WorkspaceRole::Viewer, alice)
        .await
        .unwrap();

    let names: Vec<String> = ctx
        .engine
        .list_workspaces(bob)
        .await
        .unwrap()
        .into_iter()
        .map(|w| w.name)
        .collect();
    assert_eq!(names, vec!["Bobs".to_string(), "Shared".to_string()]);
}

#[tokio::test]
async fn inactive_actor_is_rejected() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;

    let user = ctx.engine.set_user_active(owner.id, false).await.unwrap();
    let inactive = Actor::from(&user);
    assert!(!inactive.is_active);

    let err = ctx.engine.workspace(ws.id, inactive).await.unwrap_err();
    assert_eq!(err, EngineError::Unauthorized("user is inactive".to_string()));

    let user = ctx.engine.set_user_active(owner.id, true).await.unwrap();
    ctx.engine.workspace(ws.id, Actor::from(&user)).await.unwrap();
}

#[tokio::test]
async fn duplicate_users_conflict() {
    let ctx = setup().await;
    actor(&ctx.engine, "owner@example.com").await;

    let err = ctx.engine.new_user("owner@example.com").await.unwrap_err();
    assert!(matches!(err, EngineError::Conflict(_)));

    let found = ctx.engine.user_by_email(" owner@example.com ").await.unwrap();
    assert_eq!(found.email, "owner@example.com");
}

#[tokio::test]
async fn unknown_owner_cannot_create_a_workspace() {
    let ctx = setup().await;
    let stranger = Actor::new(Uuid::new_v4(), true);

    let err = ctx
        .engine
        .new_workspace(WorkspaceNewCmd::new("Finance"), stranger)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::NotFound("user".to_string()));

    let rows = count_rows(&ctx.db, "SELECT COUNT(*) AS n FROM workspaces", vec![]).await;
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn non_member_invite_is_unauthorized_before_email_checks() {
    let ctx = setup().await;
    let owner = actor(&ctx.engine, "owner@example.com").await;
    let outsider = actor(&ctx.engine, "outsider@example.com").await;
    let ws = workspace(&ctx.engine, "Finance", owner).await;

    let err = ctx
        .engine
        .invite_member(ws.id, "not-an-email", WorkspaceRole::Editor, outsider)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Unauthorized(_)), "{err:?}");

    let err = ctx
        .engine
        .invite_member(ws.id, "not-an-email", WorkspaceRole::Editor, owner)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)), "{err:?}");
}
