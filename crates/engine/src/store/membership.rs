//! Workspace membership store.
//!
//! Contract: the owner of a workspace is **never** written to
//! `workspace_members`. Every function here deals with persisted rows only;
//! merging in the synthetic owner membership is the caller's job (see
//! [`Workspace::resolve_membership`]). Writing an owner row through
//! [`add_member`] is rejected.
//!
//! [`Workspace::resolve_membership`]: crate::Workspace::resolve_membership

use sea_orm::{Condition, ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, prelude::*};

use crate::{
    EngineError, ResultEngine, Workspace, WorkspaceMember, workspace_members, workspaces,
};

pub(crate) async fn get_workspace<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
) -> ResultEngine<Option<Workspace>> {
    let model = workspaces::Entity::find_by_id(workspace_id).one(db).await?;
    Ok(model.map(Workspace::from))
}

pub(crate) async fn find_workspace_by_owner_and_name<C: ConnectionTrait>(
    db: &C,
    owner_id: Uuid,
    name: &str,
) -> ResultEngine<Option<Workspace>> {
    let model = workspaces::Entity::find()
        .filter(workspaces::Column::OwnerId.eq(owner_id))
        .filter(workspaces::Column::Name.eq(name))
        .one(db)
        .await?;
    Ok(model.map(Workspace::from))
}

/// Workspaces `user_id` owns or was invited to, ordered by name.
pub(crate) async fn list_workspaces_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultEngine<Vec<Workspace>> {
    let joined: Vec<Uuid> = workspace_members::Entity::find()
        .filter(workspace_members::Column::UserId.eq(user_id))
        .all(db)
        .await?
        .into_iter()
        .map(|m| m.workspace_id)
        .collect();

    let models = workspaces::Entity::find()
        .filter(
            Condition::any()
                .add(workspaces::Column::OwnerId.eq(user_id))
                .add(workspaces::Column::Id.is_in(joined)),
        )
        .order_by_asc(workspaces::Column::Name)
        .order_by_asc(workspaces::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(models.into_iter().map(Workspace::from).collect())
}

pub(crate) async fn add_workspace<C: ConnectionTrait>(
    db: &C,
    workspace: &Workspace,
) -> ResultEngine<()> {
    workspaces::Entity::insert(workspaces::ActiveModel::from(workspace))
        .exec(db)
        .await
        .map_err(|err| {
            EngineError::from_write(err, "user", || {
                format!(
                    "Workspace with name '{}' already exists for this owner",
                    workspace.name
                )
            })
        })?;
    Ok(())
}

pub(crate) async fn update_workspace<C: ConnectionTrait>(
    db: &C,
    workspace: &Workspace,
) -> ResultEngine<()> {
    workspaces::ActiveModel::from(workspace)
        .update(db)
        .await
        .map_err(|err| {
            EngineError::from_write(err, "user", || {
                format!(
                    "Workspace with name '{}' already exists for this owner",
                    workspace.name
                )
            })
        })?;
    Ok(())
}

/// Physically delete a workspace. Referential-integrity failures surface as
/// [`EngineError::Conflict`].
pub(crate) async fn remove_workspace<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
) -> ResultEngine<()> {
    workspaces::Entity::delete_by_id(workspace_id)
        .exec(db)
        .await
        .map_err(|err| {
            EngineError::from_delete(err, || "workspace is still referenced".to_string())
        })?;
    Ok(())
}

pub(crate) async fn get_member<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
    user_id: Uuid,
) -> ResultEngine<Option<WorkspaceMember>> {
    workspace_members::Entity::find()
        .filter(workspace_members::Column::WorkspaceId.eq(workspace_id))
        .filter(workspace_members::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .map(WorkspaceMember::try_from)
        .transpose()
}

pub(crate) async fn list_members<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
) -> ResultEngine<Vec<WorkspaceMember>> {
    workspace_members::Entity::find()
        .filter(workspace_members::Column::WorkspaceId.eq(workspace_id))
        .order_by_asc(workspace_members::Column::JoinedAt)
        .all(db)
        .await?
        .into_iter()
        .map(WorkspaceMember::try_from)
        .collect()
}

pub(crate) async fn count_members<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
) -> ResultEngine<u64> {
    Ok(workspace_members::Entity::find()
        .filter(workspace_members::Column::WorkspaceId.eq(workspace_id))
        .count(db)
        .await?)
}

pub(crate) async fn add_member<C: ConnectionTrait>(
    db: &C,
    workspace: &Workspace,
    member: &WorkspaceMember,
) -> ResultEngine<()> {
    if workspace.is_owner(member.user_id) {
        return Err(EngineError::Validation(
            "the owner membership is never persisted".to_string(),
        ));
    }
    workspace_members::Entity::insert(workspace_members::ActiveModel::try_from(member)?)
        .exec(db)
        .await
        .map_err(|err| {
            EngineError::from_write(err, "user", || {
                "User is already a member of the workspace".to_string()
            })
        })?;
    Ok(())
}

pub(crate) async fn update_member<C: ConnectionTrait>(
    db: &C,
    member: &WorkspaceMember,
) -> ResultEngine<()> {
    workspace_members::ActiveModel::try_from(member)?
        .update(db)
        .await?;
    Ok(())
}

pub(crate) async fn remove_member<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
    user_id: Uuid,
) -> ResultEngine<()> {
    workspace_members::Entity::delete_many()
        .filter(workspace_members::Column::WorkspaceId.eq(workspace_id))
        .filter(workspace_members::Column::UserId.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}
