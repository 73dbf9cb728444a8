//! Authorization engine.
//!
//! Every workspace-scoped operation resolves the actor's membership (the
//! owner's being synthesized from the workspace row) and checks the role's
//! capability table once, before touching anything else.

use sea_orm::DatabaseTransaction;
use tracing::debug;
use uuid::Uuid;

use crate::{
    Actor, Capability, EngineError, ResultEngine, Workspace, WorkspaceMember, store,
};

use super::{Engine, with_tx};

fn denial(capability: Capability) -> String {
    match capability {
        Capability::View => "You do not have access to this workspace",
        Capability::EditWorkspace => "Insufficient permissions to update workspace",
        Capability::ManageMembers => "Insufficient permissions to manage members",
        Capability::ManageBudgets => "Only editors or owners can manage budgets",
        Capability::DeleteWorkspace => "Only the workspace owner can delete the workspace",
    }
    .to_string()
}

impl Engine {
    pub(super) async fn require_workspace(
        &self,
        db: &DatabaseTransaction,
        workspace_id: Uuid,
    ) -> ResultEngine<Workspace> {
        store::membership::get_workspace(db, workspace_id)
            .await?
            .ok_or_else(|| EngineError::WorkspaceNotFound(workspace_id.to_string()))
    }

    pub(super) async fn membership_of(
        &self,
        db: &DatabaseTransaction,
        workspace: &Workspace,
        user_id: Uuid,
    ) -> ResultEngine<Option<WorkspaceMember>> {
        if workspace.is_owner(user_id) {
            return Ok(Some(workspace.owner_membership()));
        }
        let persisted = store::membership::get_member(db, workspace.id, user_id).await?;
        Ok(workspace.resolve_membership(user_id, persisted))
    }

    /// Allow `actor` to exercise `capability` in `workspace`, returning the
    /// membership that granted it.
    pub(super) async fn authorize(
        &self,
        db: &DatabaseTransaction,
        workspace: &Workspace,
        actor: &Actor,
        capability: Capability,
    ) -> ResultEngine<WorkspaceMember> {
        let Some(member) = self.membership_of(db, workspace, actor.id).await? else {
            debug!(
                workspace_id = %workspace.id,
                user_id = %actor.id,
                capability = capability.as_str(),
                "denied: not a member"
            );
            return Err(EngineError::Unauthorized(denial(Capability::View)));
        };
        if !member.role.can(capability) {
            debug!(
                workspace_id = %workspace.id,
                user_id = %actor.id,
                role = member.role.as_str(),
                capability = capability.as_str(),
                "denied: role lacks capability"
            );
            return Err(EngineError::Unauthorized(denial(capability)));
        }
        Ok(member)
    }

    /// The membership `user_id` holds in the workspace, if any.
    ///
    /// The owner always gets the synthetic `Owner` membership; no row is
    /// needed for it.
    pub async fn resolve_membership(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
    ) -> ResultEngine<Option<WorkspaceMember>> {
        with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.membership_of(&db_tx, &workspace, user_id).await
        })
    }
}
