use tracing::info;
use uuid::Uuid;

use crate::{
    Actor, Capability, EngineError, ResultEngine, WorkspaceMember, WorkspaceRole, store,
    util::normalize_email,
};

use super::{Engine, with_tx};

impl Engine {
    /// Invite the user registered under `email` with `role`.
    ///
    /// `Owner` is never assignable here, whoever asks. The email is checked
    /// only once the actor may manage members.
    pub async fn invite_member(
        &self,
        workspace_id: Uuid,
        email: &str,
        role: WorkspaceRole,
        actor: Actor,
    ) -> ResultEngine<WorkspaceMember> {
        actor.ensure_active()?;
        if !role.is_assignable() {
            return Err(EngineError::Validation(
                "Cannot assign OWNER role via invitation".to_string(),
            ));
        }

        let member = with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageMembers)
                .await?;
            let email = normalize_email(email)?;

            let invitee = store::users::get_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::NotFound("user".to_string()))?;
            if workspace.is_owner(invitee.id) {
                return Err(EngineError::Validation(
                    "User is the owner of the workspace".to_string(),
                ));
            }
            if store::membership::get_member(&db_tx, workspace.id, invitee.id)
                .await?
                .is_some()
            {
                return Err(EngineError::Validation(
                    "User is already a member of the workspace".to_string(),
                ));
            }

            let member = WorkspaceMember::new(workspace.id, invitee.id, role);
            store::membership::add_member(&db_tx, &workspace, &member).await?;
            Ok(member)
        })?;

        info!(
            %workspace_id,
            user_id = %member.user_id,
            role = member.role.as_str(),
            "member invited"
        );
        Ok(member)
    }

    /// Members of a workspace, the owner first.
    ///
    /// Then by role, most privileged first, then by join date.
    pub async fn list_members(
        &self,
        workspace_id: Uuid,
        actor: Actor,
    ) -> ResultEngine<Vec<WorkspaceMember>> {
        actor.ensure_active()?;
        with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::View)
                .await?;

            let mut persisted: Vec<WorkspaceMember> =
                store::membership::list_members(&db_tx, workspace.id)
                    .await?
                    .into_iter()
                    .filter(|member| !workspace.is_owner(member.user_id))
                    .collect();
            persisted.sort_by(|a, b| {
                b.role
                    .cmp(&a.role)
                    .then_with(|| a.joined_at.cmp(&b.joined_at))
            });

            let mut members = Vec::with_capacity(persisted.len() + 1);
            members.push(workspace.owner_membership());
            members.extend(persisted);
            Ok(members)
        })
    }

    /// Move an invited member to another non-owner role.
    pub async fn update_member_role(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        role: WorkspaceRole,
        actor: Actor,
    ) -> ResultEngine<WorkspaceMember> {
        actor.ensure_active()?;
        if !role.is_assignable() {
            return Err(EngineError::Validation(
                "Cannot assign OWNER role via update. Transfer ownership instead.".to_string(),
            ));
        }

        let member = with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageMembers)
                .await?;
            if workspace.is_owner(user_id) {
                return Err(EngineError::Validation(
                    "Cannot update the role of the workspace owner".to_string(),
                ));
            }

            let mut member = store::membership::get_member(&db_tx, workspace.id, user_id)
                .await?
                .ok_or_else(|| EngineError::MemberNotFound(user_id.to_string()))?;
            member.role = role;
            store::membership::update_member(&db_tx, &member).await?;
            Ok(member)
        })?;

        info!(
            %workspace_id,
            %user_id,
            role = member.role.as_str(),
            "member role updated"
        );
        Ok(member)
    }

    pub async fn remove_member(
        &self,
        workspace_id: Uuid,
        user_id: Uuid,
        actor: Actor,
    ) -> ResultEngine<()> {
        actor.ensure_active()?;
        with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageMembers)
                .await?;
            if workspace.is_owner(user_id) {
                return Err(EngineError::Validation(
                    "Cannot remove the workspace owner".to_string(),
                ));
            }
            if store::membership::get_member(&db_tx, workspace.id, user_id)
                .await?
                .is_none()
            {
                return Err(EngineError::MemberNotFound(user_id.to_string()));
            }
            store::membership::remove_member(&db_tx, workspace.id, user_id).await?;
            Ok(())
        })?;

        info!(%workspace_id, %user_id, "member removed");
        Ok(())
    }
}
