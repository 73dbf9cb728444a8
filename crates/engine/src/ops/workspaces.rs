use tracing::info;
use uuid::Uuid;

use crate::{
    Actor, Capability, EngineError, ResultEngine, Workspace, WorkspaceNewCmd, WorkspaceUpdateCmd,
    store,
    util::{monotonic_now, normalize_optional_text, normalize_workspace_name},
};

use super::{Engine, with_tx};

fn duplicate_name(name: &str) -> EngineError {
    EngineError::Conflict(format!(
        "Workspace with name '{name}' already exists for this owner"
    ))
}

impl Engine {
    /// Create a workspace owned by `actor`.
    ///
    /// Only the workspace row is written; the owner's membership is derived
    /// from it from then on.
    pub async fn new_workspace(&self, cmd: WorkspaceNewCmd, actor: Actor) -> ResultEngine<Workspace> {
        actor.ensure_active()?;
        let name = normalize_workspace_name(&cmd.name)?;
        let description = normalize_optional_text(cmd.description.as_deref());
        let category = normalize_optional_text(cmd.category.as_deref());

        let workspace = with_tx!(self, |db_tx| {
            if store::membership::find_workspace_by_owner_and_name(&db_tx, actor.id, &name)
                .await?
                .is_some()
            {
                return Err(duplicate_name(&name));
            }
            let workspace = Workspace::new(name, actor.id, description, category);
            store::membership::add_workspace(&db_tx, &workspace).await?;
            Ok(workspace)
        })?;

        info!(workspace_id = %workspace.id, user_id = %actor.id, "workspace created");
        Ok(workspace)
    }

    /// Read a workspace the actor belongs to.
    pub async fn workspace(&self, workspace_id: Uuid, actor: Actor) -> ResultEngine<Workspace> {
        actor.ensure_active()?;
        with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::View)
                .await?;
            Ok(workspace)
        })
    }

    /// Every workspace the actor owns or was invited to, ordered by name.
    pub async fn list_workspaces(&self, actor: Actor) -> ResultEngine<Vec<Workspace>> {
        actor.ensure_active()?;
        with_tx!(self, |db_tx| {
            store::membership::list_workspaces_for_user(&db_tx, actor.id).await
        })
    }

    /// Rename or describe a workspace (owners and admins).
    pub async fn update_workspace(
        &self,
        workspace_id: Uuid,
        cmd: WorkspaceUpdateCmd,
        actor: Actor,
    ) -> ResultEngine<Workspace> {
        actor.ensure_active()?;
        let name = cmd
            .name
            .as_deref()
            .map(normalize_workspace_name)
            .transpose()?;

        let workspace = with_tx!(self, |db_tx| {
            let mut workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::EditWorkspace)
                .await?;

            if let Some(name) = name
                && name != workspace.name
            {
                if store::membership::find_workspace_by_owner_and_name(
                    &db_tx,
                    workspace.owner_id,
                    &name,
                )
                .await?
                .is_some()
                {
                    return Err(duplicate_name(&name));
                }
                workspace.name = name;
            }
            if let Some(description) = cmd.description.as_deref() {
                workspace.description = normalize_optional_text(Some(description));
            }
            if let Some(category) = cmd.category.as_deref() {
                workspace.category = normalize_optional_text(Some(category));
            }
            workspace.updated_at = monotonic_now(workspace.updated_at);

            store::membership::update_workspace(&db_tx, &workspace).await?;
            Ok(workspace)
        })?;

        info!(workspace_id = %workspace.id, user_id = %actor.id, "workspace updated");
        Ok(workspace)
    }

    /// Delete a workspace (owner only).
    ///
    /// Refused with [`EngineError::Conflict`] while invited members or active
    /// budgets still reference it.
    pub async fn delete_workspace(&self, workspace_id: Uuid, actor: Actor) -> ResultEngine<()> {
        actor.ensure_active()?;
        with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::DeleteWorkspace)
                .await?;

            if store::membership::count_members(&db_tx, workspace.id).await? > 0 {
                return Err(EngineError::Conflict(
                    "workspace still has members".to_string(),
                ));
            }
            if store::budgets::count_active_by_workspace(&db_tx, workspace.id).await? > 0 {
                return Err(EngineError::Conflict(
                    "workspace still has budgets".to_string(),
                ));
            }
            store::membership::remove_workspace(&db_tx, workspace.id).await?;
            Ok(())
        })?;

        info!(%workspace_id, user_id = %actor.id, "workspace deleted");
        Ok(())
    }
}
