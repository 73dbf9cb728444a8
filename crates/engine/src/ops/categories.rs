use tracing::info;
use uuid::Uuid;

use crate::{
    Actor, Capability, Category, EngineError, ResultEngine, store,
    util::{normalize_category_name, normalize_optional_text},
};

use super::{Engine, with_tx};

impl Engine {
    /// Categories usable in a workspace (defaults plus its own), or the
    /// defaults alone when no workspace is given.
    pub async fn categories(
        &self,
        workspace_id: Option<Uuid>,
        actor: Actor,
    ) -> ResultEngine<Vec<Category>> {
        actor.ensure_active()?;
        with_tx!(self, |db_tx| {
            match workspace_id {
                Some(workspace_id) => {
                    let workspace = self.require_workspace(&db_tx, workspace_id).await?;
                    self.authorize(&db_tx, &workspace, &actor, Capability::View)
                        .await?;
                    store::categories::list_by_workspace(&db_tx, workspace.id).await
                }
                None => store::categories::list_defaults(&db_tx).await,
            }
        })
    }

    /// Create a category private to one workspace.
    pub async fn new_category(
        &self,
        workspace_id: Uuid,
        name: &str,
        description: Option<&str>,
        actor: Actor,
    ) -> ResultEngine<Category> {
        actor.ensure_active()?;
        let name = normalize_category_name(name)?;
        let description = normalize_optional_text(description);

        let category = with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageBudgets)
                .await?;
            if store::categories::find_by_name(&db_tx, &name, Some(workspace.id))
                .await?
                .is_some()
            {
                return Err(EngineError::Conflict(format!(
                    "Category '{name}' already exists"
                )));
            }
            let category = Category::new_custom(workspace.id, name, description);
            store::categories::add(&db_tx, &category).await?;
            Ok(category)
        })?;

        info!(
            category_id = %category.id,
            %workspace_id,
            user_id = %actor.id,
            "category created"
        );
        Ok(category)
    }

    /// Create a category shared by every workspace. Operator-only: no actor
    /// is involved.
    pub async fn new_default_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> ResultEngine<Category> {
        let name = normalize_category_name(name)?;
        let description = normalize_optional_text(description);

        let category = with_tx!(self, |db_tx| {
            if store::categories::find_by_name(&db_tx, &name, None)
                .await?
                .is_some()
            {
                return Err(EngineError::Conflict(format!(
                    "Category '{name}' already exists"
                )));
            }
            let category = Category::new_default(name, description);
            store::categories::add(&db_tx, &category).await?;
            Ok(category)
        })?;

        info!(category_id = %category.id, "default category created");
        Ok(category)
    }

    pub async fn default_categories(&self) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| store::categories::list_defaults(&db_tx).await)
    }
}
