use tracing::info;
use uuid::Uuid;

use crate::{
    Actor, Budget, BudgetListQuery, BudgetNewCmd, BudgetPage, BudgetPeriod, BudgetView,
    Capability, EngineError, MAX_PAGE_SIZE, MoneyCents, ResultEngine,
    budgets::{validate_month, validate_year},
    store::{self, budgets::BudgetFilter},
};

use super::{Engine, with_tx};

fn duplicate_period(category_name: &str) -> String {
    format!("A budget for category '{category_name}' already exists for this period")
}

impl Engine {
    /// Create a budget for one category and calendar month. Owners and
    /// editors only; admins and viewers are refused.
    ///
    /// The category must be a default one or belong to the workspace, and
    /// at most one active budget may exist per category and period.
    pub async fn new_budget(&self, cmd: BudgetNewCmd, actor: Actor) -> ResultEngine<Budget> {
        actor.ensure_active()?;
        let period = BudgetPeriod::new(cmd.month, cmd.year)?;

        let budget = with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, cmd.workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageBudgets)
                .await?;

            let category = store::categories::get_by_id(&db_tx, cmd.category_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("category".to_string()))?;
            if !category.usable_in(workspace.id) {
                return Err(EngineError::Unauthorized(
                    "Category does not belong to this workspace".to_string(),
                ));
            }
            if store::budgets::get_by_period(&db_tx, workspace.id, category.id, period)
                .await?
                .is_some()
            {
                return Err(EngineError::Conflict(duplicate_period(&category.name)));
            }

            let budget = Budget::new(workspace.id, actor.id, category.id, cmd.limit, period)?;
            store::budgets::add(&db_tx, &budget, || duplicate_period(&category.name)).await?;
            Ok(budget)
        })?;

        info!(
            budget_id = %budget.id,
            workspace_id = %budget.workspace_id,
            user_id = %actor.id,
            "budget created"
        );
        Ok(budget)
    }

    /// Read one active budget with its spending.
    pub async fn budget(&self, budget_id: Uuid, actor: Actor) -> ResultEngine<BudgetView> {
        actor.ensure_active()?;
        let budget = with_tx!(self, |db_tx| {
            let budget = store::budgets::get_by_id(&db_tx, budget_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            let workspace = self.require_workspace(&db_tx, budget.workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::View)
                .await?;
            Ok(budget)
        })?;
        self.budget_view(budget).await
    }

    /// One page of the workspace's active budgets, newest period first.
    pub async fn list_budgets(
        &self,
        query: BudgetListQuery,
        actor: Actor,
    ) -> ResultEngine<BudgetPage> {
        actor.ensure_active()?;
        if query.page < 1 {
            return Err(EngineError::Validation(
                "Page must be greater than or equal to 1".to_string(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&query.size) {
            return Err(EngineError::Validation(format!(
                "Page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        let offset = query.offset()?;
        if let Some(month) = query.month {
            validate_month(month)?;
        }
        if let Some(year) = query.year {
            validate_year(year)?;
        }
        let filter = BudgetFilter {
            category_id: query.category_id,
            month: query.month,
            year: query.year,
        };

        let (budgets, total) = with_tx!(self, |db_tx| {
            let workspace = self.require_workspace(&db_tx, query.workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::View)
                .await?;
            store::budgets::list_by_workspace(
                &db_tx,
                workspace.id,
                filter,
                query.size,
                offset,
            )
            .await
        })?;

        let mut items = Vec::with_capacity(budgets.len());
        for budget in budgets {
            items.push(self.budget_view(budget).await?);
        }
        Ok(BudgetPage {
            items,
            total,
            page: query.page,
            size: query.size,
        })
    }

    /// Replace the limit of an active budget (owners and editors).
    pub async fn update_budget(
        &self,
        budget_id: Uuid,
        limit: MoneyCents,
        actor: Actor,
    ) -> ResultEngine<BudgetView> {
        actor.ensure_active()?;
        let budget = with_tx!(self, |db_tx| {
            let mut budget = store::budgets::get_by_id(&db_tx, budget_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            let workspace = self.require_workspace(&db_tx, budget.workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageBudgets)
                .await?;

            budget.update_limit(limit)?;
            store::budgets::update(&db_tx, &budget).await?;
            Ok(budget)
        })?;

        info!(
            budget_id = %budget.id,
            workspace_id = %budget.workspace_id,
            user_id = %actor.id,
            limit = %budget.limit,
            "budget updated"
        );
        self.budget_view(budget).await
    }

    /// Soft-delete a budget (owners and editors). The row stays in storage
    /// with its deletion time; it is gone from every read.
    pub async fn delete_budget(&self, budget_id: Uuid, actor: Actor) -> ResultEngine<()> {
        actor.ensure_active()?;
        let budget = with_tx!(self, |db_tx| {
            let mut budget = store::budgets::get_by_id(&db_tx, budget_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
            let workspace = self.require_workspace(&db_tx, budget.workspace_id).await?;
            self.authorize(&db_tx, &workspace, &actor, Capability::ManageBudgets)
                .await?;

            budget.soft_delete()?;
            store::budgets::soft_remove(&db_tx, &budget).await?;
            Ok(budget)
        })?;

        info!(
            budget_id = %budget.id,
            workspace_id = %budget.workspace_id,
            user_id = %actor.id,
            "budget deleted"
        );
        Ok(())
    }
}
