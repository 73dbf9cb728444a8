//! Budget store.
//!
//! Every read excludes soft-deleted rows. "Removing" a budget writes its
//! tombstone; rows are never physically deleted here.

use sea_orm::{
    ConnectionTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, prelude::*,
};

use crate::{Budget, BudgetPeriod, EngineError, ResultEngine, budgets};

/// Filters applied to a workspace listing.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BudgetFilter {
    pub(crate) category_id: Option<Uuid>,
    pub(crate) month: Option<u32>,
    pub(crate) year: Option<i32>,
}

fn active() -> Select<budgets::Entity> {
    budgets::Entity::find().filter(budgets::Column::DeletedAt.is_null())
}

pub(crate) async fn add<C: ConnectionTrait>(
    db: &C,
    budget: &Budget,
    conflict: impl FnOnce() -> String,
) -> ResultEngine<()> {
    budgets::Entity::insert(budgets::ActiveModel::from(budget))
        .exec(db)
        .await
        .map_err(|err| EngineError::from_write(err, "category", conflict))?;
    Ok(())
}

pub(crate) async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    budget_id: Uuid,
) -> ResultEngine<Option<Budget>> {
    active()
        .filter(budgets::Column::Id.eq(budget_id))
        .one(db)
        .await?
        .map(Budget::try_from)
        .transpose()
}

pub(crate) async fn get_by_period<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
    category_id: Uuid,
    period: BudgetPeriod,
) -> ResultEngine<Option<Budget>> {
    active()
        .filter(budgets::Column::WorkspaceId.eq(workspace_id))
        .filter(budgets::Column::CategoryId.eq(category_id))
        .filter(budgets::Column::Month.eq(period.month() as i32))
        .filter(budgets::Column::Year.eq(period.year()))
        .one(db)
        .await?
        .map(Budget::try_from)
        .transpose()
}

/// One page of the workspace's budgets plus the total number of matches.
pub(crate) async fn list_by_workspace<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
    filter: BudgetFilter,
    limit: u64,
    offset: u64,
) -> ResultEngine<(Vec<Budget>, u64)> {
    let mut query = active().filter(budgets::Column::WorkspaceId.eq(workspace_id));
    if let Some(category_id) = filter.category_id {
        query = query.filter(budgets::Column::CategoryId.eq(category_id));
    }
    if let Some(month) = filter.month {
        query = query.filter(budgets::Column::Month.eq(month as i32));
    }
    if let Some(year) = filter.year {
        query = query.filter(budgets::Column::Year.eq(year));
    }

    let total = query.clone().count(db).await?;
    let items = query
        .order_by_desc(budgets::Column::Year)
        .order_by_desc(budgets::Column::Month)
        .order_by_asc(budgets::Column::CreatedAt)
        .limit(limit)
        .offset(offset)
        .all(db)
        .await?
        .into_iter()
        .map(Budget::try_from)
        .collect::<ResultEngine<Vec<_>>>()?;

    Ok((items, total))
}

pub(crate) async fn count_active_by_workspace<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
) -> ResultEngine<u64> {
    Ok(active()
        .filter(budgets::Column::WorkspaceId.eq(workspace_id))
        .count(db)
        .await?)
}

pub(crate) async fn update<C: ConnectionTrait>(db: &C, budget: &Budget) -> ResultEngine<()> {
    budgets::ActiveModel::from(budget).update(db).await?;
    Ok(())
}

/// Persist the tombstone of a budget already moved to the deleted state.
pub(crate) async fn soft_remove<C: ConnectionTrait>(db: &C, budget: &Budget) -> ResultEngine<()> {
    if !budget.is_deleted() {
        return Err(EngineError::Validation(
            "budget must be deleted before its tombstone is written".to_string(),
        ));
    }
    budgets::ActiveModel::from(budget).update(db).await?;
    Ok(())
}
