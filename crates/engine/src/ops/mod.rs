use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{Budget, BudgetView, NoSpend, ResultEngine, SpendAggregator, SpendQuery};

mod access;
mod budgets;
mod categories;
mod memberships;
mod users;
mod workspaces;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
///
/// An early `?` return or a dropped future drops the transaction unfinished,
/// which rolls it back.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = sea_orm::TransactionTrait::begin(&$self.database).await?;
        let result: $crate::ResultEngine<_> = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Entry point of every workspace, membership, budget and category operation.
///
/// The engine holds no per-request state: each operation opens its own
/// transaction on the shared connection pool.
#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    spend: Arc<dyn SpendAggregator>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Attach what was spent against `budget` and its progress.
    async fn budget_view(&self, budget: Budget) -> ResultEngine<BudgetView> {
        let spent = self
            .spend
            .spent_amount(SpendQuery {
                workspace_id: budget.workspace_id,
                category_id: budget.category_id,
                period: budget.period,
            })
            .await?;
        Ok(BudgetView::new(budget, spent))
    }
}

/// The builder for `Engine`
#[derive(Debug)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    spend: Arc<dyn SpendAggregator>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self {
            database: DatabaseConnection::default(),
            spend: Arc::new(NoSpend),
        }
    }
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Source of the spent amounts shown next to budgets. Defaults to
    /// [`NoSpend`].
    pub fn spend_aggregator(mut self, spend: impl SpendAggregator + 'static) -> EngineBuilder {
        self.spend = Arc::new(spend);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            spend: self.spend,
        })
    }
}
