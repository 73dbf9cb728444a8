//! Money-spent aggregation.
//!
//! The engine does not own a transaction ledger. Whatever does implements
//! [`SpendAggregator`] and is handed to [`EngineBuilder::spend_aggregator`].
//! Calls are sequential: one per budget, never fanned out.
//!
//! [`EngineBuilder::spend_aggregator`]: crate::EngineBuilder::spend_aggregator

use std::fmt;

use uuid::Uuid;

use crate::{BudgetPeriod, MoneyCents, ResultEngine};

/// The tuple spending is aggregated over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SpendQuery {
    pub workspace_id: Uuid,
    pub category_id: Uuid,
    pub period: BudgetPeriod,
}

#[async_trait::async_trait]
pub trait SpendAggregator: Send + Sync + fmt::Debug {
    /// Sum of the expenses recorded for the query's workspace, category and
    /// month.
    async fn spent_amount(&self, query: SpendQuery) -> ResultEngine<MoneyCents>;
}

/// Stand-in used until a ledger exists: nothing has been spent.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSpend;

#[async_trait::async_trait]
impl SpendAggregator for NoSpend {
    async fn spent_amount(&self, _query: SpendQuery) -> ResultEngine<MoneyCents> {
        Ok(MoneyCents::ZERO)
    }
}
