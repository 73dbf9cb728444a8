//! Budget primitives.
//!
//! A `Budget` is a spending limit for one category of one workspace in one
//! calendar month. Budgets are soft-deleted: a removed budget keeps its row
//! with `deleted_at` set and is invisible to every read.
//!
//! State machine: `Active --update--> Active`, `Active --delete--> Deleted`.
//! `Deleted` is terminal.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, MoneyCents, ResultEngine, util::monotonic_now};

pub const MIN_YEAR: i32 = 2000;

/// A calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BudgetPeriod {
    year: i32,
    month: u32,
}

impl BudgetPeriod {
    pub fn new(month: u32, year: i32) -> ResultEngine<Self> {
        validate_month(month)?;
        validate_year(year)?;
        Ok(Self { year, month })
    }

    pub fn month(self) -> u32 {
        self.month
    }

    pub fn year(self) -> i32 {
        self.year
    }
}

pub(crate) fn validate_month(month: u32) -> ResultEngine<()> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::Validation(
            "Month must be between 1 and 12".to_string(),
        ));
    }
    Ok(())
}

pub(crate) fn validate_year(year: i32) -> ResultEngine<()> {
    if year < MIN_YEAR {
        return Err(EngineError::Validation("Invalid year".to_string()));
    }
    Ok(())
}

pub(crate) fn validate_limit(limit: MoneyCents) -> ResultEngine<()> {
    if !limit.is_positive() {
        return Err(EngineError::Validation(
            "Limit amount must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum BudgetState {
    Active,
    Deleted { at: DateTime<Utc> },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub limit: MoneyCents,
    pub period: BudgetPeriod,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub state: BudgetState,
}

impl Budget {
    pub fn new(
        workspace_id: Uuid,
        owner_id: Uuid,
        category_id: Uuid,
        limit: MoneyCents,
        period: BudgetPeriod,
    ) -> ResultEngine<Self> {
        validate_limit(limit)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            workspace_id,
            owner_id,
            category_id,
            limit,
            period,
            created_at: now,
            updated_at: now,
            state: BudgetState::Active,
        })
    }

    pub fn is_deleted(&self) -> bool {
        matches!(self.state, BudgetState::Deleted { .. })
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self.state {
            BudgetState::Active => None,
            BudgetState::Deleted { at } => Some(at),
        }
    }

    fn ensure_active(&self) -> ResultEngine<()> {
        if self.is_deleted() {
            return Err(EngineError::NotFound("budget".to_string()));
        }
        Ok(())
    }

    /// Replace the limit, revalidating it.
    pub fn update_limit(&mut self, limit: MoneyCents) -> ResultEngine<()> {
        self.ensure_active()?;
        validate_limit(limit)?;
        self.limit = limit;
        self.updated_at = monotonic_now(self.updated_at);
        Ok(())
    }

    /// Move to the terminal `Deleted` state.
    pub fn soft_delete(&mut self) -> ResultEngine<()> {
        self.ensure_active()?;
        let at = monotonic_now(self.updated_at);
        self.state = BudgetState::Deleted { at };
        self.updated_at = at;
        Ok(())
    }
}

/// A budget together with what was spent against it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetView {
    pub budget: Budget,
    pub spent: MoneyCents,
    pub progress_percentage: f64,
}

impl BudgetView {
    pub fn new(budget: Budget, spent: MoneyCents) -> Self {
        let progress_percentage = spent.percent_of(budget.limit);
        Self {
            budget,
            spent,
            progress_percentage,
        }
    }
}

/// One page of budgets. `total` counts every matching budget, not just the
/// ones on this page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetPage {
    pub items: Vec<BudgetView>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub owner_id: Uuid,
    pub category_id: Uuid,
    pub limit_minor: i64,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::workspaces::Entity",
        from = "Column::WorkspaceId",
        to = "super::workspaces::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Workspace,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::workspaces::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            workspace_id: ActiveValue::Set(value.workspace_id),
            owner_id: ActiveValue::Set(value.owner_id),
            category_id: ActiveValue::Set(value.category_id),
            limit_minor: ActiveValue::Set(value.limit.cents()),
            month: ActiveValue::Set(value.period.month() as i32),
            year: ActiveValue::Set(value.period.year()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
            deleted_at: ActiveValue::Set(value.deleted_at()),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        let month = u32::try_from(model.month)
            .map_err(|_| EngineError::Validation("Month must be between 1 and 12".to_string()))?;
        Ok(Self {
            id: model.id,
            workspace_id: model.workspace_id,
            owner_id: model.owner_id,
            category_id: model.category_id,
            limit: MoneyCents::new(model.limit_minor),
            period: BudgetPeriod::new(month, model.year)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            state: match model.deleted_at {
                Some(at) => BudgetState::Deleted { at },
                None => BudgetState::Active,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(limit: i64) -> ResultEngine<Budget> {
        Budget::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            MoneyCents::new(limit),
            BudgetPeriod::new(5, 2024)?,
        )
    }

    #[test]
    fn period_bounds() {
        assert!(BudgetPeriod::new(1, 2000).is_ok());
        assert!(BudgetPeriod::new(12, 2030).is_ok());
        assert_eq!(
            BudgetPeriod::new(0, 2024),
            Err(EngineError::Validation(
                "Month must be between 1 and 12".to_string()
            ))
        );
        assert!(BudgetPeriod::new(13, 2024).is_err());
        assert_eq!(
            BudgetPeriod::new(6, 1999),
            Err(EngineError::Validation("Invalid year".to_string()))
        );
    }

    #[test]
    fn limit_must_be_positive() {
        let expected = Err(EngineError::Validation(
            "Limit amount must be greater than zero".to_string(),
        ));
        assert_eq!(budget(0).map(|_| ()), expected);
        assert_eq!(budget(-100).map(|_| ()), expected);
    }

    #[test]
    fn update_limit_revalidates_and_touches_updated_at() {
        let mut budget = budget(1000).unwrap();
        let before = budget.updated_at;
        budget.update_limit(MoneyCents::new(1200)).unwrap();
        assert_eq!(budget.limit, MoneyCents::new(1200));
        assert!(budget.updated_at >= before);

        assert!(budget.update_limit(MoneyCents::ZERO).is_err());
        assert_eq!(budget.limit, MoneyCents::new(1200));
    }

    #[test]
    fn deleted_is_terminal() {
        let mut budget = budget(1000).unwrap();
        budget.soft_delete().unwrap();
        assert!(budget.is_deleted());
        assert_eq!(budget.deleted_at(), Some(budget.updated_at));
        assert!(budget.soft_delete().is_err());
        assert!(budget.update_limit(MoneyCents::new(10)).is_err());
    }

    #[test]
    fn view_computes_progress() {
        let view = BudgetView::new(budget(1000_00).unwrap(), MoneyCents::new(250_00));
        assert_eq!(view.progress_percentage, 25.0);
    }

    #[test]
    fn row_roundtrip_keeps_tombstone() {
        let mut budget = budget(1000).unwrap();
        budget.soft_delete().unwrap();
        let active: ActiveModel = (&budget).into();
        let model = Model {
            id: active.id.unwrap(),
            workspace_id: active.workspace_id.unwrap(),
            owner_id: active.owner_id.unwrap(),
            category_id: active.category_id.unwrap(),
            limit_minor: active.limit_minor.unwrap(),
            month: active.month.unwrap(),
            year: active.year.unwrap(),
            created_at: active.created_at.unwrap(),
            updated_at: active.updated_at.unwrap(),
            deleted_at: active.deleted_at.unwrap(),
        };
        assert_eq!(Budget::try_from(model).unwrap(), budget);
    }
}
