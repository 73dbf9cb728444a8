//! Command structs for engine operations.
//!
//! These types group parameters for write and list operations, keeping call
//! sites readable and avoiding long argument lists.

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Create a workspace.
#[derive(Clone, Debug)]
pub struct WorkspaceNewCmd {
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl WorkspaceNewCmd {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            category: None,
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Rename or describe a workspace.
///
/// `None` leaves a field untouched. An empty `description` or `category`
/// clears it.
#[derive(Clone, Debug, Default)]
pub struct WorkspaceUpdateCmd {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
}

impl WorkspaceUpdateCmd {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Create a budget.
#[derive(Clone, Debug)]
pub struct BudgetNewCmd {
    pub workspace_id: Uuid,
    pub category_id: Uuid,
    pub limit: MoneyCents,
    pub month: u32,
    pub year: i32,
}

impl BudgetNewCmd {
    #[must_use]
    pub fn new(
        workspace_id: Uuid,
        category_id: Uuid,
        limit: impl Into<MoneyCents>,
        month: u32,
        year: i32,
    ) -> Self {
        Self {
            workspace_id,
            category_id,
            limit: limit.into(),
            month,
            year,
        }
    }
}

/// List the budgets of a workspace.
#[derive(Clone, Debug)]
pub struct BudgetListQuery {
    pub workspace_id: Uuid,
    pub category_id: Option<Uuid>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// 1-based page number.
    pub page: u64,
    pub size: u64,
}

impl BudgetListQuery {
    #[must_use]
    pub fn new(workspace_id: Uuid) -> Self {
        Self {
            workspace_id,
            category_id: None,
            month: None,
            year: None,
            page: 1,
            size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn category_id(mut self, category_id: Uuid) -> Self {
        self.category_id = Some(category_id);
        self
    }

    #[must_use]
    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month);
        self
    }

    #[must_use]
    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    #[must_use]
    pub fn page(mut self, page: u64, size: u64) -> Self {
        self.page = page;
        self.size = size;
        self
    }

    /// Row offset of the first item on the page.
    ///
    /// Storage offsets are signed 64-bit, so pages past `i64::MAX` rows are
    /// rejected.
    pub fn offset(&self) -> ResultEngine<u64> {
        self.page
            .saturating_sub(1)
            .checked_mul(self.size)
            .filter(|offset| i64::try_from(*offset).is_ok())
            .ok_or_else(|| EngineError::Validation("Page is out of range".to_string()))
    }
}
