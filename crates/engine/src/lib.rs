//! Budgeting core: workspaces shared between users, role-gated membership and
//! monthly category budgets.
//!
//! Everything goes through [`Engine`]. Each operation receives the acting
//! user as an [`Actor`], authorizes it against the workspace membership (the
//! owner's being synthesized, never stored) and runs in one database
//! transaction.

pub use budgets::{Budget, BudgetPage, BudgetPeriod, BudgetState, BudgetView, MIN_YEAR};
pub use categories::Category;
pub use commands::{
    BudgetListQuery, BudgetNewCmd, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, WorkspaceNewCmd,
    WorkspaceUpdateCmd,
};
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder};
pub use roles::{Capability, WorkspaceRole};
pub use spend::{NoSpend, SpendAggregator, SpendQuery};
pub use users::{Actor, User};
pub use workspace_members::WorkspaceMember;
pub use workspaces::Workspace;

mod budgets;
mod categories;
mod commands;
mod error;
mod money;
mod ops;
mod roles;
mod spend;
mod store;
mod users;
mod util;
mod workspace_members;
mod workspaces;

pub type ResultEngine<T> = Result<T, EngineError>;
