//! Workspace roles and the capabilities each one grants.
//!
//! Every permission check goes through [`WorkspaceRole::can`]; adding a role or
//! a capability only touches [`WorkspaceRole::capabilities`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Role of a user inside a workspace.
///
/// Variants are declared from the least to the most privileged, so the derived
/// `Ord` is the privilege order (`Viewer < Editor < Admin < Owner`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkspaceRole {
    Viewer,
    Editor,
    Admin,
    Owner,
}

/// Something a member may do inside a workspace.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Read the workspace, its members, categories and budgets.
    View,
    /// Rename or describe the workspace.
    EditWorkspace,
    /// Invite, remove and change the role of members.
    ManageMembers,
    /// Create, update and delete budgets and custom categories.
    ManageBudgets,
    /// Delete the workspace itself.
    DeleteWorkspace,
}

impl Capability {
    pub const ALL: [Capability; 5] = [
        Capability::View,
        Capability::EditWorkspace,
        Capability::ManageMembers,
        Capability::ManageBudgets,
        Capability::DeleteWorkspace,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::EditWorkspace => "edit_workspace",
            Self::ManageMembers => "manage_members",
            Self::ManageBudgets => "manage_budgets",
            Self::DeleteWorkspace => "delete_workspace",
        }
    }

    /// Roles granting this capability, most privileged first.
    pub fn roles(self) -> Vec<WorkspaceRole> {
        WorkspaceRole::ALL
            .into_iter()
            .rev()
            .filter(|role| role.can(self))
            .collect()
    }
}

impl WorkspaceRole {
    pub const ALL: [WorkspaceRole; 4] = [
        WorkspaceRole::Viewer,
        WorkspaceRole::Editor,
        WorkspaceRole::Admin,
        WorkspaceRole::Owner,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Editor => "editor",
            Self::Viewer => "viewer",
        }
    }

    /// The capability table.
    ///
    /// Management tier is `{Owner, Admin}`, financial tier is
    /// `{Owner, Editor}`, any role can view.
    pub const fn capabilities(self) -> &'static [Capability] {
        match self {
            Self::Owner => &Capability::ALL,
            Self::Admin => &[
                Capability::View,
                Capability::EditWorkspace,
                Capability::ManageMembers,
            ],
            Self::Editor => &[Capability::View, Capability::ManageBudgets],
            Self::Viewer => &[Capability::View],
        }
    }

    pub fn can(self, capability: Capability) -> bool {
        self.capabilities().contains(&capability)
    }

    /// Whether the role may be handed out through invitations or role
    /// updates. Ownership only comes from creating a workspace.
    pub fn is_assignable(self) -> bool {
        self != Self::Owner
    }
}

impl fmt::Display for WorkspaceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for WorkspaceRole {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "owner" => Ok(Self::Owner),
            "admin" => Ok(Self::Admin),
            "editor" => Ok(Self::Editor),
            "viewer" => Ok(Self::Viewer),
            other => Err(EngineError::Validation(format!(
                "invalid membership role: {other}"
            ))),
        }
    }
}
