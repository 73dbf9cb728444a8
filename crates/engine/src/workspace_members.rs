//! Persisted workspace memberships (invited users only).

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, WorkspaceRole};

/// Association granting a user a role in a workspace.
///
/// `id` is `None` for the synthetic owner membership and `Some` for rows
/// created by an invitation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceMember {
    pub id: Option<Uuid>,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub role: WorkspaceRole,
    pub joined_at: DateTime<Utc>,
}

impl WorkspaceMember {
    pub fn new(workspace_id: Uuid, user_id: Uuid, role: WorkspaceRole) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            workspace_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    pub fn is_synthetic(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workspace_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub workspace_id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub joined_at: DateTimeUtc,
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
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::workspaces::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Workspace.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<&WorkspaceMember> for ActiveModel {
    type Error = EngineError;

    fn try_from(value: &WorkspaceMember) -> ResultEngine<Self> {
        let id = value.id.ok_or_else(|| {
            EngineError::Validation("the owner membership is never persisted".to_string())
        })?;
        Ok(Self {
            id: ActiveValue::Set(id),
            workspace_id: ActiveValue::Set(value.workspace_id),
            user_id: ActiveValue::Set(value.user_id),
            role: ActiveValue::Set(value.role.as_str().to_string()),
            joined_at: ActiveValue::Set(value.joined_at),
        })
    }
}

impl TryFrom<Model> for WorkspaceMember {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Some(model.id),
            workspace_id: model.workspace_id,
            user_id: model.user_id,
            role: WorkspaceRole::try_from(model.role.as_str())?,
            joined_at: model.joined_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_member_cannot_be_persisted() {
        let mut member = WorkspaceMember::new(Uuid::new_v4(), Uuid::new_v4(), WorkspaceRole::Owner);
        member.id = None;
        assert!(member.is_synthetic());
        assert!(ActiveModel::try_from(&member).is_err());
    }

    #[test]
    fn stored_role_is_parsed() {
        let model = Model {
            id: Uuid::new_v4(),
            workspace_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            role: "editor".to_string(),
            joined_at: Utc::now(),
        };
        let member = WorkspaceMember::try_from(model).unwrap();
        assert_eq!(member.role, WorkspaceRole::Editor);
        assert!(!member.is_synthetic());
    }
}
