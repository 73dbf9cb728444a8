//! A `Workspace` is a named financial context owned by one user and shared
//! with zero or more members.
//!
//! The owner is never stored as a member row. Its membership is derived from
//! `owner_id`, see [`Workspace::owner_membership`].

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{WorkspaceMember, WorkspaceRole};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub owner_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new(
        name: String,
        owner_id: Uuid,
        description: Option<String>,
        category: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            description,
            category,
            owner_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owner(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }

    /// The virtual membership of the owner: role `Owner`, joined when the
    /// workspace was created, no persisted id.
    pub fn owner_membership(&self) -> WorkspaceMember {
        WorkspaceMember {
            id: None,
            workspace_id: self.id,
            user_id: self.owner_id,
            role: WorkspaceRole::Owner,
            joined_at: self.created_at,
        }
    }

    /// Resolve the membership of `user_id` given the persisted row, if any.
    ///
    /// The owner always resolves to [`Workspace::owner_membership`], whatever
    /// the membership table says.
    pub fn resolve_membership(
        &self,
        user_id: Uuid,
        persisted: Option<WorkspaceMember>,
    ) -> Option<WorkspaceMember> {
        if self.is_owner(user_id) {
            return Some(self.owner_membership());
        }
        persisted.filter(|member| member.user_id == user_id && member.workspace_id == self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "workspaces")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub owner_id: Uuid,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::workspace_members::Entity")]
    Members,
    #[sea_orm(has_many = "super::budgets::Entity")]
    Budgets,
    #[sea_orm(has_many = "super::categories::Entity")]
    Categories,
}

impl Related<super::workspace_members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl Related<super::budgets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Budgets.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Workspace> for ActiveModel {
    fn from(value: &Workspace) -> Self {
        Self {
            id: ActiveValue::Set(value.id),
            name: ActiveValue::Set(value.name.clone()),
            description: ActiveValue::Set(value.description.clone()),
            category: ActiveValue::Set(value.category.clone()),
            owner_id: ActiveValue::Set(value.owner_id),
            is_active: ActiveValue::Set(value.is_active),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}

impl From<Model> for Workspace {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            category: model.category,
            owner_id: model.owner_id,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
