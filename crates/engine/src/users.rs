//! Users table (identity mirror).
//!
//! Authentication lives outside the engine. The engine only keeps the user
//! id, the email used to look up invitees and the active flag.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// A user known to the engine.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
}

/// The already-authenticated user performing an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Actor {
    pub id: Uuid,
    pub is_active: bool,
}

impl Actor {
    pub fn new(id: Uuid, is_active: bool) -> Self {
        Self { id, is_active }
    }

    pub(crate) fn ensure_active(&self) -> ResultEngine<()> {
        if !self.is_active {
            return Err(EngineError::Unauthorized("user is inactive".to_string()));
        }
        Ok(())
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            is_active: user.is_active,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            is_active: model.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_actor_is_rejected() {
        let actor = Actor::new(Uuid::new_v4(), false);
        assert_eq!(
            actor.ensure_active(),
            Err(EngineError::Unauthorized("user is inactive".to_string()))
        );
        assert!(Actor::new(Uuid::new_v4(), true).ensure_active().is_ok());
    }
}
