use tracing::info;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, User, store, util::normalize_email};

use super::{Engine, with_tx};

impl Engine {
    /// Mirror a user of the identity provider.
    pub async fn new_user(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        let user = with_tx!(self, |db_tx| {
            if store::users::get_by_email(&db_tx, &email).await?.is_some() {
                return Err(EngineError::Conflict(format!(
                    "user with email '{email}' already exists"
                )));
            }
            let user = User {
                id: Uuid::new_v4(),
                email,
                is_active: true,
            };
            store::users::add(&db_tx, &user).await?;
            Ok(user)
        })?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn user_by_email(&self, email: &str) -> ResultEngine<User> {
        let email = normalize_email(email)?;
        with_tx!(self, |db_tx| {
            store::users::get_by_email(&db_tx, &email)
                .await?
                .ok_or_else(|| EngineError::NotFound("user".to_string()))
        })
    }

    /// Activate or deactivate a user. Inactive users are refused by every
    /// workspace operation.
    pub async fn set_user_active(&self, user_id: Uuid, is_active: bool) -> ResultEngine<User> {
        let user = with_tx!(self, |db_tx| {
            let mut user = store::users::get_by_id(&db_tx, user_id)
                .await?
                .ok_or_else(|| EngineError::NotFound("user".to_string()))?;
            store::users::set_active(&db_tx, user.id, is_active).await?;
            user.is_active = is_active;
            Ok(user)
        })?;

        info!(user_id = %user.id, is_active, "user activity changed");
        Ok(user)
    }
}
