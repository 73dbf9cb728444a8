//! Identity mirror store.

use sea_orm::{ConnectionTrait, QueryFilter, prelude::*};

use crate::{EngineError, ResultEngine, User, users};

pub(crate) async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ResultEngine<Option<User>> {
    let model = users::Entity::find_by_id(user_id).one(db).await?;
    Ok(model.map(User::from))
}

pub(crate) async fn get_by_email<C: ConnectionTrait>(
    db: &C,
    email: &str,
) -> ResultEngine<Option<User>> {
    let model = users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(model.map(User::from))
}

pub(crate) async fn add<C: ConnectionTrait>(db: &C, user: &User) -> ResultEngine<()> {
    let active = users::ActiveModel {
        id: sea_orm::ActiveValue::Set(user.id),
        email: sea_orm::ActiveValue::Set(user.email.clone()),
        is_active: sea_orm::ActiveValue::Set(user.is_active),
    };
    users::Entity::insert(active)
        .exec(db)
        .await
        .map_err(|err| {
            EngineError::from_write(err, "user", || {
                format!("user with email '{}' already exists", user.email)
            })
        })?;
    Ok(())
}

pub(crate) async fn set_active<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    is_active: bool,
) -> ResultEngine<()> {
    let active = users::ActiveModel {
        id: sea_orm::ActiveValue::Unchanged(user_id),
        is_active: sea_orm::ActiveValue::Set(is_active),
        ..Default::default()
    };
    active.update(db).await?;
    Ok(())
}
