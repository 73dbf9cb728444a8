//! Category store.

use sea_orm::{Condition, ConnectionTrait, QueryFilter, QueryOrder, Select, prelude::*};

use crate::{Category, EngineError, ResultEngine, categories};

fn ordered(query: Select<categories::Entity>) -> Select<categories::Entity> {
    query
        .order_by_desc(categories::Column::IsDefault)
        .order_by_asc(categories::Column::Name)
}

pub(crate) async fn get_by_id<C: ConnectionTrait>(
    db: &C,
    category_id: Uuid,
) -> ResultEngine<Option<Category>> {
    let model = categories::Entity::find_by_id(category_id).one(db).await?;
    Ok(model.map(Category::from))
}

/// Look a name up in one scope: the defaults when `workspace_id` is `None`,
/// otherwise the workspace's own categories.
pub(crate) async fn find_by_name<C: ConnectionTrait>(
    db: &C,
    name: &str,
    workspace_id: Option<Uuid>,
) -> ResultEngine<Option<Category>> {
    let scope = match workspace_id {
        Some(id) => categories::Column::WorkspaceId.eq(id),
        None => categories::Column::WorkspaceId.is_null(),
    };
    let model = categories::Entity::find()
        .filter(scope)
        .filter(categories::Column::Name.eq(name))
        .one(db)
        .await?;
    Ok(model.map(Category::from))
}

pub(crate) async fn list_defaults<C: ConnectionTrait>(db: &C) -> ResultEngine<Vec<Category>> {
    let models = ordered(categories::Entity::find().filter(categories::Column::IsDefault.eq(true)))
        .all(db)
        .await?;
    Ok(models.into_iter().map(Category::from).collect())
}

/// Defaults plus the workspace's custom categories.
pub(crate) async fn list_by_workspace<C: ConnectionTrait>(
    db: &C,
    workspace_id: Uuid,
) -> ResultEngine<Vec<Category>> {
    let models = ordered(
        categories::Entity::find().filter(
            Condition::any()
                .add(categories::Column::IsDefault.eq(true))
                .add(categories::Column::WorkspaceId.eq(workspace_id)),
        ),
    )
    .all(db)
    .await?;
    Ok(models.into_iter().map(Category::from).collect())
}

pub(crate) async fn add<C: ConnectionTrait>(db: &C, category: &Category) -> ResultEngine<()> {
    categories::Entity::insert(categories::ActiveModel::from(category))
        .exec(db)
        .await
        .map_err(|err| {
            EngineError::from_write(err, "workspace", || {
                format!("Category '{}' already exists", category.name)
            })
        })?;
    Ok(())
}
