#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement, Value};

use engine::{
    Actor, Category, Engine, MoneyCents, ResultEngine, SpendAggregator, SpendQuery, Workspace,
    WorkspaceNewCmd, WorkspaceRole,
};
use migration::MigratorTrait;
use uuid::Uuid;

/// Spend source with amounts set per (workspace, category, period).
#[derive(Clone, Debug, Default)]
pub struct FixedSpend {
    amounts: Arc<Mutex<HashMap<SpendQuery, MoneyCents>>>,
}

impl FixedSpend {
    pub fn set(&self, query: SpendQuery, cents: i64) {
        self.amounts
            .lock()
            .unwrap()
            .insert(query, MoneyCents::new(cents));
    }
}

#[async_trait::async_trait]
impl SpendAggregator for FixedSpend {
    async fn spent_amount(&self, query: SpendQuery) -> ResultEngine<MoneyCents> {
        Ok(self
            .amounts
            .lock()
            .unwrap()
            .get(&query)
            .copied()
            .unwrap_or(MoneyCents::ZERO))
    }
}

pub struct Ctx {
    pub engine: Engine,
    pub db: DatabaseConnection,
    pub spend: FixedSpend,
}

pub async fn setup() -> Ctx {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let spend = FixedSpend::default();
    let engine = Engine::builder()
        .database(db.clone())
        .spend_aggregator(spend.clone())
        .build()
        .await
        .unwrap();
    Ctx { engine, db, spend }
}

pub async fn actor(engine: &Engine, email: &str) -> Actor {
    let user = engine.new_user(email).await.unwrap();
    Actor::from(&user)
}

pub async fn workspace(engine: &Engine, name: &str, owner: Actor) -> Workspace {
    engine
        .new_workspace(WorkspaceNewCmd::new(name), owner)
        .await
        .unwrap()
}

/// Create a user and invite them into `workspace` with `role`.
pub async fn member(
    engine: &Engine,
    workspace: &Workspace,
    owner: Actor,
    email: &str,
    role: WorkspaceRole,
) -> Actor {
    let actor = actor(engine, email).await;
    engine
        .invite_member(workspace.id, email, role, owner)
        .await
        .unwrap();
    actor
}

pub async fn default_category(engine: &Engine, name: &str) -> Category {
    engine.new_default_category(name, None).await.unwrap()
}

/// Count rows straight from storage, bypassing the engine's filters.
pub async fn count_rows(db: &DatabaseConnection, sql: &str, values: Vec<Value>) -> i64 {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            sql,
            values,
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

pub fn uuid_value(id: Uuid) -> Value {
    id.into()
}
