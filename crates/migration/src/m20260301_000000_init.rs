//! Initial schema migration - creates all tables from scratch.
//!
//! - `users`: identity mirror (email lookup and active flag)
//! - `workspaces`: shared financial contexts, one owner each
//! - `workspace_members`: invited members only, the owner is never a row
//! - `categories`: global defaults and workspace-scoped categories
//! - `budgets`: monthly limits per category, soft-deleted via `deleted_at`
//!
//! Uniqueness rules the engine checks before writing are also enforced here,
//! so two concurrent writers cannot both pass the check.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Users {
    Table,
    Id,
    Email,
    IsActive,
}

#[derive(Iden)]
enum Workspaces {
    Table,
    Id,
    Name,
    Description,
    Category,
    OwnerId,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum WorkspaceMembers {
    Table,
    Id,
    WorkspaceId,
    UserId,
    Role,
    JoinedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Name,
    Description,
    IsDefault,
    WorkspaceId,
    CreatedAt,
}

#[derive(Iden)]
enum Budgets {
    Table,
    Id,
    WorkspaceId,
    OwnerId,
    CategoryId,
    LimitMinor,
    Month,
    Year,
    CreatedAt,
    UpdatedAt,
    DeletedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Users
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Users::Id).blob().not_null().primary_key())
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Workspaces
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Workspaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspaces::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspaces::Name).string().not_null())
                    .col(ColumnDef::new(Workspaces::Description).string())
                    .col(ColumnDef::new(Workspaces::Category).string())
                    .col(ColumnDef::new(Workspaces::OwnerId).blob().not_null())
                    .col(
                        ColumnDef::new(Workspaces::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Workspaces::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Workspaces::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workspaces-owner_id")
                            .from(Workspaces::Table, Workspaces::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workspaces-owner_id-name")
                    .table(Workspaces::Table)
                    .col(Workspaces::OwnerId)
                    .col(Workspaces::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Workspace members
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(WorkspaceMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkspaceMembers::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(WorkspaceMembers::WorkspaceId)
                            .blob()
                            .not_null(),
                    )
                    .col(ColumnDef::new(WorkspaceMembers::UserId).blob().not_null())
                    .col(ColumnDef::new(WorkspaceMembers::Role).string().not_null())
                    .col(
                        ColumnDef::new(WorkspaceMembers::JoinedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workspace_members-workspace_id")
                            .from(WorkspaceMembers::Table, WorkspaceMembers::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-workspace_members-user_id")
                            .from(WorkspaceMembers::Table, WorkspaceMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-workspace_members-workspace_id-user_id")
                    .table(WorkspaceMembers::Table)
                    .col(WorkspaceMembers::WorkspaceId)
                    .col(WorkspaceMembers::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Categories
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Name).string().not_null())
                    .col(ColumnDef::new(Categories::Description).string())
                    .col(
                        ColumnDef::new(Categories::IsDefault)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Categories::WorkspaceId).blob())
                    .col(
                        ColumnDef::new(Categories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-categories-workspace_id")
                            .from(Categories::Table, Categories::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-workspace_id-name")
                    .table(Categories::Table)
                    .col(Categories::WorkspaceId)
                    .col(Categories::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // NULL workspace ids never collide in a plain unique index.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"idx-categories-default-name\" \
                 ON categories (name) WHERE workspace_id IS NULL",
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Budgets
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Budgets::Id).blob().not_null().primary_key())
                    .col(ColumnDef::new(Budgets::WorkspaceId).blob().not_null())
                    .col(ColumnDef::new(Budgets::OwnerId).blob().not_null())
                    .col(ColumnDef::new(Budgets::CategoryId).blob().not_null())
                    .col(
                        ColumnDef::new(Budgets::LimitMinor)
                            .big_integer()
                            .not_null()
                            .check(Expr::col(Budgets::LimitMinor).gt(0)),
                    )
                    .col(
                        ColumnDef::new(Budgets::Month)
                            .integer()
                            .not_null()
                            .check(Expr::col(Budgets::Month).between(1, 12)),
                    )
                    .col(
                        ColumnDef::new(Budgets::Year)
                            .integer()
                            .not_null()
                            .check(Expr::col(Budgets::Year).gte(2000)),
                    )
                    .col(
                        ColumnDef::new(Budgets::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Budgets::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Budgets::DeletedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-workspace_id")
                            .from(Budgets::Table, Budgets::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    // NO ACTION is checked at the end of the statement, so a
                    // workspace delete may cascade through both tables.
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-budgets-category_id")
                            .from(Budgets::Table, Budgets::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::NoAction),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-budgets-workspace_id-year-month")
                    .table(Budgets::Table)
                    .col(Budgets::WorkspaceId)
                    .col(Budgets::Year)
                    .col(Budgets::Month)
                    .to_owned(),
            )
            .await?;

        // One active budget per category and period; tombstones may repeat.
        manager
            .get_connection()
            .execute_unprepared(
                "CREATE UNIQUE INDEX IF NOT EXISTS \"idx-budgets-active-period\" \
                 ON budgets (workspace_id, category_id, month, year) \
                 WHERE deleted_at IS NULL",
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(WorkspaceMembers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Workspaces::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}
