use std::error::Error;

use clap::{Args, Parser, Subcommand};
use engine::{Actor, Engine, EngineError};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

mod settings;

const DEFAULT_DATABASE_URL: &str = "sqlite:./budgetspace.db?mode=rwc";

#[derive(Parser, Debug)]
#[command(name = "budgetspace_admin")]
#[command(about = "Operator utilities for Budgetspace (migrations, users, default categories)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`). Overrides
    /// the `[database]` section of the settings file.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Settings file, without extension.
    #[arg(long, default_value = "settings")]
    settings: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations.
    Migrate,
    User(User),
    Category(Category),
    Workspace(Workspace),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(EmailArgs),
    Deactivate(EmailArgs),
    Activate(EmailArgs),
}

#[derive(Args, Debug)]
struct EmailArgs {
    #[arg(long)]
    email: String,
}

#[derive(Args, Debug)]
struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Subcommand, Debug)]
enum CategoryCommand {
    AddDefault(CategoryAddArgs),
    ListDefaults,
}

#[derive(Args, Debug)]
struct CategoryAddArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    description: Option<String>,
}

#[derive(Args, Debug)]
struct Workspace {
    #[command(subcommand)]
    command: WorkspaceCommand,
}

#[derive(Subcommand, Debug)]
enum WorkspaceCommand {
    /// Workspaces visible to a user.
    List(EmailArgs),
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run(engine: &Engine, command: Command) -> Result<(), EngineError> {
    match command {
        Command::Migrate => println!("migrations applied"),
        Command::User(User { command }) => match command {
            UserCommand::Create(args) => {
                let user = engine.new_user(&args.email).await?;
                println!("created user: {} ({})", user.email, user.id);
            }
            UserCommand::Deactivate(args) => {
                let user = engine.user_by_email(&args.email).await?;
                engine.set_user_active(user.id, false).await?;
                println!("deactivated user: {}", user.email);
            }
            UserCommand::Activate(args) => {
                let user = engine.user_by_email(&args.email).await?;
                engine.set_user_active(user.id, true).await?;
                println!("activated user: {}", user.email);
            }
        },
        Command::Category(Category { command }) => match command {
            CategoryCommand::AddDefault(args) => {
                let category = engine
                    .new_default_category(&args.name, args.description.as_deref())
                    .await?;
                println!("created default category: {} ({})", category.name, category.id);
            }
            CategoryCommand::ListDefaults => {
                for category in engine.default_categories().await? {
                    match category.description {
                        Some(description) => {
                            println!("{}\t{}\t{description}", category.id, category.name)
                        }
                        None => println!("{}\t{}", category.id, category.name),
                    }
                }
            }
        },
        Command::Workspace(Workspace {
            command: WorkspaceCommand::List(args),
        }) => {
            let user = engine.user_by_email(&args.email).await?;
            let actor = Actor::from(&user);
            for workspace in engine.list_workspaces(actor).await? {
                let role = if workspace.is_owner(user.id) {
                    "owner"
                } else {
                    "member"
                };
                println!("{}\t{}\t{role}", workspace.id, workspace.name);
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.settings)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budgetspace_admin={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let database_url = cli
        .database_url
        .or_else(|| settings.database.as_ref().map(settings::Database::url))
        .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
    tracing::debug!(%database_url, "connecting");

    let db = connect_db(&database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    if let Err(err) = run(&engine, cli.command).await {
        eprintln!("{err}");
        std::process::exit(1);
    }

    Ok(())
}
