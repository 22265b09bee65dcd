use std::{error::Error, path::PathBuf};

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Engine, EngineError, ExpenseDraft};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

#[derive(Parser, Debug)]
#[command(name = "expense_admin")]
#[command(about = "Admin utilities for ExpenseBuddy (inspect the store, test receipts)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./expenses.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply, roll back or inspect the schema migrations.
    Migrate {
        #[arg(value_enum, default_value_t = MigrateAction::Up)]
        action: MigrateAction,
    },
    #[command(flatten)]
    Store(StoreCommand),
}

#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Print every stored expense.
    List,
    /// Store a new expense.
    Add(AddArgs),
    /// Remove an expense by id.
    Delete { id: String },
    /// Run the receipt extractor over an OCR text dump.
    Extract(ExtractArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum MigrateAction {
    /// Apply every pending migration.
    Up,
    /// Roll back the last applied migration.
    Down,
    /// Drop all tables and apply every migration again.
    Fresh,
    /// List applied and pending migrations.
    Status,
}

#[derive(Args, Debug)]
struct AddArgs {
    #[arg(long)]
    description: String,
    #[arg(long)]
    amount: f64,
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct ExtractArgs {
    file: PathBuf,
    /// Store the extracted expense instead of only printing it.
    #[arg(long)]
    save: bool,
}

async fn migrate(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    match action {
        MigrateAction::Up => migration::Migrator::up(db, None).await?,
        MigrateAction::Down => migration::Migrator::down(db, Some(1)).await?,
        MigrateAction::Fresh => migration::Migrator::fresh(db).await?,
        MigrateAction::Status => migration::Migrator::status(db).await?,
    }

    Ok(())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

async fn run(engine: Engine, command: StoreCommand) -> Result<(), Box<dyn Error + Send + Sync>> {
    match command {
        StoreCommand::List => {
            for expense in engine.list_all().await? {
                println!("{expense}");
            }
        }
        StoreCommand::Add(args) => {
            let expense = engine
                .insert(ExpenseDraft {
                    description: args.description,
                    amount: args.amount,
                    date: args.date,
                })
                .await?;
            println!("created expense: {expense}");
        }
        StoreCommand::Delete { id } => match engine.delete(&id).await {
            Ok(()) => println!("deleted expense: {id}"),
            Err(EngineError::KeyNotFound(_)) => {
                eprintln!("expense not found: {id}");
                std::process::exit(1);
            }
            Err(err) => return Err(err.into()),
        },
        StoreCommand::Extract(args) => {
            let text = std::fs::read_to_string(&args.file)?;
            let expense = engine.insert(engine::extract(&text).into()).await?;
            println!("created expense: {expense}");
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Store(StoreCommand::Extract(ExtractArgs { file, save: false })) => {
            let text = std::fs::read_to_string(file)?;
            let receipt = engine::extract(&text);
            println!("description: {}", receipt.description);
            println!("amount: {:.2}", receipt.amount);
            Ok(())
        }
        Command::Migrate { action } => {
            let db = Database::connect(&cli.database_url).await?;
            migrate(&db, action).await
        }
        Command::Store(command) => {
            let db = connect_db(&cli.database_url).await?;
            let engine = Engine::builder().database(db).build().await?;
            run(engine, command).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Command {
        Cli::try_parse_from(std::iter::once("expense_admin").chain(args.iter().copied()))
            .unwrap()
            .command
    }

    #[test]
    fn migrate_defaults_to_up() {
        assert!(matches!(
            parse(&["migrate"]),
            Command::Migrate {
                action: MigrateAction::Up
            }
        ));
    }

    #[test]
    fn migrate_accepts_status() {
        assert!(matches!(
            parse(&["migrate", "status"]),
            Command::Migrate {
                action: MigrateAction::Status
            }
        ));
    }

    #[test]
    fn store_commands_stay_top_level() {
        assert!(matches!(parse(&["list"]), Command::Store(StoreCommand::List)));
        assert!(matches!(
            parse(&["delete", "abc"]),
            Command::Store(StoreCommand::Delete { .. })
        ));
    }

    #[test]
    fn unknown_migrate_action_is_rejected() {
        assert!(Cli::try_parse_from(["expense_admin", "migrate", "sideways"]).is_err());
    }
}
