use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use server::{ServerOptions, TesseractOcr};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "expense_buddy={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    tracing::info!("Starting {}...", settings.app.name);
    let db = parse_database(&settings.server.database).await?;
    let engine = engine::Engine::builder().database(db).build().await?;
    let ocr = Arc::new(TesseractOcr::new(
        settings.ocr.command,
        settings.ocr.language,
    ));

    let bind = settings
        .server
        .bind
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let options = ServerOptions {
        app_name: settings.app.name,
        allowed_hosts: settings.app.allowed_hosts,
    };
    server::run_with_listener(engine, ocr, options, listener).await?;

    Ok(())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}
