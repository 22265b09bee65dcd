//! Handles settings for the application. Configuration is read from an
//! optional `settings.toml` and `EXPENSE_BUDDY__*` environment variables.
//!
//! See `settings.example.toml` for the configuration.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct App {
    pub name: String,
    pub level: String,
    pub allowed_hosts: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

#[derive(Debug, Deserialize)]
pub struct Ocr {
    pub command: String,
    pub language: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub ocr: Ocr,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_builder(
            Config::builder()
                .add_source(File::with_name("settings").required(false))
                .add_source(
                    Environment::with_prefix("EXPENSE_BUDDY")
                        .prefix_separator("__")
                        .separator("__")
                        .list_separator(",")
                        .with_list_parse_key("app.allowed_hosts")
                        .try_parsing(true),
                ),
        )
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        builder
            .set_default("app.name", "ExpenseBuddy")?
            .set_default("app.level", "info")?
            .set_default("app.allowed_hosts", vec!["*"])?
            .set_default("server.port", 3000)?
            .set_default("server.database.sqlite", "./expenses.db")?
            .set_default("ocr.command", "tesseract")?
            .set_default("ocr.language", "eng")?
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Settings::from_builder(
            Config::builder().add_source(File::from_str(toml, FileFormat::Toml)),
        )
        .unwrap()
    }

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = Settings::from_builder(Config::builder()).unwrap();
        assert_eq!(settings.app.name, "ExpenseBuddy");
        assert_eq!(settings.app.allowed_hosts, vec!["*".to_string()]);
        assert_eq!(settings.server.port, 3000);
        assert_eq!(
            settings.server.database,
            Database::Sqlite("./expenses.db".to_string())
        );
        assert_eq!(settings.ocr.command, "tesseract");
    }

    #[test]
    fn file_overrides_defaults() {
        let settings = from_toml(
            r#"
            [app]
            name = "Budget"
            allowed_hosts = ["http://localhost:3000"]

            [server]
            port = 8080
            database = "memory"
            "#,
        );
        assert_eq!(settings.app.name, "Budget");
        assert_eq!(settings.app.level, "info");
        assert_eq!(
            settings.app.allowed_hosts,
            vec!["http://localhost:3000".to_string()]
        );
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.database, Database::Memory);
    }
}
