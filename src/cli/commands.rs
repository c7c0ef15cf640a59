//! CLI command implementations
//!
//! Boot order for `serve`: validate configuration, connect, migrate, bind,
//! serve. Any failure before serving is fatal.

use std::sync::Arc;

use super::args::{Command, DatabaseArgs, HttpArgs};
use super::errors::{CliError, CliResult};
use crate::config::DatabaseConfig;
use crate::http_server::{HttpServer, HttpServerConfig};
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::store::{PgSubscriptionStore, SubscriptionStore};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { database, http } => serve(database, http),
        Command::Migrate { database } => migrate(database),
    }
}

/// Connect, migrate and serve the HTTP API until Ctrl-C
pub fn serve(database: DatabaseArgs, http: HttpArgs) -> CliResult<()> {
    log_event(Event::BootStart);

    let db_config = load_database_config(database)?;
    let http_config = HttpServerConfig::from(http);
    let listen = http_config.socket_addr();
    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("database", db_config.dbname.as_str()),
            ("db_host", db_config.host.as_str()),
            ("listen", listen.as_str()),
        ],
    );

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = PgSubscriptionStore::connect(&db_config).await?;
        store.run_migrations().await?;

        let store: Arc<dyn SubscriptionStore> = Arc::new(store);
        let server = HttpServer::new(http_config, store);
        log_event(Event::BootComplete);

        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Connect, apply migrations and exit
pub fn migrate(database: DatabaseArgs) -> CliResult<()> {
    let db_config = load_database_config(database)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        let store = PgSubscriptionStore::connect(&db_config).await?;
        store.run_migrations().await?;
        Ok::<(), CliError>(())
    })
}

fn load_database_config(args: DatabaseArgs) -> CliResult<DatabaseConfig> {
    let config = DatabaseConfig::from(args);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    fn database_args(sslmode: &str) -> DatabaseArgs {
        DatabaseArgs {
            user: "postgres".to_string(),
            password: String::new(),
            host: "localhost".to_string(),
            port: 5432,
            dbname: "subscriptions".to_string(),
            sslmode: sslmode.to_string(),
            max_connections: 10,
            acquire_timeout_ms: 5000,
        }
    }

    #[test]
    fn test_invalid_config_fails_before_connecting() {
        let err = migrate(database_args("sometimes")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_load_database_config() {
        let config = load_database_config(database_args("require")).unwrap();
        assert_eq!(config.sslmode, "require");
    }
}
