//! CLI argument definitions using clap
//!
//! Commands:
//! - subscriptions serve
//! - subscriptions migrate
//!
//! Every option can be supplied through the environment variable named
//! beside it.

use clap::{Args, Parser, Subcommand};

use crate::config::DatabaseConfig;
use crate::http_server::HttpServerConfig;

/// Subscriptions - HTTP service for user subscription records
#[derive(Parser)]
#[command(name = "subscriptions")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Apply migrations and serve the HTTP API
    Serve {
        #[command(flatten)]
        database: DatabaseArgs,

        #[command(flatten)]
        http: HttpArgs,
    },

    /// Apply migrations and exit
    Migrate {
        #[command(flatten)]
        database: DatabaseArgs,
    },
}

/// PostgreSQL connection options
#[derive(Args)]
pub struct DatabaseArgs {
    /// Database user
    #[arg(long = "db-user", env = "USER")]
    pub user: String,

    /// Database password
    #[arg(long = "db-password", env = "PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Database host
    #[arg(long = "db-host", env = "HOST")]
    pub host: String,

    /// Database port
    #[arg(long = "db-port", env = "PORT", default_value_t = 5432)]
    pub port: u16,

    /// Database name
    #[arg(long = "db-name", env = "DBNAME")]
    pub dbname: String,

    /// libpq sslmode
    #[arg(long = "db-sslmode", env = "SSLMODE", default_value = "disable")]
    pub sslmode: String,

    /// Maximum pooled connections
    #[arg(long, env = "DB_MAX_CONNECTIONS", default_value_t = 10)]
    pub max_connections: u32,

    /// How long a request waits for a pooled connection
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_MS", default_value_t = 5000)]
    pub acquire_timeout_ms: u64,
}

impl From<DatabaseArgs> for DatabaseConfig {
    fn from(args: DatabaseArgs) -> Self {
        Self {
            user: args.user,
            password: args.password,
            host: args.host,
            port: args.port,
            dbname: args.dbname,
            sslmode: args.sslmode,
            max_connections: args.max_connections,
            acquire_timeout_ms: args.acquire_timeout_ms,
        }
    }
}

/// Listener options
#[derive(Args)]
pub struct HttpArgs {
    /// Address to bind
    #[arg(long, env = "LISTEN_HOST", default_value = "0.0.0.0")]
    pub listen_host: String,

    /// Port to bind
    #[arg(long, env = "LISTEN_PORT", default_value_t = 8080)]
    pub listen_port: u16,

    /// Allowed CORS origins, comma separated (any origin when empty)
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

impl From<HttpArgs> for HttpServerConfig {
    fn from(args: HttpArgs) -> Self {
        Self {
            host: args.listen_host,
            port: args.listen_port,
            cors_origins: args.cors_origins,
        }
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
