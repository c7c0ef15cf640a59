//! PostgreSQL subscription store
//!
//! Every operation is one statement against a shared `sqlx::PgPool`.
//! Dynamic statements come from [`super::query`] and bind their values
//! positionally.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::{PgArguments, PgPool, PgPoolOptions};
use sqlx::{Arguments, FromRow};
use uuid::Uuid;

use super::query::{self, FieldValue, Statement, SELECT_COLUMNS};
use super::{StoreResult, SubscriptionStore};
use crate::config::DatabaseConfig;
use crate::models::Subscription;
use crate::observability::{log_event_with_fields, Event, Logger};

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Row shape of the `subscriptions` table
#[derive(Debug, FromRow)]
struct SubscriptionRow {
    id: i64,
    user_id: Uuid,
    service_name: String,
    price: i64,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            service_name: row.service_name,
            price: row.price,
            start_date: row.start_date,
            end_date: row.end_date,
            all: false,
        }
    }
}

/// Subscription store backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgSubscriptionStore {
    pool: PgPool,
}

impl PgSubscriptionStore {
    /// Open a pool and verify the database is reachable.
    ///
    /// The password is never logged.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect_with(config.connect_options()?)
            .await?;

        sqlx::query("SELECT 1").execute(&pool).await?;

        log_event_with_fields(
            Event::StoreConnected,
            &[
                ("host", config.host.as_str()),
                ("database", config.dbname.as_str()),
            ],
        );

        Ok(Self { pool })
    }

    /// Wrap an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply embedded migrations.
    ///
    /// A migration left dirty by an interrupted run is forced to its
    /// version and the run is retried once.
    pub async fn run_migrations(&self) -> StoreResult<()> {
        match MIGRATOR.run(&self.pool).await {
            Ok(()) => {}
            Err(MigrateError::Dirty(version)) => {
                let version_str = version.to_string();
                Logger::warn(
                    Event::MigrationForced.as_str(),
                    &[("version", version_str.as_str())],
                );
                sqlx::query("UPDATE _sqlx_migrations SET success = TRUE WHERE version = $1")
                    .bind(version)
                    .execute(&self.pool)
                    .await?;
                MIGRATOR.run(&self.pool).await?;
            }
            Err(e) => return Err(e.into()),
        }

        log_event_with_fields(Event::MigrationsApplied, &[]);
        Ok(())
    }
}

/// Build positional arguments in statement order
fn arguments(values: &[FieldValue]) -> Result<PgArguments, sqlx::Error> {
    let mut args = PgArguments::default();
    for value in values {
        let added = match value {
            FieldValue::Timestamp(ts) => args.add(*ts),
            FieldValue::Text(s) => args.add(s.clone()),
            FieldValue::Integer(n) => args.add(*n),
            FieldValue::Uuid(u) => args.add(*u),
        };
        added.map_err(sqlx::Error::Encode)?;
    }
    Ok(args)
}

fn log_statement_failure(operation: &str, stmt: &Statement, err: &sqlx::Error) {
    let args = stmt.args_display();
    let error = err.to_string();
    Logger::error(
        Event::StoreFailure.as_str(),
        &[
            ("args", args.as_str()),
            ("error", error.as_str()),
            ("operation", operation),
            ("query", stmt.sql.as_str()),
        ],
    );
}

#[async_trait]
impl SubscriptionStore for PgSubscriptionStore {
    async fn insert(&self, sub: &Subscription) -> StoreResult<()> {
        sqlx::query(
            r#"INSERT INTO subscriptions (user_id, service_name, price, start_date, end_date)
               VALUES ($1, $2, $3, $4, $5)"#,
        )
        .bind(sub.user_id)
        .bind(&sub.service_name)
        .bind(sub.price)
        .bind(sub.start_date)
        .bind(sub.end_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        sqlx::query("DELETE FROM subscriptions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn get(&self, id: i64) -> StoreResult<Subscription> {
        let sql = format!("SELECT {} FROM subscriptions WHERE id = $1", SELECT_COLUMNS);
        let row = sqlx::query_as::<_, SubscriptionRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Subscription::from).unwrap_or_default())
    }

    async fn update(&self, id: i64, patch: &Subscription) -> StoreResult<()> {
        let stmt = query::update_statement(id, patch)?;
        let args = arguments(&stmt.args)?;

        if let Err(e) = sqlx::query_with(&stmt.sql, args).execute(&self.pool).await {
            log_statement_failure("update", &stmt, &e);
            return Err(e.into());
        }
        Ok(())
    }

    async fn list(&self, filter: &Subscription) -> StoreResult<Vec<Subscription>> {
        let stmt = query::list_statement(filter);
        let args = arguments(&stmt.args)?;

        let rows = sqlx::query_as_with::<_, SubscriptionRow, _>(&stmt.sql, args)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                log_statement_failure("list", &stmt, &e);
                e
            })?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }
}
