//! subscriptions - HTTP service for user subscription records
//!
//! CRUD over a PostgreSQL `subscriptions` table plus a price total over a
//! start-date window.

pub mod aggregate;
pub mod cli;
pub mod config;
pub mod http_server;
pub mod models;
pub mod observability;
pub mod store;
