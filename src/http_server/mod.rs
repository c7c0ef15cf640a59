//! # HTTP Server Module
//!
//! Axum server exposing the subscription API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/subscriptions`, `/subscriptions/:id` - Subscription CRUD
//! - `/sum` - Price total over a start-date window

pub mod config;
pub mod errors;
pub mod health_routes;
pub mod server;
pub mod subscription_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use subscription_routes::SubscriptionState;
