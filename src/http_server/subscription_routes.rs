//! Subscription HTTP Routes
//!
//! CRUD endpoints for subscription records plus the `/sum` aggregate.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use crate::aggregate::sum_prices;
use crate::models::Subscription;
use crate::observability::{log_event_with_fields, Event};
use crate::store::SubscriptionStore;

// ==================
// Shared State
// ==================

/// Subscription state shared across handlers
pub struct SubscriptionState {
    pub store: Arc<dyn SubscriptionStore>,
}

impl SubscriptionState {
    pub fn new(store: Arc<dyn SubscriptionStore>) -> Self {
        Self { store }
    }
}

// ==================
// Subscription Routes
// ==================

/// Create subscription routes
pub fn subscription_routes(state: Arc<SubscriptionState>) -> Router {
    Router::new()
        .route("/subscriptions", post(create_handler).get(list_handler))
        .route(
            "/subscriptions/:id",
            get(get_handler).put(update_handler).delete(delete_handler),
        )
        .route("/sum", post(sum_handler))
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

fn parse_id(raw: &str) -> ApiResult<i64> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::InvalidId(raw.to_string()))
}

fn decode(body: &[u8]) -> ApiResult<Subscription> {
    Ok(serde_json::from_slice(body)?)
}

/// Like [`decode`], but a blank body is an empty filter
fn decode_filter(body: &[u8]) -> ApiResult<Subscription> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Subscription::default());
    }
    decode(body)
}

// ==================
// Handlers
// ==================

async fn create_handler(
    State(state): State<Arc<SubscriptionState>>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let sub = decode(&body)?;

    state
        .store
        .insert(&sub)
        .await
        .map_err(ApiError::store("add subscription"))?;

    let user_id = sub.user_id.to_string();
    log_event_with_fields(
        Event::SubscriptionCreated,
        &[
            ("service_name", sub.service_name.as_str()),
            ("user_id", user_id.as_str()),
        ],
    );
    Ok(StatusCode::CREATED)
}

async fn delete_handler(
    State(state): State<Arc<SubscriptionState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;

    state
        .store
        .delete(id)
        .await
        .map_err(ApiError::store("delete subscription"))?;

    log_event_with_fields(Event::SubscriptionDeleted, &[("id", raw_id.as_str())]);
    Ok(StatusCode::OK)
}

async fn get_handler(
    State(state): State<Arc<SubscriptionState>>,
    Path(raw_id): Path<String>,
) -> ApiResult<Json<Subscription>> {
    let id = parse_id(&raw_id)?;

    let sub = state
        .store
        .get(id)
        .await
        .map_err(ApiError::store("get subscription"))?;

    if sub.is_missing() {
        return Err(ApiError::NotFound(id));
    }
    Ok(Json(sub))
}

async fn update_handler(
    State(state): State<Arc<SubscriptionState>>,
    Path(raw_id): Path<String>,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let id = parse_id(&raw_id)?;
    let patch = decode(&body)?;

    state
        .store
        .update(id, &patch)
        .await
        .map_err(ApiError::store("update subscription"))?;

    log_event_with_fields(Event::SubscriptionUpdated, &[("id", raw_id.as_str())]);
    Ok(StatusCode::OK)
}

async fn list_handler(
    State(state): State<Arc<SubscriptionState>>,
    body: Bytes,
) -> ApiResult<Json<Vec<Subscription>>> {
    let filter = decode_filter(&body)?;

    let subs = state
        .store
        .list(&filter)
        .await
        .map_err(ApiError::store("list subscriptions"))?;

    Ok(Json(subs))
}

/// Sum prices of subscriptions starting strictly inside the request's
/// `(start_date, end_date)` window. Remaining fields filter the list.
async fn sum_handler(
    State(state): State<Arc<SubscriptionState>>,
    body: Bytes,
) -> ApiResult<Json<i64>> {
    let request = decode(&body)?;

    let subs = state
        .store
        .list(&request.without_dates())
        .await
        .map_err(ApiError::store("list subscriptions"))?;

    Ok(Json(sum_prices(&subs, request.start_date, request.end_date)))
}
