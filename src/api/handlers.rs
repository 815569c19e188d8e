//! API Handlers
//!
//! HTTP request handlers for each cache service endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, ClearResponse, CleanupResponse, DeleteResponse, GetResponse, HealthResponse,
    PrayerTimesQuery, PrayerTimesResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::prayer::{AladhanClient, AladhanConfig, PrayerTimesService, PrayerTimesSource};

/// Application state shared across all handlers.
///
/// Both members are handles: cloning the state shares the same caches.
#[derive(Clone)]
pub struct AppState {
    /// General-purpose cache of JSON payloads
    pub cache: TtlCache<Value>,
    /// Read-through prayer-times lookup with its own cache
    pub prayer: Arc<PrayerTimesService>,
}

impl AppState {
    pub fn new(cache: TtlCache<Value>, prayer: PrayerTimesService) -> Self {
        Self {
            cache,
            prayer: Arc::new(prayer),
        }
    }

    /// Builds the state from configuration, wiring the Aladhan client as the
    /// prayer-times provider.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = TtlCache::named("responses", config.default_ttl());
        let source: Arc<dyn PrayerTimesSource> =
            Arc::new(AladhanClient::new(AladhanConfig::from(config))?);
        let prayer = PrayerTimesService::new(source, config.prayer_ttl());
        Ok(Self::new(cache, prayer))
    }
}

/// Handler for PUT /cache
///
/// Stores any JSON value under a key with an optional TTL in seconds.
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req
        .ttl
        .map(Duration::from_secs)
        .unwrap_or_else(|| state.cache.default_ttl());
    state.cache.set(req.key.clone(), req.value, Some(ttl));

    Ok(Json(SetResponse::new(req.key, ttl.as_secs())))
}

/// Handler for GET /cache/:key
///
/// Absent and expired keys both map to 404.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let (value, ttl_remaining) = state
        .cache
        .get_with_ttl(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value, ttl_remaining.as_secs())))
}

/// Handler for DELETE /cache/:key
///
/// Invalidates a key ahead of its expiry. Idempotent.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if let Some(error_msg) = validate_key(&key) {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let removed = state.cache.delete(&key);
    Ok(Json(DeleteResponse::new(key, removed)))
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<ClearResponse> {
    let cleared = state.cache.clear();
    info!("Cache cleared: {} entries dropped", cleared);
    Json(ClearResponse { cleared })
}

/// Handler for POST /cache/cleanup
///
/// Runs the same sweep the background task does, on demand.
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.cache.cleanup();
    Json(CleanupResponse { removed })
}

/// Handler for GET /prayer-times
///
/// Provider outages still answer 200, with the fallback schedule flagged.
pub async fn prayer_times_handler(
    State(state): State<AppState>,
    Query(query): Query<PrayerTimesQuery>,
) -> Result<Json<PrayerTimesResponse>> {
    let today = chrono::Utc::now().date_naive();
    let date = query
        .resolve_date(today)
        .map_err(CacheError::InvalidRequest)?;

    let lookup = state.prayer.times_for(date).await;
    Ok(Json(PrayerTimesResponse::from(lookup)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats()))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
