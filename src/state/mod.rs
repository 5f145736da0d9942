use std::sync::Arc;
use std::time::{Duration, Instant};

use moka::future::Cache;

use crate::config::{ApiConfig, CacheConfig};
use crate::models::profile::ProfileView;
use crate::service::{IdentityService, TrackService};
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub cache: Arc<ApiCache>,
    pub identity: IdentityService,
    pub tracks: TrackService,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: &ApiConfig) -> Self {
        let cache = Arc::new(ApiCache::new(&config.cache));
        let identity = IdentityService::new(Arc::clone(&store), Arc::clone(&cache));
        let tracks = TrackService::new(Arc::clone(&store), config.interactions.gem_allowance);
        Self {
            store,
            cache,
            identity,
            tracks,
            start_time: Instant::now(),
        }
    }
}

pub struct ApiCache {
    /// Keyed by `username:<username_key>` or `wallet:<address>`.
    pub profiles: Cache<String, Arc<ProfileView>>,
}

impl ApiCache {
    pub fn new(config: &CacheConfig) -> Self {
        assert!(
            config.profiles_max_capacity >= 100,
            "Profile cache capacity threshold"
        );

        let profiles = Cache::builder()
            .max_capacity(config.profiles_max_capacity)
            .time_to_live(Duration::from_secs(config.profiles_ttl_seconds))
            .time_to_idle(Duration::from_secs(config.profiles_ttl_seconds / 2 + 1))
            .build();

        Self { profiles }
    }
}
