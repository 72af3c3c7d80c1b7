use std::time::Duration;

use sqlx::PgPool;

use istudio_cache::{CacheConfig, MemoryCache};
use istudio_config::{CatalogConfig, CorsConfig, GuardConfig, JwtConfig, RateLimitConfig};
use istudio_core::routes::RouteRequirements;
use istudio_db::init_db_pool;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub guard_config: GuardConfig,
    pub catalog_config: CatalogConfig,
    pub routes: RouteRequirements,
    pub note_cache: MemoryCache,
}

pub async fn init_app_state() -> AppState {
    let cache_config = CacheConfig::from_env();
    AppState {
        db: init_db_pool().await,
        jwt_config: JwtConfig::from_env(),
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        guard_config: GuardConfig::from_env(),
        catalog_config: CatalogConfig::from_env(),
        routes: RouteRequirements::with_defaults(),
        note_cache: MemoryCache::new(Duration::from_secs(cache_config.default_ttl_seconds)),
    }
}
