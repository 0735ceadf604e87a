//! Router state: services plus the pools the readiness check pings

use std::sync::Arc;

use presence_cache::SharedRedisPool;
use presence_common::AppConfig;
use presence_db::PgPool;
use presence_service::ServiceContext;

#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    /// Users and audit logs always live here; viewers too unless Redis is selected
    db_pool: PgPool,
    /// Present only with the Redis viewer store
    redis_pool: Option<SharedRedisPool>,
}

impl AppState {
    pub fn new(
        service_context: Arc<ServiceContext>,
        config: AppConfig,
        db_pool: PgPool,
        redis_pool: Option<SharedRedisPool>,
    ) -> Self {
        Self {
            service_context,
            config: Arc::new(config),
            db_pool,
            redis_pool,
        }
    }

    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Owned handle for tasks that outlive a request, such as the reaper
    pub fn shared_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn db_pool(&self) -> &PgPool {
        &self.db_pool
    }

    pub fn redis_pool(&self) -> Option<&SharedRedisPool> {
        self.redis_pool.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &self.service_context)
            .field("viewer_store", &self.config.presence.store)
            .field("redis", &self.redis_pool.is_some())
            .finish_non_exhaustive()
    }
}
