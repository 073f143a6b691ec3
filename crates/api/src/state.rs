//! Shared handler state.

use std::sync::Arc;

use db::DbPool;

use crate::config::ApiConfig;

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(pool: DbPool, config: ApiConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }
}
