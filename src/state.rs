use std::sync::Arc;

use crate::{
    config::AppConfig,
    db::{DbPool, OrmConn, orm_from_pool},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Both store handles share the one sqlx pool.
    pub fn new(pool: DbPool, config: AppConfig) -> Self {
        Self {
            orm: orm_from_pool(pool.clone()),
            pool,
            config: Arc::new(config),
        }
    }
}
