use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::backend::{BlobStore, RestaurantRepository, SqliteRepository};
use crate::config::Config;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    /// Record collections. Admin accounts and sessions go through `db` directly.
    pub repo: Arc<dyn RestaurantRepository>,
    pub db: DbPool,
    pub blobs: BlobStore,
    pub config: Config,
}

impl AppState {
    pub fn new(db: DbPool, config: Config) -> Self {
        Self {
            repo: Arc::new(SqliteRepository::new(db.clone())),
            blobs: BlobStore::new(config.uploads_path()),
            db,
            config,
        }
    }
}
