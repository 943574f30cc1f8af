//! Application context shared by all request handlers.
//!
//! [`AppContext`] is handed to Axum as router state. It carries the
//! configuration snapshot, the injected repositories, and the media storage,
//! all behind `Arc`s so cloning per request is cheap.

use std::sync::Arc;

use hf_core::config::Config;
use hf_db::pool::DbPool;
use hf_db::repository::{
    AccountRepository, FrameRepository, SqliteAccountRepository, SqliteFrameRepository,
};

use crate::storage::FrameStorage;

#[derive(Clone)]
pub struct AppContext {
    /// Immutable application configuration snapshot.
    pub config: Arc<Config>,
    /// Account persistence.
    pub accounts: Arc<dyn AccountRepository>,
    /// Frame persistence.
    pub frames: Arc<dyn FrameRepository>,
    /// On-disk storage for uploaded frame images.
    pub storage: Arc<FrameStorage>,
}

impl AppContext {
    /// Assemble a context from explicitly provided repositories.
    pub fn new(
        config: Config,
        accounts: Arc<dyn AccountRepository>,
        frames: Arc<dyn FrameRepository>,
    ) -> Self {
        let storage = Arc::new(FrameStorage::new(config.media.root.clone()));
        Self {
            config: Arc::new(config),
            accounts,
            frames,
            storage,
        }
    }

    /// Assemble a context whose repositories share one SQLite pool.
    pub fn from_pool(config: Config, db: DbPool) -> Self {
        Self::new(
            config,
            Arc::new(SqliteAccountRepository::new(db.clone())),
            Arc::new(SqliteFrameRepository::new(db)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_uses_configured_media_root() {
        let mut config = Config::default();
        config.media.root = "/srv/homeframe/media".into();
        let db = hf_db::pool::init_memory_pool().unwrap();
        let ctx = AppContext::from_pool(config, db);
        assert_eq!(ctx.storage.root(), std::path::Path::new("/srv/homeframe/media"));
    }
}
