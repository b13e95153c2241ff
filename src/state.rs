//! Shared application state injected into every handler.

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::application::services::LinkService;
use crate::infrastructure::cache::LinkCache;
use crate::infrastructure::persistence::SqliteLinkRepository;
use crate::utils::code_generator::RandomCodeGenerator;

/// The [`LinkService`] wired to SQLite and random short IDs.
pub type AppLinkService = LinkService<SqliteLinkRepository, RandomCodeGenerator>;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<AppLinkService>,
    pub cache: Arc<LinkCache>,
    /// Prefix for generated short URLs, always ending in `/`.
    pub base_url: String,
}

impl AppState {
    pub fn new(pool: Arc<SqlitePool>, cache: Arc<LinkCache>, base_url: impl Into<String>) -> Self {
        let link_repository = Arc::new(SqliteLinkRepository::new(pool));
        let link_service = Arc::new(LinkService::new(
            link_repository,
            Arc::new(RandomCodeGenerator),
            cache.clone(),
        ));

        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self {
            link_service,
            cache,
            base_url,
        }
    }

    /// Full public URL for a short ID.
    pub fn short_url(&self, short_id: &str) -> String {
        format!("{}{}", self.base_url, short_id)
    }
}
