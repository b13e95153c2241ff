//! Link shortening and resolution service.

use std::sync::Arc;

use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::entities::NewLink;
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::infrastructure::cache::LinkCache;
use crate::utils::code_generator::CodeGenerator;

/// Attempts at inserting a freshly generated short ID before giving up.
const MAX_ATTEMPTS: usize = 10;

/// Coordinates the in-memory [`LinkCache`] and the durable [`LinkRepository`].
///
/// The cache is consulted first on every call; the repository is the fallback and
/// the source of truth. Anything read from or written to the repository is written
/// through into the cache, but only after the repository has confirmed it.
///
/// # Idempotence
///
/// The repository enforces uniqueness of the long URL. When two requests race to
/// shorten the same never-seen URL, the loser's insert fails with
/// [`AppError::Conflict`], it re-reads the winner's short ID and returns that, so every
/// caller gets the same ID and exactly one row exists.
pub struct LinkService<L: LinkRepository, G: CodeGenerator> {
    link_repository: Arc<L>,
    generator: Arc<G>,
    cache: Arc<LinkCache>,
}

impl<L: LinkRepository, G: CodeGenerator> LinkService<L, G> {
    /// Creates a new link service.
    pub fn new(link_repository: Arc<L>, generator: Arc<G>, cache: Arc<LinkCache>) -> Self {
        Self {
            link_repository,
            generator,
            cache,
        }
    }

    /// Returns the short ID for a canonical long URL, creating one if needed.
    ///
    /// `long_url` must already be normalized; see
    /// [`crate::utils::url_normalizer::normalize_url`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the repository fails. No cache entry is
    /// created for a mapping the repository did not confirm.
    pub async fn shorten(&self, long_url: &str) -> Result<String, AppError> {
        if let Some(short_id) = self.cache.find_by_long_url(long_url) {
            debug!("(Cache hit) {}: {}", short_id, long_url);
            self.refresh(&short_id, long_url);
            return Ok(short_id);
        }

        if let Some(short_id) = self.load_by_long_url(long_url).await? {
            return Ok(short_id);
        }

        self.create(long_url).await
    }

    /// Returns the long URL a short ID points to, or `None` if it is unknown.
    ///
    /// Never writes to the repository.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the repository fails.
    pub async fn resolve(&self, short_id: &str) -> Result<Option<String>, AppError> {
        if let Some(long_url) = self.cache.get(short_id) {
            debug!("(Cache hit) {}: {}", short_id, long_url);
            self.refresh(short_id, &long_url);
            return Ok(Some(long_url));
        }

        debug!("(Cache miss) {}", short_id);

        match self.link_repository.find_by_code(short_id).await? {
            Some(link) => {
                self.cache.put(&link.code, &link.long_url);
                debug!(
                    "(Cache update) {}: {} has been put back into the cache",
                    link.code, link.long_url
                );
                Ok(Some(link.long_url))
            }
            None => Ok(None),
        }
    }

    /// Like [`Self::resolve`], but an unknown short ID is an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no mapping exists.
    /// Returns [`AppError::Internal`] if the repository fails.
    pub async fn resolve_or_not_found(&self, short_id: &str) -> Result<String, AppError> {
        self.resolve(short_id).await?.ok_or_else(|| {
            AppError::not_found("Short link not found", json!({ "short_id": short_id }))
        })
    }

    /// Number of links in the repository.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] if the repository fails.
    pub async fn count_links(&self) -> Result<i64, AppError> {
        self.link_repository.count().await
    }

    /// Reads the short ID for `long_url` from the repository and caches it.
    async fn load_by_long_url(&self, long_url: &str) -> Result<Option<String>, AppError> {
        let Some(link) = self.link_repository.find_by_long_url(long_url).await? else {
            return Ok(None);
        };

        self.cache.put(&link.code, &link.long_url);
        debug!(
            "(Cache update) {}: {} retrieved from the store",
            link.code, link.long_url
        );

        Ok(Some(link.code))
    }

    /// Persists a new mapping under a freshly generated short ID, then caches it.
    ///
    /// A conflict either means another request stored `long_url` first, in which case
    /// its short ID is returned, or that the generated ID was already taken, in which
    /// case another ID is tried.
    async fn create(&self, long_url: &str) -> Result<String, AppError> {
        for _ in 0..MAX_ATTEMPTS {
            let new_link = NewLink {
                code: self.generator.generate(),
                long_url: long_url.to_string(),
            };
            let code = new_link.code.clone();

            match self.link_repository.create(new_link).await {
                Ok(link) => {
                    self.cache.put(&link.code, &link.long_url);
                    info!("New short URL generated. {}: {}", link.code, link.long_url);
                    return Ok(link.code);
                }
                Err(AppError::Conflict { .. }) => {
                    if let Some(short_id) = self.load_by_long_url(long_url).await? {
                        debug!(
                            "Concurrent shorten of {} already stored as {}",
                            long_url, short_id
                        );
                        return Ok(short_id);
                    }
                    warn!("Short ID collision on {}, generating another", code);
                }
                Err(e) => {
                    error!("Failed to save new URL {}: {}", long_url, e);
                    return Err(e);
                }
            }
        }

        Err(AppError::internal(
            "Failed to generate unique short ID",
            json!({ "reason": "Too many collisions" }),
        ))
    }

    /// Marks a cache hit as recent, re-inserting if the entry was evicted meanwhile.
    fn refresh(&self, short_id: &str, long_url: &str) {
        if !self.cache.touch(short_id) {
            self.cache.put(short_id, long_url);
        }
    }
}
