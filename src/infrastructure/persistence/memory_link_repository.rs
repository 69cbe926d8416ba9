//! In-process implementation of the link repository.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::entities::ShortLink;
use crate::domain::errors::StorageError;
use crate::domain::repositories::LinkRepository;

/// Link repository backed by a sharded concurrent map.
///
/// Both contract operations hold the shard lock for the key while they run,
/// which makes them atomic with respect to each other. Data lives only as long
/// as the process; selected with a `memory://` connection string.
#[derive(Debug, Default)]
pub struct MemoryLinkRepository {
    links: DashMap<String, ShortLink>,
}

impl MemoryLinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a link without counting a hit.
    pub fn peek(&self, code: &str) -> Option<ShortLink> {
        self.links.get(code).map(|link| link.clone())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl LinkRepository for MemoryLinkRepository {
    async fn create(&self, code: &str, original_url: &str) -> Result<(), StorageError> {
        match self.links.entry(code.to_string()) {
            Entry::Occupied(_) => Err(StorageError::DuplicateKey(code.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(ShortLink::new(code, original_url));
                Ok(())
            }
        }
    }

    async fn get_and_touch(&self, code: &str) -> Result<ShortLink, StorageError> {
        let mut link = self
            .links
            .get_mut(code)
            .ok_or_else(|| StorageError::NotFound(code.to_string()))?;

        link.hits += 1;
        debug!(code, hits = link.hits, "link resolved");

        Ok(link.clone())
    }

    async fn list(&self) -> Result<Vec<ShortLink>, StorageError> {
        let mut links: Vec<ShortLink> = self.links.iter().map(|e| e.value().clone()).collect();
        links.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(links)
    }

    async fn health_check(&self) -> bool {
        true
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
